// crates/quality-gate-cli/src/lib.rs
// ============================================================================
// Module: Quality Gate CLI Library
// Description: Shared helpers for the Quality Gate command-line interface.
// Purpose: Provide reusable components (i18n, rendering) for the binary and tests.
// Dependencies: quality-gate-core, quality-gate-providers, serde, serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! This library houses the CLI message catalog and the report renderers. The
//! binary entry point (`src/main.rs`) imports these helpers to keep all
//! user-facing output consistent across commands and formats.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
/// Text, Markdown, and JSON rendering of command results.
pub mod render;
