// crates/quality-gate-config/src/lib.rs
// ============================================================================
// Module: Quality Gate Config Library
// Description: Canonical config model, environment overrides, and validation.
// Purpose: Single source of truth for quality-gate.toml semantics.
// Dependencies: quality-gate-core, quality-gate-providers, serde, toml
// ============================================================================

//! ## Overview
//! `quality-gate-config` defines the configuration model for the quality
//! gate. Settings come from `quality-gate.toml`, are overridden by a fixed
//! set of environment variables, and are validated fail-closed before any
//! gate phase runs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
