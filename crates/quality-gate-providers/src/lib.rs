// crates/quality-gate-providers/src/lib.rs
// ============================================================================
// Module: Quality Gate Providers
// Description: Built-in source search, coverage, and external check collaborators.
// Purpose: Connect the gate core to the source tree and external tooling.
// Dependencies: quality-gate-core, regex, walkdir, serde_json, tempfile
// ============================================================================

//! ## Overview
//! This crate ships the concrete collaborators behind the core interfaces:
//! a regex definition search over the source tree, a `cargo llvm-cov`
//! coverage probe, a probe that reads a pre-computed coverage report, and a
//! runner for external lint and format checks. All of them are read-only
//! with respect to the workspace and enforce size limits on what they read.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod checks;
pub mod coverage;
pub mod search;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use checks::CheckError;
pub use checks::CheckOutcome;
pub use checks::CheckStatus;
pub use checks::CommandCheck;
pub use checks::CommandCheckConfig;
pub use checks::default_checks;
pub use checks::run_checks;
pub use coverage::LlvmCovConfig;
pub use coverage::LlvmCovProbe;
pub use coverage::ReportFileCoverageProbe;
pub use coverage::parse_llvm_cov_summary;
pub use search::RegexDefinitionSearch;
pub use search::SourceSearchConfig;
