// crates/quality-gate-core/src/lib.rs
// ============================================================================
// Module: Quality Gate Core Library
// Description: Public API surface for the quality gate core.
// Purpose: Expose catalog types, collaborator interfaces, and the gate runtime.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Quality gate core decides whether a change set may merge. It reads a
//! scenario catalog, verifies that automated scenarios point at real test
//! definitions, compares counts and line coverage against minimums, and
//! produces one deterministic [`GateReport`]. Source search and coverage
//! measurement are reached through explicit interfaces.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use audit::AuditOutcome;
pub use audit::FileAuditSink;
pub use audit::GateAuditEvent;
pub use audit::GateAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use interfaces::CoverageError;
pub use interfaces::CoverageProbe;
pub use interfaces::DefinitionSearch;
pub use interfaces::SearchError;
pub use runtime::FixedCoverageProbe;
pub use runtime::GateOrchestrator;
pub use runtime::GateOrchestratorConfig;
pub use runtime::GateState;
pub use runtime::InMemoryDefinitionSearch;
pub use runtime::ReferenceVerifier;
