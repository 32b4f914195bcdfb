// crates/quality-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Quality Gate Runtime
// Description: Gate orchestrator, reference verifier, and in-memory collaborators.
// Purpose: Execute the gate pipeline against search and coverage collaborators.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules sequence the gate phases. Every entry point (full gate,
//! scenario-only gate) calls into the same orchestrator so verdicts stay
//! identical across commands.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod memory;
pub mod orchestrator;
pub mod verifier;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use memory::FixedCoverageProbe;
pub use memory::InMemoryDefinitionSearch;
pub use orchestrator::GateOrchestrator;
pub use orchestrator::GateOrchestratorConfig;
pub use orchestrator::GateState;
pub use verifier::ReferenceVerifier;
