// crates/quality-gate-core/src/core/mod.rs
// ============================================================================
// Module: Quality Gate Core Types
// Description: Catalog, scenario, threshold, and report structures.
// Purpose: Provide stable, serializable types for gate evaluation and reports.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types define the scenario catalog, the threshold evaluator, and the
//! report model. These types are the canonical source of truth for every
//! rendered output (text, markdown, JSON, audit events).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod catalog;
pub mod identifiers;
pub mod report;
pub mod scenario;
pub mod thresholds;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::CatalogError;
pub use catalog::CatalogSummary;
pub use catalog::DEFAULT_CATALOG_FILE;
pub use catalog::DEFAULT_DELIMITER;
pub use catalog::MAX_CATALOG_BYTES;
pub use catalog::ScenarioCatalog;
pub use identifiers::ScenarioId;
pub use identifiers::TestRef;
pub use report::CoverageMeasurement;
pub use report::GateFailure;
pub use report::GatePhase;
pub use report::GateReport;
pub use report::GateVerdict;
pub use report::MISSING_TEST_REF_REASON;
pub use report::MissingReference;
pub use scenario::AUTOMATED_MARKER;
pub use scenario::Priority;
pub use scenario::ScenarioRecord;
pub use scenario::TestType;
pub use scenario::is_automated_marker;
pub use thresholds::DEFAULT_MIN_AUTOMATED;
pub use thresholds::DEFAULT_MIN_LINE_COVERAGE;
pub use thresholds::DEFAULT_MIN_TOTAL;
pub use thresholds::ThresholdCheck;
pub use thresholds::ThresholdMetric;
pub use thresholds::Thresholds;
pub use thresholds::evaluate_counts;
pub use thresholds::evaluate_coverage;
