// crates/quality-gate-core/src/core/report.rs
// ============================================================================
// Module: Gate Report Types
// Description: Verdicts, phases, failures, and the aggregate gate report.
// Purpose: Provide stable, serializable results for rendering and audit.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`GateReport`] captures where a gate run stopped, every threshold check
//! evaluated along the way, and every distinct problem found in the phase
//! that failed. Failures are values so that a phase can report all of its
//! problems at once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::catalog::CatalogSummary;
use crate::core::identifiers::ScenarioId;
use crate::core::identifiers::TestRef;
use crate::core::thresholds::ThresholdCheck;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Reason recorded for automated scenarios without a test reference.
pub const MISSING_TEST_REF_REASON: &str = "missing_test_ref";

// ============================================================================
// SECTION: Phases and Verdicts
// ============================================================================

/// Gate orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePhase {
    /// Nothing evaluated yet.
    Start,
    /// Catalog loaded successfully.
    CatalogLoaded,
    /// Counts, ids and references all passed.
    ScenarioGatePassed,
    /// Coverage measured by the external tool.
    CoverageMeasured,
    /// Terminal success.
    Passed,
    /// Terminal failure.
    Failed,
}

impl GatePhase {
    /// Returns the stable snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::CatalogLoaded => "catalog_loaded",
            Self::ScenarioGatePassed => "scenario_gate_passed",
            Self::CoverageMeasured => "coverage_measured",
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }

    /// Returns true for `Passed` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

impl fmt::Display for GatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final gate verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateVerdict {
    /// All evaluated phases passed.
    Pass,
    /// At least one phase failed.
    Fail,
}

impl fmt::Display for GateVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("pass"),
            Self::Fail => f.write_str("fail"),
        }
    }
}

// ============================================================================
// SECTION: Missing References
// ============================================================================

/// Automated scenario whose test reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingReference {
    /// Scenario identifier (may be empty for malformed rows).
    pub id: ScenarioId,
    /// 1-based catalog line.
    pub line: usize,
    /// `missing_test_ref`, or the unresolved reference verbatim.
    pub reason: String,
}

impl MissingReference {
    /// Records an automated scenario with an empty test reference.
    #[must_use]
    pub fn missing_test_ref(id: ScenarioId, line: usize) -> Self {
        Self {
            id,
            line,
            reason: MISSING_TEST_REF_REASON.to_string(),
        }
    }

    /// Records a test reference with no matching definition.
    #[must_use]
    pub fn unresolved(id: ScenarioId, line: usize, test_ref: &TestRef) -> Self {
        Self {
            id,
            line,
            reason: test_ref.as_str().to_string(),
        }
    }
}

impl fmt::Display for MissingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id.is_empty() {
            write!(f, "<line {}>: {}", self.line, self.reason)
        } else {
            write!(f, "{}: {}", self.id, self.reason)
        }
    }
}

// ============================================================================
// SECTION: Coverage
// ============================================================================

/// Aggregate coverage reported by an external tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageMeasurement {
    /// Tool label (e.g., `cargo llvm-cov`).
    pub tool: String,
    /// Aggregate line coverage percentage.
    pub line_percent: f64,
    /// Covered line count when reported.
    pub lines_covered: Option<u64>,
    /// Total executable line count when reported.
    pub lines_total: Option<u64>,
}

// ============================================================================
// SECTION: Failures
// ============================================================================

/// Gate failure kinds. Every variant is terminal for the current run.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GateFailure {
    /// Catalog file does not exist.
    #[error("scenario catalog not found: {}", path.display())]
    CatalogNotFound {
        /// Catalog path.
        path: PathBuf,
    },
    /// Catalog exists but could not be read.
    #[error("scenario catalog unreadable: {error}")]
    CatalogUnreadable {
        /// Catalog path.
        path: PathBuf,
        /// Read failure detail.
        error: String,
    },
    /// Too few scenarios with a non-empty id.
    #[error("scenario count {actual} is below the minimum {required}")]
    ScenarioTotalBelowMinimum {
        /// Observed count.
        actual: usize,
        /// Required minimum.
        required: usize,
    },
    /// Too few automated scenarios.
    #[error("automated scenario count {actual} is below the minimum {required}")]
    AutomatedCountBelowMinimum {
        /// Observed count.
        actual: usize,
        /// Required minimum.
        required: usize,
    },
    /// Scenario ids used on more than one row.
    #[error("duplicate scenario ids: {}", join_ids(ids))]
    DuplicateScenarioIds {
        /// Duplicated ids, sorted.
        ids: Vec<ScenarioId>,
    },
    /// Automated scenarios whose test reference is missing or unresolved.
    #[error("{} automated scenario(s) reference missing tests", references.len())]
    MissingTestReferences {
        /// Every offending scenario, in catalog order.
        references: Vec<MissingReference>,
    },
    /// The source tree could not be searched.
    #[error("source search unavailable: {error}")]
    SourceSearchUnavailable {
        /// Search failure detail.
        error: String,
    },
    /// Measured coverage below the minimum.
    #[error("line coverage {measured:.2}% is below the minimum {required:.2}%")]
    CoverageBelowMinimum {
        /// Measured percentage.
        measured: f64,
        /// Required percentage.
        required: f64,
    },
    /// A collaborator tool is not installed or cannot be started.
    #[error("{tool} is unavailable ({hint})")]
    ExternalToolUnavailable {
        /// Tool label.
        tool: String,
        /// Remediation hint.
        hint: String,
    },
    /// The coverage tool ran but did not produce a usable result.
    #[error("{tool} failed: {detail}")]
    CoverageToolFailed {
        /// Tool label.
        tool: String,
        /// Failure detail.
        detail: String,
    },
}

/// Joins scenario ids for display.
fn join_ids(ids: &[ScenarioId]) -> String {
    ids.iter().map(ScenarioId::as_str).collect::<Vec<_>>().join(", ")
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Aggregate result of a gate run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateReport {
    /// Final verdict.
    pub verdict: GateVerdict,
    /// Last phase reached (terminal for full runs).
    pub phase: GatePhase,
    /// Catalog path evaluated.
    pub catalog_path: PathBuf,
    /// Catalog summary when the catalog loaded.
    pub summary: Option<CatalogSummary>,
    /// Threshold checks evaluated, in evaluation order.
    pub checks: Vec<ThresholdCheck>,
    /// Missing references found by the verifier.
    pub missing_references: Vec<MissingReference>,
    /// Coverage measurement when the coverage phase ran.
    pub coverage: Option<CoverageMeasurement>,
    /// Every problem found in the phase that failed.
    pub failures: Vec<GateFailure>,
}

impl GateReport {
    /// Creates an empty report positioned at [`GatePhase::Start`].
    #[must_use]
    pub const fn new(catalog_path: PathBuf) -> Self {
        Self {
            verdict: GateVerdict::Pass,
            phase: GatePhase::Start,
            catalog_path,
            summary: None,
            checks: Vec::new(),
            missing_references: Vec::new(),
            coverage: None,
            failures: Vec::new(),
        }
    }

    /// Returns true when the verdict is [`GateVerdict::Pass`].
    #[must_use]
    pub fn passed(&self) -> bool {
        self.verdict == GateVerdict::Pass
    }
}
