// crates/quality-gate-core/src/runtime/orchestrator.rs
// ============================================================================
// Module: Gate Orchestrator
// Description: Phase state machine sequencing catalog, reference, and coverage gates.
// Purpose: Produce one deterministic verdict and report per invocation.
// Dependencies: crate::{audit, core, interfaces, runtime::verifier}
// ============================================================================

//! ## Overview
//! The orchestrator advances an explicit [`GateState`] one transition at a
//! time:
//!
//! ```text
//! Start -> CatalogLoaded -> ScenarioGatePassed -> CoverageMeasured -> Passed
//!   \            \                  \                     \
//!    +------------+------------------+---------------------+--> Failed
//! ```
//!
//! ## Invariants
//! - Transitions are one-directional; there are no retries.
//! - The coverage probe is only invoked after the scenario gate passes.
//! - A failing phase reports every problem it found, in a fixed order.
//! - Every transition is recorded on the audit sink.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use crate::audit::AuditOutcome;
use crate::audit::GateAuditEvent;
use crate::audit::GateAuditSink;
use crate::core::CatalogError;
use crate::core::DEFAULT_CATALOG_FILE;
use crate::core::DEFAULT_DELIMITER;
use crate::core::ScenarioCatalog;
use crate::core::report::CoverageMeasurement;
use crate::core::report::GateFailure;
use crate::core::report::GatePhase;
use crate::core::report::GateReport;
use crate::core::report::GateVerdict;
use crate::core::thresholds::Thresholds;
use crate::core::thresholds::evaluate_counts;
use crate::core::thresholds::evaluate_coverage;
use crate::interfaces::CoverageError;
use crate::interfaces::CoverageProbe;
use crate::interfaces::DefinitionSearch;
use crate::runtime::verifier::ReferenceVerifier;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Explicit orchestrator configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GateOrchestratorConfig {
    /// Scenario catalog path.
    pub catalog_path: PathBuf,
    /// Catalog field delimiter.
    pub delimiter: char,
    /// Gate minimums.
    pub thresholds: Thresholds,
}

impl Default for GateOrchestratorConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_FILE),
            delimiter: DEFAULT_DELIMITER,
            thresholds: Thresholds::default(),
        }
    }
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Orchestrator state together with the data carried to the next phase.
#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    /// Nothing evaluated yet.
    Start,
    /// Catalog loaded; scenario checks pending.
    CatalogLoaded(ScenarioCatalog),
    /// Scenario gate passed; coverage pending.
    ScenarioGatePassed,
    /// Coverage measured; comparison pending.
    CoverageMeasured(CoverageMeasurement),
    /// Terminal success.
    Passed,
    /// Terminal failure.
    Failed,
}

impl GateState {
    /// Returns the phase label for this state.
    #[must_use]
    pub const fn phase(&self) -> GatePhase {
        match self {
            Self::Start => GatePhase::Start,
            Self::CatalogLoaded(_) => GatePhase::CatalogLoaded,
            Self::ScenarioGatePassed => GatePhase::ScenarioGatePassed,
            Self::CoverageMeasured(_) => GatePhase::CoverageMeasured,
            Self::Passed => GatePhase::Passed,
            Self::Failed => GatePhase::Failed,
        }
    }
}

// ============================================================================
// SECTION: Orchestrator
// ============================================================================

/// Gate orchestrator over search, coverage, and audit collaborators.
pub struct GateOrchestrator<S, P, A> {
    /// Orchestrator configuration.
    config: GateOrchestratorConfig,
    /// Reference verifier over the search backend.
    verifier: ReferenceVerifier<S>,
    /// Coverage measurement backend.
    coverage: P,
    /// Audit sink for transitions.
    audit: A,
}

impl<S, P, A> GateOrchestrator<S, P, A>
where
    S: DefinitionSearch,
    P: CoverageProbe,
    A: GateAuditSink,
{
    /// Creates a new orchestrator.
    #[must_use]
    pub const fn new(config: GateOrchestratorConfig, search: S, coverage: P, audit: A) -> Self {
        Self {
            config,
            verifier: ReferenceVerifier::new(search),
            coverage,
            audit,
        }
    }

    /// Returns the orchestrator configuration.
    #[must_use]
    pub const fn config(&self) -> &GateOrchestratorConfig {
        &self.config
    }

    /// Runs the full pipeline until a terminal state.
    #[must_use]
    pub fn run(&self) -> GateReport {
        self.run_until(GatePhase::is_terminal)
    }

    /// Runs only the scenario gate, stopping before coverage is measured.
    #[must_use]
    pub fn run_scenario_gate(&self) -> GateReport {
        self.run_until(|phase| phase.is_terminal() || phase == GatePhase::ScenarioGatePassed)
    }

    /// Advances from `state` until `stop` accepts the reached phase.
    fn run_until(&self, stop: impl Fn(GatePhase) -> bool) -> GateReport {
        let mut report = GateReport::new(self.config.catalog_path.clone());
        let mut state = GateState::Start;
        while !stop(state.phase()) {
            state = self.advance(state, &mut report);
        }
        report
    }

    /// Performs one transition and records it on the report and audit sink.
    pub fn advance(&self, state: GateState, report: &mut GateReport) -> GateState {
        let next = match state {
            GateState::Start => self.load_catalog(report),
            GateState::CatalogLoaded(catalog) => self.evaluate_scenarios(&catalog, report),
            GateState::ScenarioGatePassed => self.measure_coverage(report),
            GateState::CoverageMeasured(measurement) => {
                self.evaluate_coverage(&measurement, report)
            }
            terminal @ (GateState::Passed | GateState::Failed) => return terminal,
        };
        report.phase = next.phase();
        self.record_transition(&next, report);
        next
    }

    /// Start -> `CatalogLoaded` | Failed.
    fn load_catalog(&self, report: &mut GateReport) -> GateState {
        match ScenarioCatalog::load(&self.config.catalog_path, self.config.delimiter) {
            Ok(catalog) => {
                report.summary = Some(catalog.summary());
                GateState::CatalogLoaded(catalog)
            }
            Err(CatalogError::NotFound {
                path,
            }) => fail(report, vec![GateFailure::CatalogNotFound {
                path,
            }]),
            Err(err) => fail(report, vec![GateFailure::CatalogUnreadable {
                path: self.config.catalog_path.clone(),
                error: err.to_string(),
            }]),
        }
    }

    /// `CatalogLoaded` -> `ScenarioGatePassed` | Failed.
    ///
    /// Problems are reported in order: total count, automated count,
    /// duplicate ids, missing references.
    fn evaluate_scenarios(&self, catalog: &ScenarioCatalog, report: &mut GateReport) -> GateState {
        let thresholds = &self.config.thresholds;
        let total = catalog.total();
        let automated = catalog.automated_count();
        let [total_check, automated_check] = evaluate_counts(total, automated, thresholds);
        report.checks.push(total_check);
        report.checks.push(automated_check);

        let mut failures = Vec::new();
        if !total_check.passed {
            failures.push(GateFailure::ScenarioTotalBelowMinimum {
                actual: total,
                required: thresholds.min_total,
            });
        }
        if !automated_check.passed {
            failures.push(GateFailure::AutomatedCountBelowMinimum {
                actual: automated,
                required: thresholds.min_automated,
            });
        }
        let duplicates = catalog.duplicate_ids();
        if !duplicates.is_empty() {
            failures.push(GateFailure::DuplicateScenarioIds {
                ids: duplicates,
            });
        }
        match self.verifier.verify(catalog) {
            Ok(missing) if missing.is_empty() => {}
            Ok(missing) => {
                report.missing_references.clone_from(&missing);
                failures.push(GateFailure::MissingTestReferences {
                    references: missing,
                });
            }
            Err(err) => failures.push(GateFailure::SourceSearchUnavailable {
                error: err.to_string(),
            }),
        }

        if failures.is_empty() { GateState::ScenarioGatePassed } else { fail(report, failures) }
    }

    /// `ScenarioGatePassed` -> `CoverageMeasured` | Failed.
    fn measure_coverage(&self, report: &mut GateReport) -> GateState {
        match self.coverage.measure() {
            Ok(measurement) => {
                report.coverage = Some(measurement.clone());
                GateState::CoverageMeasured(measurement)
            }
            Err(CoverageError::Unavailable {
                tool,
                hint,
            }) => fail(report, vec![GateFailure::ExternalToolUnavailable {
                tool,
                hint,
            }]),
            Err(CoverageError::Failed {
                tool,
                detail,
            }) => fail(report, vec![GateFailure::CoverageToolFailed {
                tool,
                detail,
            }]),
        }
    }

    /// `CoverageMeasured` -> Passed | Failed.
    fn evaluate_coverage(
        &self,
        measurement: &CoverageMeasurement,
        report: &mut GateReport,
    ) -> GateState {
        let check = evaluate_coverage(measurement.line_percent, &self.config.thresholds);
        report.checks.push(check);
        if check.passed {
            GateState::Passed
        } else {
            fail(report, vec![GateFailure::CoverageBelowMinimum {
                measured: measurement.line_percent,
                required: self.config.thresholds.min_line_coverage,
            }])
        }
    }

    /// Emits the audit event for a completed transition.
    fn record_transition(&self, next: &GateState, report: &GateReport) {
        let (outcome, detail) = match next {
            GateState::Failed => {
                let detail = report
                    .failures
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                (AuditOutcome::Failed, Some(detail))
            }
            GateState::Passed => (AuditOutcome::Passed, None),
            GateState::CoverageMeasured(measurement) => {
                (AuditOutcome::Advanced, Some(format!("{:.2}%", measurement.line_percent)))
            }
            _ => (AuditOutcome::Advanced, None),
        };
        self.audit.record(&GateAuditEvent::new(next.phase(), outcome, detail));
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Marks the report failed with the given problems.
fn fail(report: &mut GateReport, failures: Vec<GateFailure>) -> GateState {
    report.verdict = GateVerdict::Fail;
    report.failures.extend(failures);
    GateState::Failed
}
