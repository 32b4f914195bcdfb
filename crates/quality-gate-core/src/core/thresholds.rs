// crates/quality-gate-core/src/core/thresholds.rs
// ============================================================================
// Module: Threshold Evaluator
// Description: Pure minimum checks for scenario counts and line coverage.
// Purpose: Compare observed metrics against configured minimums.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every comparison is an inclusive `>=`: a value exactly equal to the
//! minimum passes. Count checks are always evaluated together so a report can
//! show both results even when one already fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default minimum number of scenarios with a non-empty id.
pub const DEFAULT_MIN_TOTAL: usize = 20;
/// Default minimum number of automated scenarios.
pub const DEFAULT_MIN_AUTOMATED: usize = 17;
/// Default minimum aggregate line coverage, in percent.
pub const DEFAULT_MIN_LINE_COVERAGE: f64 = 85.0;

// ============================================================================
// SECTION: Thresholds
// ============================================================================

/// Configured gate minimums.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum number of scenarios with a non-empty id.
    pub min_total: usize,
    /// Minimum number of automated scenarios.
    pub min_automated: usize,
    /// Minimum line coverage percentage (0-100).
    pub min_line_coverage: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_total: DEFAULT_MIN_TOTAL,
            min_automated: DEFAULT_MIN_AUTOMATED,
            min_line_coverage: DEFAULT_MIN_LINE_COVERAGE,
        }
    }
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Metric compared by a threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMetric {
    /// Scenarios with a non-empty id.
    TotalScenarios,
    /// Automated scenarios.
    AutomatedScenarios,
    /// Aggregate line coverage percentage.
    LineCoverage,
}

impl ThresholdMetric {
    /// Returns the stable snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TotalScenarios => "total_scenarios",
            Self::AutomatedScenarios => "automated_scenarios",
            Self::LineCoverage => "line_coverage",
        }
    }
}

impl fmt::Display for ThresholdMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one threshold comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCheck {
    /// Compared metric.
    pub metric: ThresholdMetric,
    /// Observed value.
    pub actual: f64,
    /// Required minimum.
    pub required: f64,
    /// Whether `actual >= required`.
    pub passed: bool,
}

impl ThresholdCheck {
    /// Compares an observed value against a minimum (inclusive, NaN fails).
    #[must_use]
    pub fn compare(metric: ThresholdMetric, actual: f64, required: f64) -> Self {
        Self {
            metric,
            actual,
            required,
            passed: actual >= required,
        }
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates the total and automated scenario counts. Both are always evaluated.
#[must_use]
pub fn evaluate_counts(
    total: usize,
    automated: usize,
    thresholds: &Thresholds,
) -> [ThresholdCheck; 2] {
    [
        ThresholdCheck::compare(
            ThresholdMetric::TotalScenarios,
            count_value(total),
            count_value(thresholds.min_total),
        ),
        ThresholdCheck::compare(
            ThresholdMetric::AutomatedScenarios,
            count_value(automated),
            count_value(thresholds.min_automated),
        ),
    ]
}

/// Evaluates a measured line coverage percentage.
#[must_use]
pub fn evaluate_coverage(percent: f64, thresholds: &Thresholds) -> ThresholdCheck {
    ThresholdCheck::compare(ThresholdMetric::LineCoverage, percent, thresholds.min_line_coverage)
}

/// Converts a count into the report's numeric representation.
#[allow(clippy::cast_precision_loss, reason = "Scenario counts are far below 2^52.")]
fn count_value(count: usize) -> f64 {
    count as f64
}
