// crates/quality-gate-core/src/core/scenario.rs
// ============================================================================
// Module: Scenario Records
// Description: Typed view of a single scenario catalog row.
// Purpose: Normalize raw catalog fields into priorities, test types, and flags.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ScenarioRecord`] is one data row of the scenario catalog. Only `id`,
//! `automated` and `test_ref` drive gate decisions; priority, test type and
//! service are carried for reporting.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ScenarioId;
use crate::core::identifiers::TestRef;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// The only `automated` value that marks a scenario as automated.
pub const AUTOMATED_MARKER: &str = "yes";

// ============================================================================
// SECTION: Priority
// ============================================================================

/// Scenario priority label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Critical priority.
    Critical,
    /// High priority.
    High,
    /// Medium priority.
    Medium,
    /// Low priority.
    Low,
    /// No priority recorded.
    Unspecified,
    /// Unrecognized label, kept verbatim.
    Other(String),
}

impl Priority {
    /// Parses a raw priority field (case-insensitive).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Self::Unspecified,
            "critical" | "p0" => Self::Critical,
            "high" | "p1" => Self::High,
            "medium" | "p2" => Self::Medium,
            "low" | "p3" => Self::Low,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unspecified => "Unspecified",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Test Type
// ============================================================================

/// Scenario test category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    /// Unit test.
    Unit,
    /// Integration test.
    Integration,
    /// Regression or end-to-end test.
    Regression,
    /// No test type recorded.
    Unspecified,
    /// Unrecognized label, kept verbatim.
    Other(String),
}

impl TestType {
    /// Parses a raw test type field (case-insensitive).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Self::Unspecified,
            "unit" => Self::Unit,
            "integration" => Self::Integration,
            "regression" | "e2e" | "regression/e2e" | "end-to-end" => Self::Regression,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Unit => "Unit",
            Self::Integration => "Integration",
            Self::Regression => "Regression/E2E",
            Self::Unspecified => "Unspecified",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Scenario Record
// ============================================================================

/// One scenario row from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// 1-based line number in the catalog file.
    pub line: usize,
    /// Scenario identifier (may be empty for malformed rows).
    pub id: ScenarioId,
    /// Subsystem tag.
    pub service: String,
    /// Priority label.
    pub priority: Priority,
    /// Test category.
    pub test_type: TestType,
    /// Whether the scenario is backed by an automated test.
    pub automated: bool,
    /// Test definition backing the scenario.
    pub test_ref: TestRef,
    /// Free-form description.
    pub description: String,
}

impl ScenarioRecord {
    /// Builds a record from positional catalog fields.
    ///
    /// Missing trailing fields are treated as empty.
    #[must_use]
    pub fn from_fields(line: usize, fields: &[String]) -> Self {
        let field = |index: usize| fields.get(index).map_or("", |value| value.trim());
        Self {
            line,
            id: ScenarioId::new(field(0)),
            service: field(1).to_string(),
            priority: Priority::parse(field(2)),
            test_type: TestType::parse(field(3)),
            automated: is_automated_marker(field(4)),
            test_ref: TestRef::new(field(5)),
            description: field(6).to_string(),
        }
    }

    /// Returns true when the record has a non-empty identifier.
    #[must_use]
    pub const fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Returns true when a raw `automated` field marks the scenario as automated.
#[must_use]
pub fn is_automated_marker(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(AUTOMATED_MARKER)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn automated_marker_ignores_case_and_padding() {
        assert!(is_automated_marker("yes"));
        assert!(is_automated_marker("Yes"));
        assert!(is_automated_marker(" YES "));
        assert!(!is_automated_marker("no"));
        assert!(!is_automated_marker(""));
        assert!(!is_automated_marker("true"));
        assert!(!is_automated_marker("y"));
    }

    #[test]
    fn unknown_labels_are_kept_verbatim() {
        assert_eq!(Priority::parse("Blocker"), Priority::Other("Blocker".to_string()));
        assert_eq!(TestType::parse(" Fuzz "), TestType::Other("Fuzz".to_string()));
        assert_eq!(TestType::parse("E2E"), TestType::Regression);
        assert_eq!(Priority::parse(""), Priority::Unspecified);
    }

    #[test]
    fn short_rows_fill_missing_fields() {
        let fields = vec!["S-01".to_string(), "ec2".to_string()];
        let record = ScenarioRecord::from_fields(2, &fields);
        assert_eq!(record.id.as_str(), "S-01");
        assert!(!record.automated);
        assert!(record.test_ref.is_empty());
        assert_eq!(record.test_type, TestType::Unspecified);
    }
}
