// crates/quality-gate-core/src/runtime/memory.rs
// ============================================================================
// Module: In-Memory Collaborators
// Description: Fixed-answer search and coverage collaborators.
// Purpose: Drive the orchestrator without a source tree or coverage tool.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! In-memory collaborators answer from data supplied at construction. They
//! are deterministic and used for tests and for callers that already know
//! the answers (for example, a coverage figure computed elsewhere).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::Cell;
use std::collections::BTreeSet;

use crate::core::report::CoverageMeasurement;
use crate::interfaces::CoverageError;
use crate::interfaces::CoverageProbe;
use crate::interfaces::DefinitionSearch;
use crate::interfaces::SearchError;

// ============================================================================
// SECTION: Definition Search
// ============================================================================

/// Definition search backed by a fixed set of names.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDefinitionSearch {
    /// Known definition names.
    names: BTreeSet<String>,
}

impl InMemoryDefinitionSearch {
    /// Creates a search over the given definition names.
    #[must_use]
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl DefinitionSearch for InMemoryDefinitionSearch {
    fn find_definition(&self, name: &str) -> Result<bool, SearchError> {
        Ok(self.names.contains(name))
    }
}

// ============================================================================
// SECTION: Coverage Probe
// ============================================================================

/// Coverage probe that returns a fixed percentage and counts invocations.
#[derive(Debug)]
pub struct FixedCoverageProbe {
    /// Percentage reported on every call.
    percent: f64,
    /// Number of times `measure` was called.
    calls: Cell<usize>,
}

impl FixedCoverageProbe {
    /// Creates a probe that always reports `percent`.
    #[must_use]
    pub const fn new(percent: f64) -> Self {
        Self {
            percent,
            calls: Cell::new(0),
        }
    }

    /// Returns how many times the probe was invoked.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl CoverageProbe for FixedCoverageProbe {
    fn measure(&self) -> Result<CoverageMeasurement, CoverageError> {
        self.calls.set(self.calls.get().saturating_add(1));
        Ok(CoverageMeasurement {
            tool: "fixed".to_string(),
            line_percent: self.percent,
            lines_covered: None,
            lines_total: None,
        })
    }
}
