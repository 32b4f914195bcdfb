// crates/quality-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Quality Gate Interfaces
// Description: Collaborator interfaces for source search and coverage measurement.
// Purpose: Define the contract surfaces the gate orchestrator depends on.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The orchestrator never walks the filesystem or spawns processes itself.
//! Source search and coverage measurement are reached through these traits so
//! matching strategies and coverage tools can change without touching gate
//! logic. Implementations must be read-only and fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::report::CoverageMeasurement;

// ============================================================================
// SECTION: Definition Search
// ============================================================================

/// Source search errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A configured source root does not exist.
    #[error("source directory not found: {0}")]
    SourceDirMissing(String),
    /// The source tree could not be read.
    #[error("source search failed: {0}")]
    Io(String),
}

/// Locates test definitions by exact name.
pub trait DefinitionSearch {
    /// Returns true when a callable/test definition named `name` exists.
    ///
    /// Matches must be declarations, not substrings in comments or strings.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] when the source tree cannot be searched.
    fn find_definition(&self, name: &str) -> Result<bool, SearchError>;
}

impl<T: DefinitionSearch + ?Sized> DefinitionSearch for &T {
    fn find_definition(&self, name: &str) -> Result<bool, SearchError> {
        (**self).find_definition(name)
    }
}

impl<T: DefinitionSearch + ?Sized> DefinitionSearch for Box<T> {
    fn find_definition(&self, name: &str) -> Result<bool, SearchError> {
        (**self).find_definition(name)
    }
}

// ============================================================================
// SECTION: Coverage Probe
// ============================================================================

/// Coverage measurement errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoverageError {
    /// The coverage tool is not installed or cannot be started.
    #[error("{tool} is unavailable ({hint})")]
    Unavailable {
        /// Tool label.
        tool: String,
        /// Remediation hint.
        hint: String,
    },
    /// The tool ran but failed or produced unusable output.
    #[error("{tool} failed: {detail}")]
    Failed {
        /// Tool label.
        tool: String,
        /// Failure detail.
        detail: String,
    },
}

/// Measures aggregate line coverage for the workspace.
///
/// Calls block until the measurement finishes; there is no cancellation.
pub trait CoverageProbe {
    /// Runs (or reads) the coverage measurement.
    ///
    /// # Errors
    ///
    /// Returns [`CoverageError`] when the tool is unavailable or fails.
    fn measure(&self) -> Result<CoverageMeasurement, CoverageError>;
}

impl<T: CoverageProbe + ?Sized> CoverageProbe for &T {
    fn measure(&self) -> Result<CoverageMeasurement, CoverageError> {
        (**self).measure()
    }
}

impl<T: CoverageProbe + ?Sized> CoverageProbe for Box<T> {
    fn measure(&self) -> Result<CoverageMeasurement, CoverageError> {
        (**self).measure()
    }
}
