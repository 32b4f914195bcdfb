// crates/quality-gate-core/src/runtime/verifier.rs
// ============================================================================
// Module: Reference Verifier
// Description: Cross-checks automated scenarios against source definitions.
// Purpose: Collect every automated scenario whose test reference cannot resolve.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The verifier walks every automated record in catalog order. An empty
//! `test_ref` is reported as `missing_test_ref` without searching; otherwise
//! the [`DefinitionSearch`] collaborator decides. All records are processed
//! before returning so a single run reports every problem.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ScenarioCatalog;
use crate::core::report::MissingReference;
use crate::interfaces::DefinitionSearch;
use crate::interfaces::SearchError;

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Verifies automated scenario references through a search collaborator.
pub struct ReferenceVerifier<S> {
    /// Definition search backend.
    search: S,
}

impl<S: DefinitionSearch> ReferenceVerifier<S> {
    /// Creates a verifier over the given search backend.
    #[must_use]
    pub const fn new(search: S) -> Self {
        Self {
            search,
        }
    }

    /// Returns every missing reference in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] when the search backend cannot run at all.
    pub fn verify(&self, catalog: &ScenarioCatalog) -> Result<Vec<MissingReference>, SearchError> {
        let mut missing = Vec::new();
        for record in catalog.automated() {
            if record.test_ref.is_empty() {
                missing.push(MissingReference::missing_test_ref(record.id.clone(), record.line));
                continue;
            }
            if !self.search.find_definition(record.test_ref.as_str())? {
                missing.push(MissingReference::unresolved(
                    record.id.clone(),
                    record.line,
                    &record.test_ref,
                ));
            }
        }
        Ok(missing)
    }
}
