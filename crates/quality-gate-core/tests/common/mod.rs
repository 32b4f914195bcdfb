// crates/quality-gate-core/tests/common/mod.rs
// ============================================================================
// Module: Quality Gate Core Test Fixtures
// Description: Shared catalog builders and recording collaborators.
// Purpose: Keep integration tests focused on gate behavior.
// Dependencies: quality-gate-core, tempfile
// ============================================================================

#![allow(dead_code, reason = "Not every test binary uses every fixture.")]

use std::cell::RefCell;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use quality_gate_core::CoverageError;
use quality_gate_core::CoverageMeasurement;
use quality_gate_core::CoverageProbe;
use quality_gate_core::GateAuditEvent;
use quality_gate_core::GateAuditSink;
use quality_gate_core::GateOrchestratorConfig;
use quality_gate_core::Thresholds;
use tempfile::TempDir;

/// Catalog header used by every fixture.
pub const HEADER: &str = "id,service,priority,test_type,automated,test_ref,description";

/// One fixture row.
#[derive(Debug, Clone)]
pub struct Row {
    /// Scenario id.
    pub id: String,
    /// Raw automated marker.
    pub automated: String,
    /// Test reference.
    pub test_ref: String,
}

impl Row {
    pub fn automated(id: &str, test_ref: &str) -> Self {
        Self {
            id: id.to_string(),
            automated: "yes".to_string(),
            test_ref: test_ref.to_string(),
        }
    }

    pub fn manual(id: &str) -> Self {
        Self {
            id: id.to_string(),
            automated: "no".to_string(),
            test_ref: String::new(),
        }
    }

    pub fn with_marker(id: &str, marker: &str, test_ref: &str) -> Self {
        Self {
            id: id.to_string(),
            automated: marker.to_string(),
            test_ref: test_ref.to_string(),
        }
    }
}

/// Renders rows as catalog text.
pub fn catalog_text(rows: &[Row]) -> String {
    let mut text = String::from(HEADER);
    text.push('\n');
    for row in rows {
        writeln!(
            text,
            "{},core,High,Unit,{},{},scenario {}",
            row.id, row.automated, row.test_ref, row.id
        )
        .unwrap();
    }
    text
}

/// Builds the canonical passing catalog: `automated` automated rows with
/// refs `test_case_N`, followed by `manual` manual rows.
pub fn standard_rows(automated: usize, manual: usize) -> Vec<Row> {
    let mut rows = Vec::new();
    for index in 0 .. automated {
        rows.push(Row::automated(&format!("TS-{index:03}"), &test_name(index)));
    }
    for index in automated .. automated + manual {
        rows.push(Row::manual(&format!("TS-{index:03}")));
    }
    rows
}

/// Returns the test reference used for row `index`.
pub fn test_name(index: usize) -> String {
    format!("test_case_{index}")
}

/// Names referenced by the first `count` automated rows.
pub fn test_names(count: usize) -> Vec<String> {
    (0 .. count).map(test_name).collect()
}

/// Temporary catalog on disk.
pub struct CatalogFixture {
    /// Owning temp dir.
    pub dir: TempDir,
    /// Catalog file path.
    pub path: PathBuf,
}

impl CatalogFixture {
    pub fn write(rows: &[Row]) -> Self {
        Self::write_text(&catalog_text(rows))
    }

    pub fn write_text(text: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test_scenarios.csv");
        fs::write(&path, text).unwrap();
        Self {
            dir,
            path,
        }
    }

    pub fn config(&self) -> GateOrchestratorConfig {
        GateOrchestratorConfig {
            catalog_path: self.path.clone(),
            delimiter: ',',
            thresholds: Thresholds::default(),
        }
    }
}

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    /// Recorded events.
    pub events: RefCell<Vec<GateAuditEvent>>,
}

impl GateAuditSink for RecordingAuditSink {
    fn record(&self, event: &GateAuditEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Coverage probe that always fails with the given error.
pub struct FailingCoverageProbe {
    /// Report the tool as missing instead of failed.
    pub unavailable: bool,
}

impl CoverageProbe for FailingCoverageProbe {
    fn measure(&self) -> Result<CoverageMeasurement, CoverageError> {
        if self.unavailable {
            Err(CoverageError::Unavailable {
                tool: "cargo llvm-cov".to_string(),
                hint: "cargo install cargo-llvm-cov".to_string(),
            })
        } else {
            Err(CoverageError::Failed {
                tool: "cargo llvm-cov".to_string(),
                detail: "exit status 101".to_string(),
            })
        }
    }
}
