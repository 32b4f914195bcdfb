// crates/quality-gate-providers/tests/common/mod.rs
// ============================================================================
// Module: Common Provider Test Fixtures
// Description: Source tree and coverage export builders.
// Purpose: Share on-disk fixtures across provider tests.
// Dependencies: tempfile
// ============================================================================

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

use std::fs;
use std::path::Path;

/// Writes `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Returns a minimal llvm-cov JSON summary export.
pub fn llvm_cov_export(percent: f64, covered: u64, count: u64) -> String {
    format!(
        r#"{{"type":"llvm.coverage.json.export","version":"2.0.1","data":[{{"totals":{{"lines":{{"count":{count},"covered":{covered},"percent":{percent}}},"functions":{{"count":1,"covered":1,"percent":100.0}}}}}}]}}"#
    )
}
