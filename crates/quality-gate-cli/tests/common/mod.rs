// crates/quality-gate-cli/tests/common/mod.rs
// ============================================================================
// Module: CLI Test Workspace
// Description: Temporary project layout and binary invocation helpers.
// Purpose: Run the quality-gate binary against isolated on-disk fixtures.
// Dependencies: tempfile
// ============================================================================

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use tempfile::TempDir;

/// Environment variables the binary reads; cleared so the host cannot leak in.
const GATE_ENV_VARS: &[&str] = &[
    "QUALITY_GATE_CONFIG",
    "MIN_TOTAL",
    "MIN_AUTOMATED",
    "MIN_LINES",
    "SCENARIO_CATALOG",
    "SOURCE_DIR",
    "COVERAGE_REPORT",
];

/// Coverage report file name inside the workspace.
pub const COVERAGE_FILE: &str = "coverage.json";

/// Returns the path of the compiled binary.
pub fn quality_gate_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_quality-gate"))
}

/// Temporary project directory holding a catalog, sources, and a coverage report.
pub struct GateWorkspace {
    /// Owned temporary directory.
    dir: TempDir,
}

impl GateWorkspace {
    /// Creates an empty workspace.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Creates the canonical passing project: 20 rows, 17 automated, every
    /// reference defined, coverage at `percent`.
    pub fn passing(percent: f64) -> Self {
        let workspace = Self::new();
        workspace.write_catalog(17, 3);
        workspace.write_sources(&test_names(17));
        workspace.write_coverage(percent);
        workspace
    }

    /// Returns the workspace root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    /// Writes `test_scenarios.csv` with `automated` automated rows followed by
    /// `manual` manual rows.
    pub fn write_catalog(&self, automated: usize, manual: usize) {
        let mut text = String::from("id,service,priority,test_type,automated,test_ref,description\n");
        for index in 1 ..= automated + manual {
            let (marker, test_ref) =
                if index <= automated { ("yes", test_name(index)) } else { ("no", String::new()) };
            writeln!(text, "TS-{index:03},core,High,Unit,{marker},{test_ref},scenario {index}")
                .unwrap();
        }
        self.write("test_scenarios.csv", &text);
    }

    /// Writes `src/lib.rs` declaring one test function per name.
    pub fn write_sources(&self, names: &[String]) {
        let mut text = String::from("#[cfg(test)]\nmod tests {\n");
        for name in names {
            writeln!(text, "    #[test]\n    fn {name}() {{}}\n").unwrap();
        }
        text.push_str("}\n");
        self.write("src/lib.rs", &text);
    }

    /// Writes an llvm-cov JSON summary reporting `percent` line coverage.
    pub fn write_coverage(&self, percent: f64) {
        let export = format!(
            r#"{{"type":"llvm.coverage.json.export","data":[{{"totals":{{"lines":{{"count":1000,"covered":850,"percent":{percent}}}}}}}]}}"#
        );
        self.write(COVERAGE_FILE, &export);
    }

    /// Builds a command running in the workspace with the coverage report set.
    pub fn command(&self) -> Command {
        let mut command = Command::new(quality_gate_bin());
        command.current_dir(self.path());
        for key in GATE_ENV_VARS {
            command.env_remove(key);
        }
        command.env("COVERAGE_REPORT", self.path().join(COVERAGE_FILE));
        command
    }

    /// Runs the binary with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().unwrap()
    }
}

/// Returns the test function name for catalog row `index`.
pub fn test_name(index: usize) -> String {
    format!("test_case_{index}")
}

/// Returns test names for rows `1..=count`.
pub fn test_names(count: usize) -> Vec<String> {
    (1 ..= count).map(test_name).collect()
}

/// Returns stdout as text.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Returns stderr as text.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
