// crates/quality-gate-providers/src/coverage.rs
// ============================================================================
// Module: Coverage Probes
// Description: cargo llvm-cov runner and pre-computed coverage report reader.
// Purpose: Produce one aggregate line coverage figure for the gate.
// Dependencies: quality-gate-core, serde, serde_json, tempfile
// ============================================================================

//! ## Overview
//! [`LlvmCovProbe`] runs `cargo llvm-cov` across the whole workspace and
//! parses its JSON summary export. [`ReportFileCoverageProbe`] reads the same
//! export from disk when a pipeline has already measured coverage. Both
//! report the aggregate `data[0].totals.lines` figures; the comparison with
//! the minimum happens in the orchestrator.
//!
//! The instrumented test binaries share the child's stdout, so the export is
//! never read from that stream. The probe appends `--output-path` pointing
//! into a scratch directory, forwards the child's stdout to our stderr, and
//! reads the export file once the command succeeds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;

use quality_gate_core::CoverageError;
use quality_gate_core::CoverageMeasurement;
use quality_gate_core::CoverageProbe;
use serde::Deserialize;
use serde::Serialize;
use tempfile::TempDir;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Label used for the default coverage tool.
pub const LLVM_COV_TOOL: &str = "cargo llvm-cov";
/// Remediation hint when the coverage tool is missing.
pub const LLVM_COV_INSTALL_HINT: &str = "cargo install cargo-llvm-cov";
/// Default coverage program.
pub const DEFAULT_COVERAGE_PROGRAM: &str = "cargo";
/// Default coverage arguments.
pub const DEFAULT_COVERAGE_ARGS: &[&str] =
    &["llvm-cov", "--workspace", "--all-targets", "--all-features", "--summary-only", "--json"];
/// Maximum coverage export size accepted.
pub const MAX_COVERAGE_REPORT_BYTES: usize = 16 * 1024 * 1024;
/// Label used for pre-computed coverage reports.
pub const REPORT_FILE_TOOL: &str = "coverage report";
/// Flag appended to the coverage command to name the export file.
pub const OUTPUT_PATH_FLAG: &str = "--output-path";

/// Export filename inside the probe's scratch directory.
const EXPORT_FILE_NAME: &str = "coverage-summary.json";

/// Stderr fragments emitted by cargo when a subcommand is not installed.
const MISSING_SUBCOMMAND_MARKERS: &[&str] = &["no such command", "no such subcommand"];

// ============================================================================
// SECTION: llvm-cov Export Model
// ============================================================================

/// Subset of the llvm-cov JSON export used by the gate.
#[derive(Debug, Deserialize)]
struct LlvmCovExport {
    /// Export entries; the first carries the workspace totals.
    data: Vec<LlvmCovData>,
}

/// One export entry.
#[derive(Debug, Deserialize)]
struct LlvmCovData {
    /// Aggregate totals.
    totals: LlvmCovTotals,
}

/// Aggregate totals by coverage kind.
#[derive(Debug, Deserialize)]
struct LlvmCovTotals {
    /// Line coverage totals.
    lines: LlvmCovSummary,
}

/// Coverage summary for one kind.
#[derive(Debug, Deserialize)]
struct LlvmCovSummary {
    /// Executable line count.
    count: Option<u64>,
    /// Covered line count.
    covered: Option<u64>,
    /// Covered percentage.
    percent: f64,
}

/// Parses an llvm-cov JSON summary export into a measurement.
///
/// # Errors
///
/// Returns [`CoverageError::Failed`] when the export is malformed, has no
/// entries, or reports a non-finite percentage.
pub fn parse_llvm_cov_summary(
    bytes: &[u8],
    tool: &str,
) -> Result<CoverageMeasurement, CoverageError> {
    let failed = |detail: String| CoverageError::Failed {
        tool: tool.to_string(),
        detail,
    };
    let export: LlvmCovExport = serde_json::from_slice(bytes)
        .map_err(|err| failed(format!("invalid coverage summary: {err}")))?;
    let totals = export
        .data
        .into_iter()
        .next()
        .map(|entry| entry.totals.lines)
        .ok_or_else(|| failed("coverage summary has no data entries".to_string()))?;
    if !totals.percent.is_finite() {
        return Err(failed("coverage summary percent is not finite".to_string()));
    }
    Ok(CoverageMeasurement {
        tool: tool.to_string(),
        line_percent: totals.percent,
        lines_covered: totals.covered,
        lines_total: totals.count,
    })
}

// ============================================================================
// SECTION: llvm-cov Probe
// ============================================================================

/// Configuration for the coverage command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlvmCovConfig {
    /// Program to spawn.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
    /// Working directory; the current directory when unset.
    pub working_dir: Option<PathBuf>,
}

impl Default for LlvmCovConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_COVERAGE_PROGRAM.to_string(),
            args: DEFAULT_COVERAGE_ARGS.iter().map(ToString::to_string).collect(),
            working_dir: None,
        }
    }
}

impl LlvmCovConfig {
    /// Returns the label used in measurements and failures.
    #[must_use]
    pub fn tool_label(&self) -> String {
        if self.program == DEFAULT_COVERAGE_PROGRAM
            && self.args.first().is_some_and(|arg| arg == "llvm-cov")
        {
            return LLVM_COV_TOOL.to_string();
        }
        self.program.clone()
    }
}

/// Coverage probe that runs the coverage command and parses its output.
pub struct LlvmCovProbe {
    /// Command configuration.
    config: LlvmCovConfig,
}

impl LlvmCovProbe {
    /// Creates a probe for the given command.
    #[must_use]
    pub const fn new(config: LlvmCovConfig) -> Self {
        Self {
            config,
        }
    }
}

impl CoverageProbe for LlvmCovProbe {
    fn measure(&self) -> Result<CoverageMeasurement, CoverageError> {
        let tool = self.config.tool_label();
        let failed = |detail: String| CoverageError::Failed {
            tool: tool.clone(),
            detail,
        };
        let scratch = TempDir::new()
            .map_err(|err| failed(format!("unable to create export directory: {err}")))?;
        let export_path = scratch.path().join(EXPORT_FILE_NAME);
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .arg(OUTPUT_PATH_FLAG)
            .arg(&export_path)
            .stdin(Stdio::null())
            .stdout(Stdio::from(io::stderr()))
            .stderr(Stdio::piped());
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }
        let output = command.output().map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                CoverageError::Unavailable {
                    tool: tool.clone(),
                    hint: LLVM_COV_INSTALL_HINT.to_string(),
                }
            } else {
                failed(format!("failed to spawn {}: {err}", self.config.program))
            }
        })?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            if MISSING_SUBCOMMAND_MARKERS.iter().any(|marker| stderr.contains(marker)) {
                return Err(CoverageError::Unavailable {
                    tool: tool.clone(),
                    hint: LLVM_COV_INSTALL_HINT.to_string(),
                });
            }
            let detail = match last_nonblank_line(&stderr) {
                Some(line) => format!("{}: {line}", output.status),
                None => output.status.to_string(),
            };
            return Err(failed(detail));
        }
        let bytes = match read_limited(&export_path, MAX_COVERAGE_REPORT_BYTES) {
            Ok(bytes) => bytes,
            Err(ReadFailure::Missing) => {
                return Err(failed(format!("coverage command did not write {EXPORT_FILE_NAME}")));
            }
            Err(err) => return Err(failed(err.describe(&export_path, MAX_COVERAGE_REPORT_BYTES))),
        };
        parse_llvm_cov_summary(&bytes, &tool)
    }
}

/// Returns the last non-blank line of tool output, trimmed.
fn last_nonblank_line(text: &str) -> Option<&str> {
    text.lines().rev().map(str::trim).find(|line| !line.is_empty())
}

// ============================================================================
// SECTION: Report File Probe
// ============================================================================

/// Coverage probe that reads a pre-computed llvm-cov JSON summary.
pub struct ReportFileCoverageProbe {
    /// Report path.
    path: PathBuf,
    /// Maximum report size.
    max_bytes: usize,
}

impl ReportFileCoverageProbe {
    /// Creates a probe for the report at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self {
            path,
            max_bytes: MAX_COVERAGE_REPORT_BYTES,
        }
    }

    /// Overrides the maximum report size.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl CoverageProbe for ReportFileCoverageProbe {
    fn measure(&self) -> Result<CoverageMeasurement, CoverageError> {
        let bytes = read_limited(&self.path, self.max_bytes).map_err(|err| match err {
            ReadFailure::Missing => CoverageError::Unavailable {
                tool: REPORT_FILE_TOOL.to_string(),
                hint: format!(
                    "{} not found; generate it with `cargo llvm-cov --summary-only --json \
                     --output-path {}`",
                    self.path.display(),
                    self.path.display()
                ),
            },
            other => CoverageError::Failed {
                tool: REPORT_FILE_TOOL.to_string(),
                detail: other.describe(&self.path, self.max_bytes),
            },
        })?;
        parse_llvm_cov_summary(&bytes, REPORT_FILE_TOOL)
    }
}

// ============================================================================
// SECTION: Bounded Read
// ============================================================================

/// Reasons a coverage export could not be read.
#[derive(Debug)]
enum ReadFailure {
    /// The file does not exist.
    Missing,
    /// Opening or reading failed.
    Io(io::Error),
    /// The file is larger than the limit.
    TooLarge,
}

impl ReadFailure {
    /// Formats the failure for a tool failure detail.
    fn describe(&self, path: &Path, max_bytes: usize) -> String {
        match self {
            Self::Missing => format!("{} not found", path.display()),
            Self::Io(err) => format!("unable to read {}: {err}", path.display()),
            Self::TooLarge => format!("{} exceeds size limit ({max_bytes} bytes)", path.display()),
        }
    }
}

/// Reads a coverage export while enforcing a maximum byte limit.
fn read_limited(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadFailure> {
    let file = File::open(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound { ReadFailure::Missing } else { ReadFailure::Io(err) }
    })?;
    let limit = u64::try_from(max_bytes.saturating_add(1)).map_err(|_| ReadFailure::TooLarge)?;
    let mut buf = Vec::new();
    file.take(limit).read_to_end(&mut buf).map_err(ReadFailure::Io)?;
    if buf.len() > max_bytes {
        return Err(ReadFailure::TooLarge);
    }
    Ok(buf)
}
