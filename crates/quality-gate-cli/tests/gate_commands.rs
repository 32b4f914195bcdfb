// crates/quality-gate-cli/tests/gate_commands.rs
// ============================================================================
// Module: CLI Gate Command Tests
// Description: End-to-end runs of the gate, check, and summary commands.
// Purpose: Ensure exit codes and reports follow the gate verdict.
// Dependencies: quality-gate-cli binary, serde_json, tempfile
// ============================================================================

//! CLI gate command integration tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::fs;

use serde_json::Value;

use crate::common::GateWorkspace;
use crate::common::stderr;
use crate::common::stdout;
use crate::common::test_name;
use crate::common::test_names;

// ============================================================================
// SECTION: Full Gate
// ============================================================================

/// Verifies the minimum passing project exits zero with no subcommand.
#[test]
fn gate_passes_at_exact_minimums() {
    let workspace = GateWorkspace::passing(85.0);
    let output = workspace.run(&[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("Quality gate: PASS (phase: passed)"), "stdout: {text}");
    assert!(text.contains("[ok] line_coverage: 85.00% (minimum 85.00%)"));
}

/// Verifies `gate` is the same as running with no subcommand.
#[test]
fn gate_subcommand_matches_default() {
    let workspace = GateWorkspace::passing(90.0);
    let implicit = workspace.run(&["--format", "json"]);
    let explicit = workspace.run(&["gate", "--format", "json"]);

    assert!(implicit.status.success());
    assert_eq!(implicit.stdout, explicit.stdout);
}

/// Verifies a renamed definition fails the scenario gate and names only that row.
#[test]
fn renamed_definition_fails_before_coverage() {
    let workspace = GateWorkspace::new();
    workspace.write_catalog(17, 3);
    let mut names = test_names(17);
    names[3] = "test_case_4_renamed".to_string();
    workspace.write_sources(&names);

    let output = workspace.run(&["--format", "json"]);

    assert!(!output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["verdict"], "fail");
    assert_eq!(report["coverage"], Value::Null);
    let missing = report["missing_references"].as_array().unwrap();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0]["id"], "TS-004");
    assert_eq!(missing[0]["reason"], test_name(4));
    let failures = report["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["kind"], "missing_test_references");
    assert!(stderr(&output).contains("Quality gate failed with 1 problem(s)."));
}

/// Verifies coverage one hundredth below the minimum fails.
#[test]
fn coverage_below_minimum_fails() {
    let workspace = GateWorkspace::passing(84.99);
    let output = workspace.run(&[]);

    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.contains("line coverage 84.99% is below the minimum 85.00%"), "stdout: {text}");
}

/// Verifies a missing coverage report is reported as an unavailable tool.
#[test]
fn missing_coverage_report_is_unavailable() {
    let workspace = GateWorkspace::passing(90.0);
    fs::remove_file(workspace.path().join(common::COVERAGE_FILE)).unwrap();
    let output = workspace.run(&[]);

    assert!(!output.status.success());
    assert!(stdout(&output).contains("coverage report is unavailable"));
}

/// Verifies threshold overrides from the environment apply.
#[test]
fn environment_overrides_lower_minimums() {
    let workspace = GateWorkspace::new();
    workspace.write_catalog(5, 0);
    workspace.write_sources(&test_names(5));
    workspace.write_coverage(50.0);

    let output = workspace
        .command()
        .env("MIN_TOTAL", "5")
        .env("MIN_AUTOMATED", "5")
        .env("MIN_LINES", "50")
        .output()
        .unwrap();

    assert!(output.status.success(), "stdout: {}", stdout(&output));
}

/// Verifies a missing catalog fails with a clear reason.
#[test]
fn missing_catalog_fails() {
    let workspace = GateWorkspace::new();
    workspace.write_sources(&test_names(1));
    let output = workspace.run(&[]);

    assert!(!output.status.success());
    assert!(stdout(&output).contains("scenario catalog not found"));
}

/// Verifies markdown output carries the report title and failures.
#[test]
fn markdown_report_lists_failures() {
    let workspace = GateWorkspace::new();
    workspace.write_catalog(16, 3);
    workspace.write_sources(&test_names(16));
    workspace.write_coverage(90.0);

    let output = workspace.run(&["--format", "markdown"]);

    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("# Quality Gate Report"));
    assert!(text.contains("- scenario count 19 is below the minimum 20"));
    assert!(text.contains("- automated scenario count 16 is below the minimum 17"));
}

/// Verifies audit events are appended to the configured file.
#[test]
fn audit_log_records_each_transition() {
    let workspace = GateWorkspace::passing(90.0);
    workspace.write("quality-gate.toml", "[audit]\nenabled = true\npath = \"audit.jsonl\"\n");

    let output = workspace.run(&[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let log = fs::read_to_string(workspace.path().join("audit.jsonl")).unwrap();
    let phases: Vec<String> = log
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap()["phase"].to_string())
        .collect();
    assert_eq!(phases, vec![
        "\"catalog_loaded\"",
        "\"scenario_gate_passed\"",
        "\"coverage_measured\"",
        "\"passed\"",
    ]);
}

// ============================================================================
// SECTION: Scenario Gate
// ============================================================================

/// Verifies `check` passes without ever reading coverage.
#[test]
fn check_skips_coverage() {
    let workspace = GateWorkspace::passing(10.0);
    let output = workspace.run(&["check"]);

    assert!(output.status.success(), "stdout: {}", stdout(&output));
    let text = stdout(&output);
    assert!(text.contains("phase: scenario_gate_passed"));
    assert!(!text.contains("Coverage:"));
}

/// Verifies `check` reports an automated row with no test reference.
#[test]
fn check_reports_missing_test_ref() {
    let workspace = GateWorkspace::passing(90.0);
    let catalog = fs::read_to_string(workspace.path().join("test_scenarios.csv")).unwrap();
    workspace.write("test_scenarios.csv", &catalog.replace(",yes,test_case_9,", ",yes,,"));

    let output = workspace.run(&["check"]);

    assert!(!output.status.success());
    assert!(stdout(&output).contains("  TS-009: missing_test_ref"));
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Verifies the summary command reports counts and breakdowns.
#[test]
fn summary_reports_catalog_composition() {
    let workspace = GateWorkspace::passing(90.0);
    let output = workspace.run(&["summary", "--format", "json"]);

    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["total"], 20);
    assert_eq!(value["summary"]["automated"], 17);
    assert_eq!(value["summary"]["by_service"]["core"], 20);
}

/// Verifies the summary command fails on a missing catalog.
#[test]
fn summary_fails_without_catalog() {
    let workspace = GateWorkspace::new();
    let output = workspace.run(&["summary"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to load scenario catalog"));
}
