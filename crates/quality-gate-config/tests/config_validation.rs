// crates/quality-gate-config/tests/config_validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Fail-closed validation of thresholds, paths, and checks.
// Purpose: Ensure invalid configuration is rejected before any gate runs.
// =============================================================================

//! Config validation tests for quality-gate-config.

use std::path::PathBuf;

use quality_gate_config::ConfigError;
use quality_gate_config::GateConfig;
use quality_gate_providers::CommandCheckConfig;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn default_config_validates() -> TestResult {
    GateConfig::default().validate().map_err(|err| err.to_string())
}

#[test]
fn coverage_minimum_must_be_a_percentage() -> TestResult {
    let mut config = GateConfig::default();
    config.thresholds.min_line_coverage = 100.5;
    assert_invalid(config.validate(), "thresholds.min_line_coverage must be between 0 and 100")?;
    config.thresholds.min_line_coverage = f64::NAN;
    assert_invalid(config.validate(), "thresholds.min_line_coverage")?;
    config.thresholds.min_line_coverage = -1.0;
    assert_invalid(config.validate(), "thresholds.min_line_coverage")
}

#[test]
fn coverage_minimum_bounds_are_inclusive() -> TestResult {
    let mut config = GateConfig::default();
    config.thresholds.min_line_coverage = 0.0;
    config.validate().map_err(|err| err.to_string())?;
    config.thresholds.min_line_coverage = 100.0;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn empty_catalog_path_is_rejected() -> TestResult {
    let mut config = GateConfig::default();
    config.catalog.path = PathBuf::new();
    assert_invalid(config.validate(), "catalog.path must be non-empty")
}

#[test]
fn quote_delimiter_is_rejected() -> TestResult {
    let mut config = GateConfig::default();
    config.catalog.delimiter = '"';
    assert_invalid(config.validate(), "catalog.delimiter")
}

#[test]
fn source_dirs_must_be_non_empty() -> TestResult {
    let mut config = GateConfig::default();
    config.source.dirs.clear();
    assert_invalid(config.validate(), "source.dirs must be non-empty")
}

#[test]
fn source_extensions_omit_the_dot() -> TestResult {
    let mut config = GateConfig::default();
    config.source.extensions = vec![".rs".to_string()];
    assert_invalid(config.validate(), "source.extensions")
}

#[test]
fn coverage_program_must_be_non_empty() -> TestResult {
    let mut config = GateConfig::default();
    config.coverage.program = "  ".to_string();
    assert_invalid(config.validate(), "coverage.program must be non-empty")
}

#[test]
fn check_names_must_be_unique() -> TestResult {
    let mut config = GateConfig::default();
    config.checks = vec![
        CommandCheckConfig::new("lint", "cargo", &["clippy"]),
        CommandCheckConfig::new("lint", "cargo", &["fmt"]),
    ];
    assert_invalid(config.validate(), "checks.name must be unique: lint")
}

#[test]
fn check_program_must_be_non_empty() -> TestResult {
    let mut config = GateConfig::default();
    config.checks = vec![CommandCheckConfig::new("fmt", "", &[])];
    assert_invalid(config.validate(), "checks.fmt.program must be non-empty")
}

#[test]
fn check_working_dir_must_be_non_empty() -> TestResult {
    let mut config = GateConfig::default();
    config.checks = vec![CommandCheckConfig::new("fmt", "cargo", &["fmt"]).with_working_dir(" ")];
    assert_invalid(config.validate(), "checks.fmt.working_dir must be non-empty")
}

#[test]
fn non_numeric_threshold_override_is_rejected() -> TestResult {
    let mut config = GateConfig::default();
    let result = config
        .apply_env_overrides(|key| (key == "MIN_AUTOMATED").then(|| "many".to_string()));
    assert_invalid(result, "MIN_AUTOMATED must be a non-negative integer")
}

#[test]
fn out_of_range_coverage_override_fails_validation() -> TestResult {
    let result = GateConfig::load_with_env(None, |key| {
        (key == "MIN_LINES").then(|| "150".to_string())
    })
    .map(|_| ());
    assert_invalid(result, "thresholds.min_line_coverage")
}
