// crates/quality-gate-config/src/config.rs
// ============================================================================
// Module: Quality Gate Configuration
// Description: Configuration loading, environment overrides, and validation.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: quality-gate-core, quality-gate-providers, serde, toml
// ============================================================================

//! ## Overview
//! Configuration resolves in this order: an explicit path, the
//! `QUALITY_GATE_CONFIG` variable, `quality-gate.toml` in the working
//! directory when present, then built-in defaults. An explicit path that
//! does not exist is an error. Environment overrides (`MIN_TOTAL`,
//! `MIN_AUTOMATED`, `MIN_LINES`, `SCENARIO_CATALOG`, `SOURCE_DIR`,
//! `COVERAGE_REPORT`) are applied after the file, then the result is
//! validated.
//!
//! Environment access goes through an injected lookup function so callers
//! and tests control it explicitly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use quality_gate_core::DEFAULT_CATALOG_FILE;
use quality_gate_core::DEFAULT_DELIMITER;
use quality_gate_core::DEFAULT_MIN_AUTOMATED;
use quality_gate_core::DEFAULT_MIN_LINE_COVERAGE;
use quality_gate_core::DEFAULT_MIN_TOTAL;
use quality_gate_core::GateOrchestratorConfig;
use quality_gate_core::Thresholds;
use quality_gate_providers::CommandCheckConfig;
use quality_gate_providers::LlvmCovConfig;
use quality_gate_providers::SourceSearchConfig;
use quality_gate_providers::coverage::DEFAULT_COVERAGE_ARGS;
use quality_gate_providers::coverage::DEFAULT_COVERAGE_PROGRAM;
use quality_gate_providers::default_checks;
use quality_gate_providers::search::DEFAULT_MAX_SOURCE_FILE_BYTES;
use quality_gate_providers::search::DEFAULT_SOURCE_DIR;
use quality_gate_providers::search::DEFAULT_SOURCE_EXTENSION;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "quality-gate.toml";
/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "QUALITY_GATE_CONFIG";
/// Environment override for the minimum scenario count.
pub const MIN_TOTAL_ENV_VAR: &str = "MIN_TOTAL";
/// Environment override for the minimum automated scenario count.
pub const MIN_AUTOMATED_ENV_VAR: &str = "MIN_AUTOMATED";
/// Environment override for the minimum line coverage percentage.
pub const MIN_LINES_ENV_VAR: &str = "MIN_LINES";
/// Environment override for the catalog path.
pub const SCENARIO_CATALOG_ENV_VAR: &str = "SCENARIO_CATALOG";
/// Environment override for the single source search root.
pub const SOURCE_DIR_ENV_VAR: &str = "SOURCE_DIR";
/// Environment override pointing at a pre-computed coverage report.
pub const COVERAGE_REPORT_ENV_VAR: &str = "COVERAGE_REPORT";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of source roots.
pub(crate) const MAX_SOURCE_DIRS: usize = 64;
/// Maximum number of external checks.
pub(crate) const MAX_CHECKS: usize = 64;
/// Maximum length of a check name.
pub(crate) const MAX_CHECK_NAME_LENGTH: usize = 64;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Quality gate configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Scenario catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Gate minimums.
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    /// Source search settings.
    #[serde(default)]
    pub source: SourceConfig,
    /// Coverage tool settings.
    #[serde(default)]
    pub coverage: CoverageConfig,
    /// Audit log settings.
    #[serde(default)]
    pub audit: AuditConfig,
    /// External format and lint checks.
    #[serde(default = "default_checks")]
    pub checks: Vec<CommandCheckConfig>,
    /// File the configuration was read from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            thresholds: ThresholdsConfig::default(),
            source: SourceConfig::default(),
            coverage: CoverageConfig::default(),
            audit: AuditConfig::default(),
            checks: default_checks(),
            source_path: None,
        }
    }
}

impl GateConfig {
    /// Loads configuration using the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overriding, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| env::var(key).ok())
    }

    /// Loads configuration with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overriding, or validation fails.
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match resolve_path(path, &lookup)? {
            Some(resolved) => Self::read_file(&resolved)?,
            None => Self::default(),
        };
        config.apply_env_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses one config file without overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable or malformed.
    pub fn read_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = read_bytes_with_limit(path, MAX_CONFIG_FILE_SIZE)?;
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::parse(content)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses configuration text without overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the TOML is malformed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies environment overrides on top of file values.
    ///
    /// Unset and blank variables leave the file value in place.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a numeric override does not parse.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key).map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
        };
        if let Some(value) = read(MIN_TOTAL_ENV_VAR) {
            self.thresholds.min_total = parse_count(MIN_TOTAL_ENV_VAR, &value)?;
        }
        if let Some(value) = read(MIN_AUTOMATED_ENV_VAR) {
            self.thresholds.min_automated = parse_count(MIN_AUTOMATED_ENV_VAR, &value)?;
        }
        if let Some(value) = read(MIN_LINES_ENV_VAR) {
            self.thresholds.min_line_coverage = value.parse().map_err(|_| {
                ConfigError::Invalid(format!("{MIN_LINES_ENV_VAR} must be a number"))
            })?;
        }
        if let Some(value) = read(SCENARIO_CATALOG_ENV_VAR) {
            self.catalog.path = PathBuf::from(value);
        }
        if let Some(value) = read(SOURCE_DIR_ENV_VAR) {
            self.source.dirs = vec![PathBuf::from(value)];
        }
        if let Some(value) = read(COVERAGE_REPORT_ENV_VAR) {
            self.coverage.report_path = Some(PathBuf::from(value));
        }
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog.validate()?;
        self.thresholds.validate()?;
        self.source.validate()?;
        self.coverage.validate()?;
        self.audit.validate()?;
        validate_checks(&self.checks)
    }

    /// Builds the orchestrator configuration.
    #[must_use]
    pub fn orchestrator_config(&self) -> GateOrchestratorConfig {
        GateOrchestratorConfig {
            catalog_path: self.catalog.path.clone(),
            delimiter: self.catalog.delimiter,
            thresholds: self.thresholds.to_thresholds(),
        }
    }

    /// Builds the definition search configuration.
    #[must_use]
    pub fn search_config(&self) -> SourceSearchConfig {
        SourceSearchConfig {
            roots: self.source.dirs.clone(),
            extensions: self.source.extensions.clone(),
            max_file_bytes: self.source.max_file_bytes,
        }
    }

    /// Builds the coverage command configuration.
    #[must_use]
    pub fn llvm_cov_config(&self) -> LlvmCovConfig {
        LlvmCovConfig {
            program: self.coverage.program.clone(),
            args: self.coverage.args.clone(),
            working_dir: self.coverage.working_dir.clone(),
        }
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|err| ConfigError::Parse(err.to_string()))
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Scenario catalog settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog file path.
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
    /// Field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            delimiter: default_delimiter(),
        }
    }
}

impl CatalogConfig {
    /// Validates catalog settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("catalog.path", &self.path.to_string_lossy())?;
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(ConfigError::Invalid(
                "catalog.delimiter must not be a quote or line break".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Thresholds
// ============================================================================

/// Gate minimums.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// Minimum number of scenarios with a non-empty id.
    #[serde(default = "default_min_total")]
    pub min_total: usize,
    /// Minimum number of automated scenarios.
    #[serde(default = "default_min_automated")]
    pub min_automated: usize,
    /// Minimum line coverage percentage.
    #[serde(default = "default_min_line_coverage")]
    pub min_line_coverage: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            min_total: default_min_total(),
            min_automated: default_min_automated(),
            min_line_coverage: default_min_line_coverage(),
        }
    }
}

impl ThresholdsConfig {
    /// Validates threshold ranges.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_line_coverage.is_finite()
            || !(0.0 ..= 100.0).contains(&self.min_line_coverage)
        {
            return Err(ConfigError::Invalid(
                "thresholds.min_line_coverage must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }

    /// Converts into core thresholds.
    #[must_use]
    pub const fn to_thresholds(&self) -> Thresholds {
        Thresholds {
            min_total: self.min_total,
            min_automated: self.min_automated,
            min_line_coverage: self.min_line_coverage,
        }
    }
}

// ============================================================================
// SECTION: Source Search
// ============================================================================

/// Source search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source roots searched for test definitions.
    #[serde(default = "default_source_dirs")]
    pub dirs: Vec<PathBuf>,
    /// Source file extensions (without the dot).
    #[serde(default = "default_source_extensions")]
    pub extensions: Vec<String>,
    /// Files above this size are skipped.
    #[serde(default = "default_max_source_file_bytes")]
    pub max_file_bytes: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dirs: default_source_dirs(),
            extensions: default_source_extensions(),
            max_file_bytes: default_max_source_file_bytes(),
        }
    }
}

impl SourceConfig {
    /// Validates source search settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.dirs.is_empty() {
            return Err(ConfigError::Invalid("source.dirs must be non-empty".to_string()));
        }
        if self.dirs.len() > MAX_SOURCE_DIRS {
            return Err(ConfigError::Invalid("source.dirs exceeds max entries".to_string()));
        }
        for dir in &self.dirs {
            validate_path_string("source.dirs", &dir.to_string_lossy())?;
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Invalid("source.extensions must be non-empty".to_string()));
        }
        for extension in &self.extensions {
            let trimmed = extension.trim();
            if trimmed.is_empty() || trimmed.starts_with('.') {
                return Err(ConfigError::Invalid(
                    "source.extensions entries must be non-empty and omit the dot".to_string(),
                ));
            }
        }
        if self.max_file_bytes == 0 {
            return Err(ConfigError::Invalid("source.max_file_bytes must be positive".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Coverage
// ============================================================================

/// Coverage tool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Program spawned to measure coverage.
    #[serde(default = "default_coverage_program")]
    pub program: String,
    /// Arguments passed to the coverage program.
    #[serde(default = "default_coverage_args")]
    pub args: Vec<String>,
    /// Working directory for the coverage program.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    /// Pre-computed llvm-cov JSON summary; skips running the program.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            program: default_coverage_program(),
            args: default_coverage_args(),
            working_dir: None,
            report_path: None,
        }
    }
}

impl CoverageConfig {
    /// Validates coverage settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.program.trim().is_empty() {
            return Err(ConfigError::Invalid("coverage.program must be non-empty".to_string()));
        }
        if let Some(dir) = &self.working_dir {
            validate_path_string("coverage.working_dir", &dir.to_string_lossy())?;
        }
        if let Some(path) = &self.report_path {
            validate_path_string("coverage.report_path", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit log settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Emit JSON-line audit events for gate transitions.
    #[serde(default)]
    pub enabled: bool,
    /// Append events to this file instead of stderr.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the flag, environment, or default file.
///
/// Returns `None` when no file was requested and the default is absent.
fn resolve_path<F>(path: Option<&Path>, lookup: &F) -> Result<Option<PathBuf>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = lookup(CONFIG_ENV_VAR).filter(|value| !value.trim().is_empty()) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default.is_file().then_some(default))
}

/// Reads a config file while enforcing a maximum byte limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ConfigError> {
    let io_error = |err: io::Error| ConfigError::Io(format!("{}: {err}", path.display()));
    let file = File::open(path).map_err(io_error)?;
    let limit = u64::try_from(max_bytes.saturating_add(1))
        .map_err(|_| ConfigError::Invalid("config size limit exceeds u64".to_string()))?;
    let mut bytes = Vec::new();
    file.take(limit).read_to_end(&mut bytes).map_err(io_error)?;
    if bytes.len() > max_bytes {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    Ok(bytes)
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates the external check list.
fn validate_checks(checks: &[CommandCheckConfig]) -> Result<(), ConfigError> {
    if checks.len() > MAX_CHECKS {
        return Err(ConfigError::Invalid("checks exceeds max entries".to_string()));
    }
    let mut names = BTreeSet::new();
    for check in checks {
        let name = check.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Invalid("checks.name must be non-empty".to_string()));
        }
        if name.len() > MAX_CHECK_NAME_LENGTH {
            return Err(ConfigError::Invalid("checks.name exceeds max length".to_string()));
        }
        if !names.insert(name) {
            return Err(ConfigError::Invalid(format!("checks.name must be unique: {name}")));
        }
        if check.program.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("checks.{name}.program must be non-empty")));
        }
        if let Some(dir) = &check.working_dir {
            validate_path_string(&format!("checks.{name}.working_dir"), &dir.to_string_lossy())?;
        }
    }
    Ok(())
}

/// Parses a non-negative integer override.
fn parse_count(key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{key} must be a non-negative integer")))
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default catalog path.
fn default_catalog_path() -> PathBuf {
    PathBuf::from(DEFAULT_CATALOG_FILE)
}

/// Default catalog delimiter.
const fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

/// Default minimum scenario count.
const fn default_min_total() -> usize {
    DEFAULT_MIN_TOTAL
}

/// Default minimum automated count.
const fn default_min_automated() -> usize {
    DEFAULT_MIN_AUTOMATED
}

/// Default minimum line coverage.
const fn default_min_line_coverage() -> f64 {
    DEFAULT_MIN_LINE_COVERAGE
}

/// Default source roots.
fn default_source_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from(DEFAULT_SOURCE_DIR)]
}

/// Default source extensions.
fn default_source_extensions() -> Vec<String> {
    vec![DEFAULT_SOURCE_EXTENSION.to_string()]
}

/// Default per-file source read limit.
const fn default_max_source_file_bytes() -> usize {
    DEFAULT_MAX_SOURCE_FILE_BYTES
}

/// Default coverage program.
fn default_coverage_program() -> String {
    DEFAULT_COVERAGE_PROGRAM.to_string()
}

/// Default coverage arguments.
fn default_coverage_args() -> Vec<String> {
    DEFAULT_COVERAGE_ARGS.iter().map(ToString::to_string).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only unwraps on error results.")]

    use super::*;

    #[test]
    fn validate_path_string_rejects_whitespace_only() {
        assert!(validate_path_string("catalog.path", "   ").is_err());
    }

    #[test]
    fn validate_path_string_rejects_long_component() {
        let long = "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
        let err = validate_path_string("catalog.path", &long).unwrap_err();
        assert!(err.to_string().contains("component too long"));
    }

    #[test]
    fn parse_count_rejects_negative_values() {
        assert!(parse_count(MIN_TOTAL_ENV_VAR, "-1").is_err());
        assert_eq!(parse_count(MIN_TOTAL_ENV_VAR, "7").unwrap(), 7);
    }
}
