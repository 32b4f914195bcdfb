// crates/quality-gate-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for future localization support.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The Quality Gate CLI stores user-facing strings in a small translation
//! catalog to keep messaging consistent across commands and report formats.
//! All runtime output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A single named substitution for a message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
pub const CATALOG_ITEMS: &[(&str, &str)] = &[
    ("main.version", "quality-gate {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.render_failed", "Failed to render output: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("config.show.failed", "Failed to render config: {error}"),
    ("audit.open_failed", "Failed to open audit log {path}: {error}"),
    ("gate.header", "Quality gate: {verdict} (phase: {phase})"),
    ("gate.catalog", "Catalog: {path}"),
    ("gate.scenarios", "Scenarios: {total} total, {automated} automated ({ratio})"),
    ("gate.checks.header", "Checks:"),
    ("gate.check.entry", "  [{status}] {metric}: {actual} (minimum {required})"),
    ("gate.check.ok", "ok"),
    ("gate.check.fail", "fail"),
    ("gate.missing.header", "Missing test references:"),
    ("gate.missing.entry", "  {reference}"),
    ("gate.coverage", "Coverage: {percent} ({tool})"),
    ("gate.coverage.lines", "Coverage: {percent} ({covered}/{count} lines, {tool})"),
    ("gate.failures.header", "Failures:"),
    ("gate.failure.entry", "  - {failure}"),
    ("gate.failed", "Quality gate failed with {count} problem(s)."),
    ("gate.markdown.title", "# Quality Gate Report"),
    ("gate.markdown.verdict", "**Verdict:** {verdict} (phase `{phase}`)"),
    ("gate.markdown.catalog", "**Catalog:** `{path}`"),
    ("gate.markdown.checks", "## Checks"),
    ("gate.markdown.checks.columns", "| Metric | Actual | Minimum | Status |"),
    ("gate.markdown.checks.rule", "| --- | ---: | ---: | --- |"),
    ("gate.markdown.check.row", "| {metric} | {actual} | {required} | {status} |"),
    ("gate.markdown.missing", "## Missing Test References"),
    ("gate.markdown.missing.entry", "- `{reference}`"),
    ("gate.markdown.coverage", "## Coverage"),
    ("gate.markdown.coverage.entry", "- {tool}: {percent}"),
    ("gate.markdown.failures", "## Failures"),
    ("gate.markdown.failure.entry", "- {failure}"),
    ("summary.load_failed", "Failed to load scenario catalog: {error}"),
    ("summary.header", "Scenario catalog: {path}"),
    ("summary.totals", "Total: {total}  Automated: {automated}  Ratio: {ratio}"),
    ("summary.group.test_type", "By test type:"),
    ("summary.group.priority", "By priority:"),
    ("summary.group.service", "By service:"),
    ("summary.group.entry", "  {label}: {count}"),
    ("summary.group.empty", "  (none)"),
    ("summary.label.unspecified", "(unspecified)"),
    ("summary.markdown.title", "# Scenario Catalog Summary"),
    ("summary.markdown.totals", "| Total | Automated | Ratio |"),
    ("summary.markdown.totals.rule", "| ---: | ---: | ---: |"),
    ("summary.markdown.totals.row", "| {total} | {automated} | {ratio} |"),
    ("summary.markdown.group.test_type", "## By Test Type"),
    ("summary.markdown.group.priority", "## By Priority"),
    ("summary.markdown.group.service", "## By Service"),
    ("summary.markdown.group.entry", "- {label}: {count}"),
    ("lint.header", "External checks:"),
    ("lint.entry", "  [{status}] {name}: {command}"),
    ("lint.entry.detail", "  [{status}] {name}: {command} ({detail})"),
    ("lint.status.passed", "ok"),
    ("lint.status.failed", "fail"),
    ("lint.status.unavailable", "missing"),
    ("lint.none", "No external checks configured."),
    ("lint.failed", "{count} external check(s) did not pass."),
    ("lint.markdown.title", "# External Checks"),
    ("lint.markdown.columns", "| Check | Command | Status | Detail |"),
    ("lint.markdown.rule", "| --- | --- | --- | --- |"),
    ("lint.markdown.row", "| {name} | `{command}` | {status} | {detail} |"),
];

/// Lazily built lookup table over [`CATALOG_ITEMS`].
static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

/// Returns the message catalog.
#[must_use]
pub fn catalog() -> &'static HashMap<&'static str, &'static str> {
    CATALOG.get_or_init(|| CATALOG_ITEMS.iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the English catalog while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
