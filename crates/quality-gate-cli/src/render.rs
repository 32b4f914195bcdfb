// crates/quality-gate-cli/src/render.rs
// ============================================================================
// Module: Report Rendering
// Description: Text, Markdown, and canonical JSON renderings of CLI results.
// Purpose: Keep presentation out of the gate and provider crates.
// Dependencies: quality-gate-core, quality-gate-providers, serde, serde_jcs
// ============================================================================

//! ## Overview
//! Each renderer turns a result value into the full stdout payload for one
//! command, terminated by a newline. Text and Markdown strings come from the
//! i18n catalog; JSON output is canonical (RFC 8785) so that repeated runs on
//! the same inputs produce byte-identical reports.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;

use quality_gate_core::CatalogSummary;
use quality_gate_core::GateReport;
use quality_gate_core::ThresholdCheck;
use quality_gate_core::ThresholdMetric;
use quality_gate_providers::CheckOutcome;
use quality_gate_providers::CheckStatus;
use serde::Serialize;
use thiserror::Error;

use crate::t;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Output format for rendered results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Plain text for terminals.
    #[default]
    Text,
    /// Markdown for CI summaries.
    Markdown,
    /// Canonical JSON.
    Json,
}

/// Rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// JSON serialization failed.
    #[error("failed to serialize {kind}: {error}")]
    Serialize {
        /// Kind of document being serialized.
        kind: &'static str,
        /// Serializer error message.
        error: String,
    },
}

/// JSON document for `summary`.
#[derive(Serialize)]
struct SummaryDocument<'a> {
    /// Catalog path summarized.
    catalog_path: &'a Path,
    /// Catalog composition.
    summary: &'a CatalogSummary,
}

/// JSON document for `lint`.
#[derive(Serialize)]
struct ChecksDocument<'a> {
    /// True when every check passed.
    passed: bool,
    /// Per-check outcomes in run order.
    checks: &'a [CheckOutcome],
}

// ============================================================================
// SECTION: Gate Reports
// ============================================================================

/// Renders a gate report.
///
/// # Errors
///
/// Returns [`RenderError`] when JSON serialization fails.
pub fn render_gate_report(report: &GateReport, format: ReportFormat) -> Result<String, RenderError> {
    match format {
        ReportFormat::Text => Ok(gate_report_text(report)),
        ReportFormat::Markdown => Ok(gate_report_markdown(report)),
        ReportFormat::Json => canonical_json("gate report", report),
    }
}

/// Renders a gate report as plain text.
fn gate_report_text(report: &GateReport) -> String {
    let mut lines = vec![
        t!(
            "gate.header",
            verdict = report.verdict.to_string().to_uppercase(),
            phase = report.phase
        ),
        t!("gate.catalog", path = report.catalog_path.display()),
    ];
    if let Some(summary) = &report.summary {
        lines.push(t!(
            "gate.scenarios",
            total = summary.total,
            automated = summary.automated,
            ratio = percent(summary.automation_ratio * 100.0, 1)
        ));
    }
    if !report.checks.is_empty() {
        lines.push(t!("gate.checks.header"));
        for check in &report.checks {
            let status = if check.passed { t!("gate.check.ok") } else { t!("gate.check.fail") };
            lines.push(t!(
                "gate.check.entry",
                status = status,
                metric = check.metric,
                actual = metric_value(check, check.actual),
                required = metric_value(check, check.required)
            ));
        }
    }
    if !report.missing_references.is_empty() {
        lines.push(t!("gate.missing.header"));
        for reference in &report.missing_references {
            lines.push(t!("gate.missing.entry", reference = reference));
        }
    }
    if let Some(coverage) = &report.coverage {
        let line = match (coverage.lines_covered, coverage.lines_total) {
            (Some(covered), Some(count)) => t!(
                "gate.coverage.lines",
                percent = percent(coverage.line_percent, 2),
                covered = covered,
                count = count,
                tool = coverage.tool
            ),
            _ => t!(
                "gate.coverage",
                percent = percent(coverage.line_percent, 2),
                tool = coverage.tool
            ),
        };
        lines.push(line);
    }
    if !report.failures.is_empty() {
        lines.push(t!("gate.failures.header"));
        for failure in &report.failures {
            lines.push(t!("gate.failure.entry", failure = failure));
        }
    }
    join_lines(&lines)
}

/// Renders a gate report as Markdown.
fn gate_report_markdown(report: &GateReport) -> String {
    let mut lines = vec![
        t!("gate.markdown.title"),
        String::new(),
        t!(
            "gate.markdown.verdict",
            verdict = report.verdict.to_string().to_uppercase(),
            phase = report.phase
        ),
        t!("gate.markdown.catalog", path = report.catalog_path.display()),
    ];
    if !report.checks.is_empty() {
        lines.extend([
            String::new(),
            t!("gate.markdown.checks"),
            String::new(),
            t!("gate.markdown.checks.columns"),
            t!("gate.markdown.checks.rule"),
        ]);
        for check in &report.checks {
            let status = if check.passed { t!("gate.check.ok") } else { t!("gate.check.fail") };
            lines.push(t!(
                "gate.markdown.check.row",
                metric = check.metric,
                actual = metric_value(check, check.actual),
                required = metric_value(check, check.required),
                status = status
            ));
        }
    }
    if !report.missing_references.is_empty() {
        lines.extend([String::new(), t!("gate.markdown.missing"), String::new()]);
        for reference in &report.missing_references {
            lines.push(t!("gate.markdown.missing.entry", reference = reference));
        }
    }
    if let Some(coverage) = &report.coverage {
        lines.extend([
            String::new(),
            t!("gate.markdown.coverage"),
            String::new(),
            t!(
                "gate.markdown.coverage.entry",
                tool = coverage.tool,
                percent = percent(coverage.line_percent, 2)
            ),
        ]);
    }
    if !report.failures.is_empty() {
        lines.extend([String::new(), t!("gate.markdown.failures"), String::new()]);
        for failure in &report.failures {
            lines.push(t!("gate.markdown.failure.entry", failure = failure));
        }
    }
    join_lines(&lines)
}

// ============================================================================
// SECTION: Catalog Summary
// ============================================================================

/// Renders a catalog summary.
///
/// # Errors
///
/// Returns [`RenderError`] when JSON serialization fails.
pub fn render_catalog_summary(
    catalog_path: &Path,
    summary: &CatalogSummary,
    format: ReportFormat,
) -> Result<String, RenderError> {
    match format {
        ReportFormat::Text => Ok(summary_text(catalog_path, summary)),
        ReportFormat::Markdown => Ok(summary_markdown(catalog_path, summary)),
        ReportFormat::Json => canonical_json("catalog summary", &SummaryDocument {
            catalog_path,
            summary,
        }),
    }
}

/// Renders a catalog summary as plain text.
fn summary_text(catalog_path: &Path, summary: &CatalogSummary) -> String {
    let mut lines = vec![
        t!("summary.header", path = catalog_path.display()),
        t!(
            "summary.totals",
            total = summary.total,
            automated = summary.automated,
            ratio = percent(summary.automation_ratio * 100.0, 1)
        ),
    ];
    for (heading, group) in [
        (t!("summary.group.test_type"), &summary.by_test_type),
        (t!("summary.group.priority"), &summary.by_priority),
        (t!("summary.group.service"), &summary.by_service),
    ] {
        lines.push(heading);
        if group.is_empty() {
            lines.push(t!("summary.group.empty"));
        }
        for (label, count) in group {
            lines.push(t!("summary.group.entry", label = group_label(label), count = count));
        }
    }
    join_lines(&lines)
}

/// Renders a catalog summary as Markdown.
fn summary_markdown(catalog_path: &Path, summary: &CatalogSummary) -> String {
    let mut lines = vec![
        t!("summary.markdown.title"),
        String::new(),
        t!("gate.markdown.catalog", path = catalog_path.display()),
        String::new(),
        t!("summary.markdown.totals"),
        t!("summary.markdown.totals.rule"),
        t!(
            "summary.markdown.totals.row",
            total = summary.total,
            automated = summary.automated,
            ratio = percent(summary.automation_ratio * 100.0, 1)
        ),
    ];
    push_markdown_group(&mut lines, t!("summary.markdown.group.test_type"), &summary.by_test_type);
    push_markdown_group(&mut lines, t!("summary.markdown.group.priority"), &summary.by_priority);
    push_markdown_group(&mut lines, t!("summary.markdown.group.service"), &summary.by_service);
    join_lines(&lines)
}

/// Appends one Markdown breakdown section.
fn push_markdown_group(lines: &mut Vec<String>, heading: String, group: &BTreeMap<String, usize>) {
    lines.extend([String::new(), heading, String::new()]);
    if group.is_empty() {
        lines.push(t!("summary.group.empty").trim().to_string());
    }
    for (label, count) in group {
        lines.push(t!("summary.markdown.group.entry", label = group_label(label), count = count));
    }
}

// ============================================================================
// SECTION: External Checks
// ============================================================================

/// Renders external check outcomes.
///
/// # Errors
///
/// Returns [`RenderError`] when JSON serialization fails.
pub fn render_check_outcomes(
    outcomes: &[CheckOutcome],
    format: ReportFormat,
) -> Result<String, RenderError> {
    match format {
        ReportFormat::Text => Ok(checks_text(outcomes)),
        ReportFormat::Markdown => Ok(checks_markdown(outcomes)),
        ReportFormat::Json => canonical_json("check outcomes", &ChecksDocument {
            passed: outcomes.iter().all(CheckOutcome::passed),
            checks: outcomes,
        }),
    }
}

/// Renders check outcomes as plain text.
fn checks_text(outcomes: &[CheckOutcome]) -> String {
    if outcomes.is_empty() {
        return join_lines(&[t!("lint.none")]);
    }
    let mut lines = vec![t!("lint.header")];
    for outcome in outcomes {
        let line = match &outcome.detail {
            Some(detail) => t!(
                "lint.entry.detail",
                status = check_status(outcome.status),
                name = outcome.name,
                command = outcome.command,
                detail = detail
            ),
            None => t!(
                "lint.entry",
                status = check_status(outcome.status),
                name = outcome.name,
                command = outcome.command
            ),
        };
        lines.push(line);
    }
    join_lines(&lines)
}

/// Renders check outcomes as Markdown.
fn checks_markdown(outcomes: &[CheckOutcome]) -> String {
    let mut lines = vec![t!("lint.markdown.title"), String::new()];
    if outcomes.is_empty() {
        lines.push(t!("lint.none"));
        return join_lines(&lines);
    }
    lines.push(t!("lint.markdown.columns"));
    lines.push(t!("lint.markdown.rule"));
    for outcome in outcomes {
        lines.push(t!(
            "lint.markdown.row",
            name = outcome.name,
            command = outcome.command,
            status = check_status(outcome.status),
            detail = outcome.detail.as_deref().unwrap_or("")
        ));
    }
    join_lines(&lines)
}

/// Returns the localized label for a check status.
fn check_status(status: CheckStatus) -> String {
    match status {
        CheckStatus::Passed => t!("lint.status.passed"),
        CheckStatus::Failed => t!("lint.status.failed"),
        CheckStatus::Unavailable => t!("lint.status.unavailable"),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serializes a value as canonical JSON followed by a newline.
fn canonical_json<T: Serialize>(kind: &'static str, value: &T) -> Result<String, RenderError> {
    let bytes = serde_jcs::to_vec(value).map_err(|err| RenderError::Serialize {
        kind,
        error: err.to_string(),
    })?;
    let mut json = String::from_utf8(bytes).map_err(|err| RenderError::Serialize {
        kind,
        error: err.to_string(),
    })?;
    json.push('\n');
    Ok(json)
}

/// Formats a check value: counts as integers, coverage as a percentage.
fn metric_value(check: &ThresholdCheck, value: f64) -> String {
    match check.metric {
        ThresholdMetric::LineCoverage => percent(value, 2),
        ThresholdMetric::TotalScenarios | ThresholdMetric::AutomatedScenarios => {
            format!("{value:.0}")
        }
    }
}

/// Formats a percentage with the given precision.
fn percent(value: f64, precision: usize) -> String {
    format!("{value:.precision$}%")
}

/// Returns a display label for a breakdown key.
fn group_label(label: &str) -> String {
    if label.is_empty() { t!("summary.label.unspecified") } else { label.to_string() }
}

/// Joins lines with a trailing newline.
fn join_lines(lines: &[String]) -> String {
    let mut output = lines.join("\n");
    output.push('\n');
    output
}
