// crates/quality-gate-core/tests/audit.rs
// ============================================================================
// Module: Gate Audit Sink Tests
// Description: Integration tests for JSON-line audit sinks.
// Purpose: Ensure audit events append as parseable lines.
// Dependencies: quality-gate-core, serde_json, tempfile
// ============================================================================

//! Audit sink tests.

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

use std::fs;

use quality_gate_core::AuditOutcome;
use quality_gate_core::FileAuditSink;
use quality_gate_core::GateAuditEvent;
use quality_gate_core::GateAuditSink;
use quality_gate_core::GatePhase;
use serde_json::Value;
use tempfile::TempDir;

fn record_via<A: GateAuditSink>(sink: A, event: &GateAuditEvent) {
    sink.record(event);
}

/// Verifies the file sink appends one JSON object per event across reopenings.
#[test]
fn file_sink_appends_json_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audit.jsonl");

    let sink = FileAuditSink::new(&path).unwrap();
    sink.record(&GateAuditEvent::new(GatePhase::CatalogLoaded, AuditOutcome::Advanced, None));
    drop(sink);
    let sink = FileAuditSink::new(&path).unwrap();
    sink.record(&GateAuditEvent::new(
        GatePhase::Failed,
        AuditOutcome::Failed,
        Some("scenario count 3 is below the minimum 20".to_string()),
    ));

    let lines: Vec<Value> = fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "gate_transition");
    assert_eq!(lines[0]["phase"], "catalog_loaded");
    assert_eq!(lines[0]["outcome"], "advanced");
    assert_eq!(lines[0]["detail"], Value::Null);
    assert_eq!(lines[1]["outcome"], "failed");
    assert_eq!(lines[1]["detail"], "scenario count 3 is below the minimum 20");
}

/// Verifies boxed and borrowed sinks forward to the inner sink.
#[test]
fn boxed_sink_forwards_events() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audit.jsonl");
    let sink: Box<dyn GateAuditSink> = Box::new(FileAuditSink::new(&path).unwrap());

    record_via(&sink, &GateAuditEvent::new(GatePhase::Passed, AuditOutcome::Passed, None));

    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
}
