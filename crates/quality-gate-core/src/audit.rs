// crates/quality-gate-core/src/audit.rs
// ============================================================================
// Module: Gate Audit Logging
// Description: Structured audit events for gate phase transitions.
// Purpose: Emit JSON-line logs without hard dependencies on a logging backend.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every orchestrator transition produces a [`GateAuditEvent`]. Sinks write
//! events as JSON lines so CI systems can route them to their preferred log
//! pipeline. Sink failures are swallowed; auditing never changes a verdict.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::report::GatePhase;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome recorded for a phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// The phase completed and the gate advanced.
    Advanced,
    /// The gate stopped in a failed state.
    Failed,
    /// The gate finished successfully.
    Passed,
}

/// Gate audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct GateAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Phase entered by the transition.
    pub phase: GatePhase,
    /// Transition outcome.
    pub outcome: AuditOutcome,
    /// Short human-readable detail.
    pub detail: Option<String>,
}

impl GateAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(phase: GatePhase, outcome: AuditOutcome, detail: Option<String>) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "gate_transition",
            timestamp_ms,
            phase,
            outcome,
            detail,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for gate events.
pub trait GateAuditSink {
    /// Record an audit event.
    fn record(&self, event: &GateAuditEvent);
}

impl<T: GateAuditSink + ?Sized> GateAuditSink for &T {
    fn record(&self, event: &GateAuditEvent) {
        (**self).record(event);
    }
}

impl<T: GateAuditSink + ?Sized> GateAuditSink for Box<T> {
    fn record(&self, event: &GateAuditEvent) {
        (**self).record(event);
    }
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl GateAuditSink for StderrAuditSink {
    fn record(&self, event: &GateAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl GateAuditSink for FileAuditSink {
    fn record(&self, event: &GateAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Audit sink that drops all events.
pub struct NoopAuditSink;

impl GateAuditSink for NoopAuditSink {
    fn record(&self, _event: &GateAuditEvent) {}
}
