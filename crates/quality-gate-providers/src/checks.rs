// crates/quality-gate-providers/src/checks.rs
// ============================================================================
// Module: External Checks
// Description: Pass/fail runner for external format and lint commands.
// Purpose: Invoke configured tooling without reimplementing it.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Each check is one subprocess whose exit status decides pass or fail. The
//! child's stdout and stderr both go to our stderr, leaving stdout for the
//! check report. Checks run in order and all of them run, even after a
//! failure. A check with a `working_dir` runs there; otherwise it runs in the
//! current directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// One external check command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandCheckConfig {
    /// Unique check name.
    pub name: String,
    /// Program to spawn.
    pub program: String,
    /// Program arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// Directory the program runs in; the current directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl CommandCheckConfig {
    /// Creates a check from string slices.
    #[must_use]
    pub fn new(name: &str, program: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            working_dir: None,
        }
    }

    /// Runs the check in `dir` instead of the current directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Returns the command line for display.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Returns the default format and lint checks.
#[must_use]
pub fn default_checks() -> Vec<CommandCheckConfig> {
    vec![
        CommandCheckConfig::new("fmt", "cargo", &["fmt", "--all", "--", "--check"]),
        CommandCheckConfig::new("clippy", "cargo", &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--all-features",
            "--",
            "-D",
            "warnings",
        ]),
    ]
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Errors raised while spawning a check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The program is not installed.
    #[error("{program} not found")]
    Unavailable {
        /// Program name.
        program: String,
    },
    /// The program could not be started or awaited.
    #[error("failed to run {program}: {error}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying error message.
        error: String,
    },
}

/// Result status of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Exit status zero.
    Passed,
    /// Non-zero exit status.
    Failed,
    /// The program could not be run.
    Unavailable,
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Check name.
    pub name: String,
    /// Command line that was run.
    pub command: String,
    /// Result status.
    pub status: CheckStatus,
    /// Exit code or spawn failure detail.
    pub detail: Option<String>,
}

impl CheckOutcome {
    /// Returns true when the check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Passed
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runs one external check.
pub struct CommandCheck<'a> {
    /// Check configuration.
    config: &'a CommandCheckConfig,
}

impl<'a> CommandCheck<'a> {
    /// Creates a runner for the given check.
    #[must_use]
    pub const fn new(config: &'a CommandCheckConfig) -> Self {
        Self {
            config,
        }
    }

    /// Runs the check and classifies its exit status.
    #[must_use]
    pub fn run(&self) -> CheckOutcome {
        let (status, detail) = match self.spawn() {
            Ok(exit) if exit.success() => (CheckStatus::Passed, None),
            Ok(exit) => (CheckStatus::Failed, Some(exit.to_string())),
            Err(err @ CheckError::Unavailable { .. }) => {
                (CheckStatus::Unavailable, Some(err.to_string()))
            }
            Err(err @ CheckError::Spawn { .. }) => (CheckStatus::Failed, Some(err.to_string())),
        };
        CheckOutcome {
            name: self.config.name.clone(),
            command: self.config.command_line(),
            status,
            detail,
        }
    }

    /// Spawns the program and waits for it.
    fn spawn(&self) -> Result<ExitStatus, CheckError> {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(io::stderr()))
            .stderr(Stdio::inherit());
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }
        command.status().map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                CheckError::Unavailable {
                    program: self.config.program.clone(),
                }
            } else {
                CheckError::Spawn {
                    program: self.config.program.clone(),
                    error: err.to_string(),
                }
            }
        })
    }
}

/// Runs every check in order and returns all outcomes.
#[must_use]
pub fn run_checks(checks: &[CommandCheckConfig]) -> Vec<CheckOutcome> {
    checks.iter().map(|check| CommandCheck::new(check).run()).collect()
}
