// src/exec/result.rs

//! Outcome types for a single component execution.

use std::fmt;

/// How a launched component's process ended.
///
/// Exactly one of these is recorded per launched component. Only
/// `ExitCode(0)` counts as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessExecutionResult {
    /// Normal termination with the given exit status.
    ExitCode(i32),
    /// Terminated by an OS signal (e.g. `SIGTERM`).
    Signal(String),
    /// The process could not be started, or the runner itself failed.
    SpawnFailure(String),
}

impl ProcessExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessExecutionResult::ExitCode(0))
    }

    /// The numeric exit code, when the process exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProcessExecutionResult::ExitCode(code) => Some(*code),
            _ => None,
        }
    }

    /// Human-readable failure reason used in reports.
    pub fn reason(&self) -> String {
        match self {
            ProcessExecutionResult::ExitCode(code) => format!("exited with code {code}"),
            ProcessExecutionResult::Signal(signal) => format!("killed by signal {signal}"),
            ProcessExecutionResult::SpawnFailure(message) => {
                format!("failed due to error: {message}")
            }
        }
    }
}

impl fmt::Display for ProcessExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason())
    }
}

/// Positional entry of an executor run.
///
/// `Skipped` marks components that were never launched because fail-fast
/// (or a user interrupt) stopped the run first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentResult {
    Finished(ProcessExecutionResult),
    Skipped,
}

impl ComponentResult {
    pub fn finished(&self) -> Option<&ProcessExecutionResult> {
        match self {
            ComponentResult::Finished(result) => Some(result),
            ComponentResult::Skipped => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ComponentResult::Skipped)
    }

    pub fn is_success(&self) -> bool {
        self.finished().is_some_and(ProcessExecutionResult::is_success)
    }
}
