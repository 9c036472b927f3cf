// src/report.rs

//! Aggregation of a run's positional results into a single report.

use crate::errors::{BundleError, Result};
use crate::exec::{ComponentResult, ProcessExecutionResult};

/// Exit code used when no failing component has a meaningful one
/// (signals, spawn failures, skipped components).
pub const GENERIC_FAILURE_EXIT_CODE: i32 = 1;

/// A component whose process did not exit with code 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedComponent {
    pub name: String,
    pub result: ProcessExecutionResult,
}

/// Outcome of a whole batch, partitioned by result kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedComponent>,
    /// Components never launched because the run was aborted (fail-fast
    /// or interrupt).
    pub skipped: Vec<String>,
}

/// Partition `results` (index-aligned with `components`) into a report.
pub fn aggregate<S: AsRef<str>>(results: &[ComponentResult], components: &[S]) -> BuildReport {
    let mut report = BuildReport::default();

    for (result, name) in results.iter().zip(components) {
        let name = name.as_ref().to_string();
        match result {
            ComponentResult::Finished(r) if r.is_success() => report.succeeded.push(name),
            ComponentResult::Finished(r) => report.failed.push(FailedComponent {
                name,
                result: r.clone(),
            }),
            ComponentResult::Skipped => report.skipped.push(name),
        }
    }

    report
}

impl BuildReport {
    /// True iff every component ran and exited with code 0.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    /// One line per failed or skipped component, failures first.
    pub fn failure_lines(&self) -> Vec<String> {
        self.failed
            .iter()
            .map(|f| format!("- {}: {}", f.name, f.result.reason()))
            .chain(
                self.skipped
                    .iter()
                    .map(|name| format!("- {name}: not attempted")),
            )
            .collect()
    }

    /// Exit code for the CLI, `None` when the report is a success.
    ///
    /// The first failing component's own exit code wins when there is one.
    pub fn exit_code(&self) -> Option<i32> {
        if self.is_success() {
            return None;
        }
        let code = self
            .failed
            .iter()
            .find_map(|f| f.result.exit_code())
            .unwrap_or(GENERIC_FAILURE_EXIT_CODE);
        Some(code)
    }

    /// Multi-line failure message: heading, one line per component, footer.
    pub fn render(&self, heading: &str, footer: Option<&str>) -> String {
        let mut message = format!("{heading}\n");
        for line in self.failure_lines() {
            message.push_str(&line);
            message.push('\n');
        }
        if let Some(footer) = footer {
            message.push_str(footer);
        }
        message.trim_end().to_string()
    }

    /// `Ok(())` on success, otherwise the single user-facing error.
    pub fn into_result(self, heading: &str, footer: Option<&str>) -> Result<()> {
        match self.exit_code() {
            None => Ok(()),
            Some(exit_code) => Err(BundleError::ExecutionFailed {
                message: self.render(heading, footer),
                exit_code,
            }),
        }
    }
}
