// tests/report_aggregation.rs

use bundlekit::errors::BundleError;
use bundlekit::exec::{ComponentResult, ProcessExecutionResult};
use bundlekit::report::{GENERIC_FAILURE_EXIT_CODE, aggregate};

fn finished(result: ProcessExecutionResult) -> ComponentResult {
    ComponentResult::Finished(result)
}

#[test]
fn partitions_results_by_outcome() {
    let results = vec![
        finished(ProcessExecutionResult::ExitCode(0)),
        finished(ProcessExecutionResult::ExitCode(7)),
        ComponentResult::Skipped,
        finished(ProcessExecutionResult::Signal("SIGTERM".into())),
    ];
    let report = aggregate(&results, &["orders", "catalog", "billing", "ui"]);

    assert_eq!(report.succeeded, vec!["orders"]);
    let failed: Vec<&str> = report.failed.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(failed, vec!["catalog", "ui"]);
    assert_eq!(report.skipped, vec!["billing"]);
    assert!(!report.is_success());
}

#[test]
fn first_failing_exit_code_wins() {
    let results = vec![
        finished(ProcessExecutionResult::Signal("SIGKILL".into())),
        finished(ProcessExecutionResult::ExitCode(42)),
        finished(ProcessExecutionResult::ExitCode(3)),
    ];
    let report = aggregate(&results, &["a", "b", "c"]);
    assert_eq!(report.exit_code(), Some(42));
}

#[test]
fn failures_without_exit_code_use_generic_code() {
    let results = vec![
        finished(ProcessExecutionResult::SpawnFailure("No such file or directory".into())),
        ComponentResult::Skipped,
    ];
    let report = aggregate(&results, &["a", "b"]);
    assert_eq!(report.exit_code(), Some(GENERIC_FAILURE_EXIT_CODE));
}

#[test]
fn skipped_components_alone_make_the_run_fail() {
    let results = vec![finished(ProcessExecutionResult::ExitCode(0)), ComponentResult::Skipped];
    let report = aggregate(&results, &["a", "b"]);
    assert!(!report.is_success());
    assert_eq!(report.exit_code(), Some(GENERIC_FAILURE_EXIT_CODE));
}

#[test]
fn message_lists_failures_then_skipped() {
    let results = vec![
        ComponentResult::Skipped,
        finished(ProcessExecutionResult::ExitCode(2)),
        finished(ProcessExecutionResult::Signal("SIGTERM".into())),
    ];
    let err = aggregate(&results, &["c", "a", "b"])
        .into_result(
            "The following components failed to build:",
            Some("See log files for more information"),
        )
        .unwrap_err();

    assert_eq!(err.exit_code(), 2);
    assert_eq!(
        err.to_string(),
        "The following components failed to build:\n\
         - a: exited with code 2\n\
         - b: killed by signal SIGTERM\n\
         - c: not attempted\n\
         See log files for more information"
    );
}

#[test]
fn successful_report_is_ok() {
    let results = vec![finished(ProcessExecutionResult::ExitCode(0))];
    let report = aggregate(&results, &["a"]);
    assert!(report.failure_lines().is_empty());
    assert!(report.into_result("failed", None).is_ok());
}

#[test]
fn error_exit_codes() {
    assert_eq!(BundleError::Usage("missing name".into()).exit_code(), 2);
    assert_eq!(BundleError::ComponentNotFound("x".into()).exit_code(), 1);
    assert_eq!(
        BundleError::ExecutionFailed {
            message: "boom".into(),
            exit_code: 9
        }
        .exit_code(),
        9
    );
}
