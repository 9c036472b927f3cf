// tests/executor_properties.rs

use proptest::prelude::*;

use bundlekit::engine::{ExecutionState, ParallelExecutor, RunPhase};
use bundlekit::exec::{ComponentResult, ProcessExecutionResult};
use bundlekit_test_utils::builders::fake_specs;
use bundlekit_test_utils::fake_runner::FakeRunner;

/// One scripted component: (exit code, delay in ms).
fn component_strategy() -> impl Strategy<Value = (i32, u64)> {
    (prop_oneof![4 => Just(0), 1 => 1..4i32], 0..8u64)
}

fn run_fake(
    outcomes: &[(i32, u64)],
    parallelism: usize,
    fail_fast: bool,
) -> (Vec<ComponentResult>, FakeRunner) {
    let names: Vec<String> = (0..outcomes.len()).map(|i| format!("c{i}")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let runner = names
        .iter()
        .zip(outcomes)
        .fold(FakeRunner::new(), |r, (name, (code, delay))| {
            r.with_outcome(name, ProcessExecutionResult::ExitCode(*code), *delay)
        });

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let executor = ParallelExecutor::with_runner(
        fake_specs(&name_refs),
        Some(parallelism),
        fail_fast,
        runner.clone(),
    )
    .unwrap();
    let results = rt.block_on(executor.execute());
    (results, runner)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn results_match_inputs_and_respect_the_bound(
        outcomes in proptest::collection::vec(component_strategy(), 0..10),
        parallelism in 1..5usize,
    ) {
        let (results, runner) = run_fake(&outcomes, parallelism, false);

        prop_assert_eq!(results.len(), outcomes.len());
        prop_assert!(runner.peak_concurrency() <= parallelism);
        for (result, (code, _)) in results.iter().zip(&outcomes) {
            prop_assert_eq!(
                result,
                &ComponentResult::Finished(ProcessExecutionResult::ExitCode(*code))
            );
        }
    }

    #[test]
    fn fail_fast_never_launches_after_the_first_recorded_failure(
        outcomes in proptest::collection::vec(component_strategy(), 1..10),
        parallelism in 1..4usize,
    ) {
        let (results, runner) = run_fake(&outcomes, parallelism, true);

        prop_assert_eq!(results.len(), outcomes.len());
        prop_assert_eq!(runner.launched().len(), runner.finished().len());

        // Launched components form a prefix of the input; the rest are skipped.
        let launched = runner.launched().len();
        for (i, result) in results.iter().enumerate() {
            prop_assert_eq!(result.is_skipped(), i >= launched);
        }

        // Skips only ever follow a failure.
        if results.iter().any(ComponentResult::is_skipped) {
            prop_assert!(results.iter().any(|r| !r.is_skipped() && !r.is_success()));
        }

        // Without any failure everything ran.
        if outcomes.iter().all(|(code, _)| *code == 0) {
            prop_assert!(results.iter().all(ComponentResult::is_success));
        }
    }

    #[test]
    fn state_machine_terminates_with_every_slot_filled(
        outcomes in proptest::collection::vec(prop_oneof![3 => Just(0), 1 => Just(1)], 0..12),
        fail_fast in any::<bool>(),
    ) {
        let mut state = ExecutionState::new(outcomes.len(), fail_fast);

        // Serial driving: launch one, complete it, repeat.
        while let Some(index) = state.next_launch() {
            prop_assert_eq!(state.in_flight(), 1);
            state.record_completion(index, ProcessExecutionResult::ExitCode(outcomes[index]));
        }

        prop_assert_eq!(state.phase(), RunPhase::Done);
        prop_assert_eq!(state.in_flight(), 0);
        prop_assert!(state.completed() <= outcomes.len());

        let first_failure = outcomes.iter().position(|code| *code != 0);
        let results = state.into_results();
        prop_assert_eq!(results.len(), outcomes.len());
        for (i, result) in results.iter().enumerate() {
            let expect_skipped = fail_fast && first_failure.is_some_and(|f| i > f);
            prop_assert_eq!(result.is_skipped(), expect_skipped);
        }
    }
}

#[test]
fn completion_for_a_slot_never_launched_is_ignored() {
    let mut state = ExecutionState::new(2, true);
    let step = state.record_completion(1, ProcessExecutionResult::ExitCode(1));
    assert!(!step.abort_triggered);
    assert_eq!(state.completed(), 0);
    assert_eq!(state.phase(), RunPhase::Running);
}

#[test]
fn only_the_first_failure_triggers_the_abort() {
    let mut state = ExecutionState::new(3, true);
    let a = state.next_launch().unwrap();
    let b = state.next_launch().unwrap();

    let first = state.record_completion(a, ProcessExecutionResult::ExitCode(1));
    assert!(first.abort_triggered);
    assert_eq!(state.phase(), RunPhase::Aborting);
    assert_eq!(state.next_launch(), None);

    let second = state.record_completion(b, ProcessExecutionResult::ExitCode(1));
    assert!(!second.abort_triggered);
    assert_eq!(state.phase(), RunPhase::Done);
    assert_eq!(state.failed(), 2);

    let results = state.into_results();
    assert_eq!(results[2], ComponentResult::Skipped);
}
