// src/engine/state.rs

//! Pure execution state machine.
//!
//! `ExecutionState` is the single piece of mutable state of a parallel run:
//! launch cursor, counters, the `aborted` flag and the positional result
//! slots. It has no Tokio types and performs no IO; the async shell in
//! [`crate::engine::executor`] feeds it launch requests and completions one
//! at a time, which serializes all updates.
//!
//! Lifecycle of a run:
//! - `Running`: [`ExecutionState::next_launch`] hands out indices in input
//!   order.
//! - `Aborting`: entered when fail-fast sees a failure (or on interrupt); no
//!   more indices are handed out, in-flight completions are still recorded.
//! - `Done`: nothing in flight and nothing left to launch.

use tracing::warn;

use crate::exec::{ComponentResult, ProcessExecutionResult};

/// Phase of a run, derived from the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Running,
    Aborting,
    Done,
}

/// What recording a completion changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionStep {
    pub success: bool,
    /// True only for the completion that flipped the run into `Aborting`.
    pub abort_triggered: bool,
}

#[derive(Debug)]
pub struct ExecutionState {
    total: usize,
    next_index: usize,
    in_flight: usize,
    completed: usize,
    failed: usize,
    fail_fast: bool,
    aborted: bool,
    results: Vec<Option<ProcessExecutionResult>>,
}

impl ExecutionState {
    pub fn new(total: usize, fail_fast: bool) -> Self {
        Self {
            total,
            next_index: 0,
            in_flight: 0,
            completed: 0,
            failed: 0,
            fail_fast,
            aborted: false,
            results: vec![None; total],
        }
    }

    /// Whether another component may be launched right now (ignoring slots).
    pub fn can_launch(&self) -> bool {
        !self.aborted && self.next_index < self.total
    }

    /// Claim the next component to launch, in input order.
    pub fn next_launch(&mut self) -> Option<usize> {
        if !self.can_launch() {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;
        self.in_flight += 1;
        Some(index)
    }

    /// Record the result of a launched component at its original index.
    pub fn record_completion(
        &mut self,
        index: usize,
        result: ProcessExecutionResult,
    ) -> CompletionStep {
        let success = result.is_success();

        let slot_in_flight = index < self.next_index && matches!(self.results.get(index), Some(None));
        if !slot_in_flight {
            warn!(index, "ignoring completion for a slot that was not in flight");
            return CompletionStep {
                success,
                abort_triggered: false,
            };
        }
        self.results[index] = Some(result);

        self.in_flight -= 1;
        self.completed += 1;

        let mut abort_triggered = false;
        if !success {
            self.failed += 1;
            if self.fail_fast && !self.aborted {
                self.aborted = true;
                abort_triggered = true;
            }
        }

        CompletionStep {
            success,
            abort_triggered,
        }
    }

    /// Stop launching further components (user interrupt).
    pub fn interrupt(&mut self) {
        self.aborted = true;
    }

    pub fn phase(&self) -> RunPhase {
        if self.in_flight == 0 && !self.can_launch() {
            RunPhase::Done
        } else if self.aborted {
            RunPhase::Aborting
        } else {
            RunPhase::Running
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase() == RunPhase::Done
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn launched(&self) -> usize {
        self.next_index
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Turn the slots into the positional result list.
    ///
    /// Components that were never launched become [`ComponentResult::Skipped`].
    pub fn into_results(self) -> Vec<ComponentResult> {
        self.results
            .into_iter()
            .map(|slot| match slot {
                Some(result) => ComponentResult::Finished(result),
                None => ComponentResult::Skipped,
            })
            .collect()
    }
}
