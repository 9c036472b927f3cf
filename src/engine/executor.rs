// src/engine/executor.rs

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc, oneshot};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::errors::{BundleError, Result};
use crate::exec::{ComponentResult, ExecutionSpec, ProcessExecutionResult, ProcessRunner, ShellRunner};

use super::ExecutionEvent;
use super::state::ExecutionState;

/// Number of launch slots used when no parallelism is configured.
pub fn default_parallelism() -> usize {
    num_cpus::get().max(1)
}

/// Runs one process per [`ExecutionSpec`] under a bounded number of slots.
///
/// - Launch order follows input order; a component is launched as soon as a
///   slot frees up.
/// - Each in-flight component holds a semaphore permit until its completion
///   has been recorded, so at most `parallelism` components are in flight.
/// - Every `LogFile` sink is created (or truncated) before the first launch,
///   so skipped components still leave an empty log behind.
/// - With `fail_fast`, the first failed completion stops further launches.
///   Components already running are left to finish and still recorded.
/// - An interrupt (see [`ParallelExecutor::with_interrupt`]) stops launches
///   and drops every in-flight runner, which kills its child process.
///
/// All bookkeeping goes through [`ExecutionState`]; completions are handled
/// one at a time in [`ParallelExecutor::execute`].
pub struct ParallelExecutor<R: ProcessRunner = ShellRunner> {
    specs: Vec<ExecutionSpec>,
    parallelism: usize,
    fail_fast: bool,
    runner: Arc<R>,
    events: Option<mpsc::UnboundedSender<ExecutionEvent>>,
    interrupt: Option<oneshot::Receiver<()>>,
}

impl<R: ProcessRunner> fmt::Debug for ParallelExecutor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParallelExecutor")
            .field("components", &self.specs.len())
            .field("parallelism", &self.parallelism)
            .field("fail_fast", &self.fail_fast)
            .finish_non_exhaustive()
    }
}

impl ParallelExecutor<ShellRunner> {
    /// Executor spawning real OS processes.
    ///
    /// `parallelism = None` uses [`default_parallelism`]; `Some(0)` is
    /// rejected.
    pub fn new(
        specs: Vec<ExecutionSpec>,
        parallelism: Option<usize>,
        fail_fast: bool,
    ) -> Result<Self> {
        Self::with_runner(specs, parallelism, fail_fast, ShellRunner)
    }
}

impl<R: ProcessRunner + 'static> ParallelExecutor<R> {
    pub fn with_runner(
        specs: Vec<ExecutionSpec>,
        parallelism: Option<usize>,
        fail_fast: bool,
        runner: R,
    ) -> Result<Self> {
        let parallelism = match parallelism {
            None => default_parallelism(),
            Some(0) => return Err(BundleError::InvalidParallelism(0)),
            Some(n) => n,
        };
        ensure_unique_names(&specs)?;

        Ok(Self {
            specs,
            parallelism,
            fail_fast,
            runner: Arc::new(runner),
            events: None,
            interrupt: None,
        })
    }

    /// Receive an [`ExecutionEvent`] for every launch and completion.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<ExecutionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Abort the run when this channel fires.
    ///
    /// Dropping the sender without sending has no effect.
    pub fn with_interrupt(mut self, interrupt: oneshot::Receiver<()>) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Run every eligible component and return one entry per input spec.
    ///
    /// Entry `i` always belongs to spec `i`, whatever the completion order.
    pub async fn execute(self) -> Vec<ComponentResult> {
        let Self {
            specs,
            parallelism,
            fail_fast,
            runner,
            events,
            mut interrupt,
        } = self;

        let total = specs.len();
        let names: Vec<String> = specs.iter().map(|s| s.component_name().to_string()).collect();
        let mut queue: VecDeque<ExecutionSpec> = specs.into();

        let mut state = ExecutionState::new(total, fail_fast);
        let slots = Arc::new(Semaphore::new(parallelism));
        let mut running: JoinSet<(usize, ProcessExecutionResult)> = JoinSet::new();
        let mut running_index: HashMap<tokio::task::Id, (usize, OwnedSemaphorePermit)> =
            HashMap::new();

        for spec in &queue {
            if let Err(e) = spec.sink().prepare() {
                warn!(
                    component = %spec.component_name(),
                    sink = %spec.sink().describe(),
                    error = %e,
                    "could not prepare output sink"
                );
            }
        }

        info!(total, parallelism, fail_fast, "parallel execution started");

        loop {
            // Fill every free slot, in input order.
            while state.can_launch() {
                let Ok(permit) = Arc::clone(&slots).try_acquire_owned() else {
                    break;
                };
                let (Some(index), Some(spec)) = (state.next_launch(), queue.pop_front()) else {
                    break;
                };

                debug!(
                    component = %names[index],
                    index,
                    in_flight = state.in_flight(),
                    "launching component"
                );
                emit(&events, ExecutionEvent::Started {
                    index,
                    component: names[index].clone(),
                });

                let runner = Arc::clone(&runner);
                let handle = running.spawn(async move { (index, runner.run(spec).await) });
                running_index.insert(handle.id(), (index, permit));
            }

            if state.is_done() {
                break;
            }

            let joined = tokio::select! {
                joined = running.join_next_with_id() => joined,
                _ = wait_for_interrupt(&mut interrupt) => {
                    warn!(
                        in_flight = state.in_flight(),
                        "interrupt received; terminating in-flight components"
                    );
                    state.interrupt();
                    running.abort_all();
                    continue;
                }
            };

            let Some(joined) = joined else {
                warn!("no component in flight but run not finished; stopping");
                break;
            };

            let (index, result, permit) = match joined {
                Ok((id, (index, result))) => {
                    let permit = running_index.remove(&id).map(|(_, permit)| permit);
                    (index, result, permit)
                }
                Err(err) => {
                    let Some((index, permit)) = running_index.remove(&err.id()) else {
                        warn!(error = %err, "join error for an unknown component task");
                        continue;
                    };
                    (index, classify_join_error(err), Some(permit))
                }
            };

            let step = state.record_completion(index, result.clone());
            // The slot frees up only once the completion is recorded.
            drop(permit);
            info!(
                component = %names[index],
                index,
                success = step.success,
                outcome = %result,
                completed = state.completed(),
                total,
                "component finished"
            );
            if step.abort_triggered {
                warn!(
                    component = %names[index],
                    in_flight = state.in_flight(),
                    "fail-fast: no further components will be launched"
                );
            }

            emit(&events, ExecutionEvent::Done {
                index,
                component: names[index].clone(),
                success: step.success,
            });
        }

        info!(
            launched = state.launched(),
            completed = state.completed(),
            failed = state.failed(),
            aborted = state.is_aborted(),
            "parallel execution finished"
        );

        state.into_results()
    }
}

fn emit(events: &Option<mpsc::UnboundedSender<ExecutionEvent>>, event: ExecutionEvent) {
    if let Some(tx) = events {
        // The consumer may have gone away; progress is best effort.
        let _ = tx.send(event);
    }
}

/// Resolves once the interrupt fires; pends forever if there is none.
async fn wait_for_interrupt(slot: &mut Option<oneshot::Receiver<()>>) {
    let Some(rx) = slot.as_mut() else {
        return std::future::pending().await;
    };
    let outcome = rx.await;
    *slot = None;
    if outcome.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Outcome of a runner task that did not return normally.
///
/// - aborted tasks dropped their child with `kill_on_drop`
/// - panicking runners count as failures of the runner itself
fn classify_join_error(err: JoinError) -> ProcessExecutionResult {
    if err.is_cancelled() {
        ProcessExecutionResult::Signal("SIGKILL".to_string())
    } else {
        ProcessExecutionResult::SpawnFailure(format!("process runner panicked: {err}"))
    }
}

fn ensure_unique_names(specs: &[ExecutionSpec]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for spec in specs {
        if !seen.insert(spec.component_name()) {
            return Err(BundleError::ConfigError(format!(
                "component '{}' appears more than once in the same run",
                spec.component_name()
            )));
        }
    }
    Ok(())
}
