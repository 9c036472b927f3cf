use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bundlekit::exec::{ExecutionSpec, ProcessExecutionResult, ProcessRunner};

#[derive(Debug, Clone)]
struct Scripted {
    result: ProcessExecutionResult,
    delay: Duration,
}

/// A fake process runner that:
/// - records which components were launched and in which order
/// - tracks how many components are "running" at once (and the peak)
/// - sleeps for a scripted delay, then returns a scripted result
///
/// Unscripted components succeed immediately with `ExitCode(0)`.
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    script: Arc<Mutex<HashMap<String, Scripted>>>,
    launched: Arc<Mutex<Vec<String>>>,
    finished: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome of `component`.
    pub fn with_outcome(
        self,
        component: &str,
        result: ProcessExecutionResult,
        delay_ms: u64,
    ) -> Self {
        self.script.lock().unwrap().insert(
            component.to_string(),
            Scripted {
                result,
                delay: Duration::from_millis(delay_ms),
            },
        );
        self
    }

    /// Succeed after `delay_ms`.
    pub fn with_delay(self, component: &str, delay_ms: u64) -> Self {
        self.with_outcome(component, ProcessExecutionResult::ExitCode(0), delay_ms)
    }

    /// Component names in launch order.
    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().unwrap().clone()
    }

    /// Component names in completion order.
    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    /// Highest number of components observed running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl ProcessRunner for FakeRunner {
    fn run(
        &self,
        spec: ExecutionSpec,
    ) -> Pin<Box<dyn Future<Output = ProcessExecutionResult> + Send + '_>> {
        let name = spec.component_name().to_string();
        let scripted = self.script.lock().unwrap().get(&name).cloned();

        Box::pin(async move {
            self.launched.lock().unwrap().push(name.clone());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let result = match scripted {
                Some(s) => {
                    tokio::time::sleep(s.delay).await;
                    s.result
                }
                None => {
                    tokio::task::yield_now().await;
                    ProcessExecutionResult::ExitCode(0)
                }
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.finished.lock().unwrap().push(name);
            result
        })
    }
}
