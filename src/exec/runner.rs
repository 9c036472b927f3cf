// src/exec/runner.rs

//! Pluggable process runner abstraction.
//!
//! The parallel executor talks to a `ProcessRunner` instead of spawning
//! processes itself. Production code uses [`ShellRunner`]; tests provide a
//! fake that scripts outcomes and delays without touching the OS.

use std::future::Future;
use std::pin::Pin;

use crate::exec::process::run_process;
use crate::exec::result::ProcessExecutionResult;
use crate::exec::spec::ExecutionSpec;

/// Trait abstracting how one component is executed.
///
/// Implementations must never fail: every problem is folded into the
/// returned [`ProcessExecutionResult`].
pub trait ProcessRunner: Send + Sync {
    fn run(
        &self,
        spec: ExecutionSpec,
    ) -> Pin<Box<dyn Future<Output = ProcessExecutionResult> + Send + '_>>;
}

/// Real runner: spawns OS processes via [`run_process`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ProcessRunner for ShellRunner {
    fn run(
        &self,
        spec: ExecutionSpec,
    ) -> Pin<Box<dyn Future<Output = ProcessExecutionResult> + Send + '_>> {
        Box::pin(async move { run_process(&spec).await })
    }
}
