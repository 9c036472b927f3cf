// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs the command of a single component with
//! `tokio::process::Command` and describes its outcome:
//!
//! - [`spec`] holds the immutable per-component [`ExecutionSpec`].
//! - [`sink`] defines where the child's output goes (log file or a shared,
//!   color-prefixed stream).
//! - [`process`] spawns, waits and classifies a single process.
//! - [`result`] has the tagged [`ProcessExecutionResult`] and the positional
//!   [`ComponentResult`].
//! - [`runner`] provides the [`ProcessRunner`] trait the executor is generic
//!   over, and the production [`ShellRunner`].

pub mod process;
pub mod result;
pub mod runner;
pub mod sink;
pub mod spec;

pub use process::{Invocation, run_process};
pub use result::{ComponentResult, ProcessExecutionResult};
pub use runner::{ProcessRunner, ShellRunner};
pub use sink::{ColorStream, OutputSink, SharedStream, color_for, column_width};
pub use spec::ExecutionSpec;
