// src/engine/mod.rs

//! Parallel build/run execution engine.
//!
//! This module ties together:
//! - the pure run state machine ([`state`]): launch cursor, counters,
//!   fail-fast `aborted` flag and positional result slots
//! - the async shell ([`executor`]) that owns the slots, the in-flight
//!   runner tasks and the completion loop
//!
//! Consumers observe progress through [`ExecutionEvent`]s sent on an
//! unbounded channel, so the engine never depends on a UI library.

/// Notification emitted by the executor while a run progresses.
///
/// Events arrive in completion order, which is unrelated to input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionEvent {
    /// A component has been handed to the process runner.
    Started { index: usize, component: String },
    /// One more component finished (successfully or not).
    Done {
        index: usize,
        component: String,
        success: bool,
    },
}

pub mod executor;
pub mod state;

pub use executor::{ParallelExecutor, default_parallelism};
pub use state::{CompletionStep, ExecutionState, RunPhase};
