// src/errors.rs

//! Crate-wide error type and helpers.
//!
//! Component failures (non-zero exits, signals, spawn errors) are *not*
//! errors: they are recorded as [`crate::exec::ProcessExecutionResult`]
//! values and only surface here once aggregated into
//! [`BundleError::ExecutionFailed`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("Parallelism must be a positive integer (got {0})")]
    InvalidParallelism(usize),

    #[error("Empty command for component '{0}'")]
    EmptyCommand(String),

    #[error("{0}")]
    Usage(String),

    #[error("{message}")]
    ExecutionFailed { message: String, exit_code: i32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BundleError {
    /// Process exit code the CLI should terminate with for this error.
    ///
    /// - aggregated execution failures carry their own code
    /// - usage errors exit with `2`
    /// - everything else exits with `1`
    pub fn exit_code(&self) -> i32 {
        match self {
            BundleError::ExecutionFailed { exit_code, .. } => *exit_code,
            BundleError::Usage(_) => 2,
            _ => 1,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BundleError>;
