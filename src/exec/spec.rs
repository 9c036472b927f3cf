// src/exec/spec.rs

use std::path::{Path, PathBuf};

use crate::errors::{BundleError, Result};
use crate::exec::sink::OutputSink;

/// Everything needed to execute one component.
///
/// Immutable once constructed; the executor takes ownership for the
/// duration of a run.
#[derive(Debug, Clone)]
pub struct ExecutionSpec {
    component_name: String,
    command: String,
    working_directory: PathBuf,
    sink: OutputSink,
}

impl ExecutionSpec {
    /// Build a spec, rejecting empty component names and blank commands.
    pub fn new(
        component_name: impl Into<String>,
        command: impl Into<String>,
        working_directory: impl Into<PathBuf>,
        sink: OutputSink,
    ) -> Result<Self> {
        let component_name = component_name.into();
        let command = command.into();

        if component_name.trim().is_empty() {
            return Err(BundleError::ConfigError(
                "execution spec requires a component name".to_string(),
            ));
        }
        if command.trim().is_empty() {
            return Err(BundleError::EmptyCommand(component_name));
        }

        Ok(Self {
            component_name,
            command,
            working_directory: working_directory.into(),
            sink,
        })
    }

    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    pub fn sink(&self) -> &OutputSink {
        &self.sink
    }
}
