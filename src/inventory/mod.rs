// src/inventory/mod.rs

//! Component inventory.
//!
//! Turns a validated [`BundleDescriptor`] into the ordered list of
//! components the orchestration layer builds or runs. The execution engine
//! never discovers components itself; it only ever sees the specs built
//! from this list.

pub mod commands;

use std::path::{Path, PathBuf};

use crate::config::{BundleDescriptor, ComponentCommands, ComponentConfig};
use crate::errors::{BundleError, Result};
use crate::types::{ComponentType, Stack};

pub use commands::command_for;

/// A single buildable/runnable unit of the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub name: String,
    pub kind: ComponentType,
    pub stack: Stack,
    /// Absolute working directory of the component.
    pub dir: PathBuf,
    pub commands: ComponentCommandsOverride,
}

/// Per-phase command overrides carried over from the descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentCommandsOverride {
    pub build: Option<String>,
    pub run: Option<String>,
}

impl From<&ComponentCommands> for ComponentCommandsOverride {
    fn from(c: &ComponentCommands) -> Self {
        Self {
            build: c.build.clone(),
            run: c.run.clone(),
        }
    }
}

/// Ordered collection of the bundle's components.
///
/// Order: microservices first, then micro-frontends, each in descriptor
/// order. This is also the launch order of the executor.
#[derive(Debug, Clone)]
pub struct ComponentInventory {
    components: Vec<Component>,
}

impl ComponentInventory {
    pub fn from_descriptor(bundle_dir: &Path, descriptor: &BundleDescriptor) -> Self {
        let components = descriptor
            .microservices
            .iter()
            .map(|c| component_from_config(bundle_dir, ComponentType::Microservice, c))
            .chain(
                descriptor
                    .microfrontends
                    .iter()
                    .map(|c| component_from_config(bundle_dir, ComponentType::Microfrontend, c)),
            )
            .collect();

        Self { components }
    }

    /// All components, optionally restricted to one kind.
    pub fn components(&self, filter: Option<ComponentType>) -> Vec<Component> {
        self.components
            .iter()
            .filter(|c| filter.is_none_or(|kind| c.kind == kind))
            .cloned()
            .collect()
    }

    /// Look up a single component by name.
    pub fn component(&self, name: &str) -> Result<&Component> {
        self.components
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| BundleError::ComponentNotFound(name.to_string()))
    }

    /// Select components by name, keeping the order in which they were requested.
    ///
    /// Duplicate names are collapsed to their first occurrence.
    pub fn select(&self, names: &[String]) -> Result<Vec<Component>> {
        let mut selected: Vec<Component> = Vec::with_capacity(names.len());
        for name in names {
            if selected.iter().any(|c| &c.name == name) {
                continue;
            }
            selected.push(self.component(name)?.clone());
        }
        Ok(selected)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

fn component_from_config(
    bundle_dir: &Path,
    kind: ComponentType,
    cfg: &ComponentConfig,
) -> Component {
    Component {
        name: cfg.name.clone(),
        kind,
        stack: cfg.stack,
        dir: bundle_dir.join(kind.folder()).join(&cfg.name),
        commands: ComponentCommandsOverride::from(&cfg.commands),
    }
}
