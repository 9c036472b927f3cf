// src/config/model.rs

use serde::Deserialize;

use crate::types::Stack;

/// Bundle descriptor as read from `bundle.toml`, before validation.
///
/// ```toml
/// name = "sample-bundle"
/// version = "0.0.1"
/// svc = ["postgresql"]
///
/// [build]
/// parallelism = 4
/// fail_fast = true
///
/// [[microservices]]
/// name = "orders"
/// stack = "spring-boot"
///
/// [[microfrontends]]
/// name = "orders-ui"
/// stack = "react"
/// ```
///
/// Convert into a [`BundleDescriptor`] with `TryFrom`, which runs the
/// semantic checks in `validate.rs`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBundleDescriptor {
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Auxiliary services enabled for this bundle (`svc/<name>.yml`).
    #[serde(default)]
    pub svc: Vec<String>,

    /// Executor defaults from `[build]`.
    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub microservices: Vec<ComponentConfig>,

    #[serde(default)]
    pub microfrontends: Vec<ComponentConfig>,
}

fn default_version() -> String {
    "0.0.1".to_string()
}

/// `[build]` section: defaults for the parallel executor.
///
/// CLI flags take precedence over both values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildSection {
    /// Maximum number of components built at once; `None` means one per CPU.
    #[serde(default)]
    pub parallelism: Option<usize>,

    /// Stop launching new components after the first failure.
    #[serde(default)]
    pub fail_fast: bool,
}

/// One `[[microservices]]` or `[[microfrontends]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentConfig {
    pub name: String,
    pub stack: Stack,

    #[serde(default)]
    pub commands: ComponentCommands,
}

/// Optional per-phase command overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentCommands {
    #[serde(default)]
    pub build: Option<String>,

    #[serde(default)]
    pub run: Option<String>,
}

/// A validated bundle descriptor.
///
/// Only constructible through `TryFrom<RawBundleDescriptor>` (or
/// [`BundleDescriptor::new_unchecked`] inside the crate), so holders can rely
/// on names being valid and unique.
#[derive(Debug, Clone)]
pub struct BundleDescriptor {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub svc: Vec<String>,
    pub build: BuildSection,
    pub microservices: Vec<ComponentConfig>,
    pub microfrontends: Vec<ComponentConfig>,
}

impl BundleDescriptor {
    pub(crate) fn new_unchecked(raw: RawBundleDescriptor) -> Self {
        Self {
            name: raw.name,
            version: raw.version,
            description: raw.description,
            svc: raw.svc,
            build: raw.build,
            microservices: raw.microservices,
            microfrontends: raw.microfrontends,
        }
    }

    /// Whether the auxiliary service is listed in `svc`.
    pub fn is_service_enabled(&self, service: &str) -> bool {
        self.svc.iter().any(|s| s == service)
    }
}
