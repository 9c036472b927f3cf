// src/config/validate.rs

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::model::{BundleDescriptor, ComponentConfig, RawBundleDescriptor};
use crate::errors::{BundleError, Result};
use crate::types::Stack;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w-]+$").expect("static name regex is valid"));

/// Whether `name` is usable as a bundle, component or service name.
///
/// Only alphanumerics, underscore and dash are allowed; the name becomes a
/// directory and a log file name.
pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

impl TryFrom<RawBundleDescriptor> for BundleDescriptor {
    type Error = BundleError;

    fn try_from(raw: RawBundleDescriptor) -> std::result::Result<Self, Self::Error> {
        validate_raw_descriptor(&raw)?;
        Ok(BundleDescriptor::new_unchecked(raw))
    }
}

fn validate_raw_descriptor(raw: &RawBundleDescriptor) -> Result<()> {
    validate_bundle_name(raw)?;
    validate_build_section(raw)?;
    validate_components(raw)?;
    validate_services(raw)?;
    Ok(())
}

fn validate_bundle_name(raw: &RawBundleDescriptor) -> Result<()> {
    if !is_valid_name(&raw.name) {
        return Err(BundleError::ConfigError(format!(
            "'{}' is not a valid bundle name. Only alphanumeric characters, underscore and dash are allowed",
            raw.name
        )));
    }
    Ok(())
}

fn validate_build_section(raw: &RawBundleDescriptor) -> Result<()> {
    if raw.build.parallelism == Some(0) {
        return Err(BundleError::ConfigError(
            "[build].parallelism must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_components(raw: &RawBundleDescriptor) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    let all = raw
        .microservices
        .iter()
        .map(|c| ("microservice", c))
        .chain(raw.microfrontends.iter().map(|c| ("microfrontend", c)));

    for (kind, component) in all {
        if !is_valid_name(&component.name) {
            return Err(BundleError::ConfigError(format!(
                "'{}' is not a valid {kind} name. Only alphanumeric characters, underscore and dash are allowed",
                component.name
            )));
        }
        if !seen.insert(component.name.as_str()) {
            return Err(BundleError::ConfigError(format!(
                "component name '{}' is used more than once in the bundle descriptor",
                component.name
            )));
        }
        validate_commands(component)?;
    }
    Ok(())
}

fn validate_commands(component: &ComponentConfig) -> Result<()> {
    let overrides = [
        ("build", component.commands.build.as_deref()),
        ("run", component.commands.run.as_deref()),
    ];

    for (phase, cmd) in overrides {
        match cmd {
            Some(cmd) if cmd.trim().is_empty() => {
                return Err(BundleError::ConfigError(format!(
                    "component '{}' has an empty `commands.{phase}`",
                    component.name
                )));
            }
            None if component.stack == Stack::Custom => {
                return Err(BundleError::ConfigError(format!(
                    "component '{}' uses the custom stack and must define `commands.{phase}`",
                    component.name
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

fn validate_services(raw: &RawBundleDescriptor) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for service in raw.svc.iter() {
        if !is_valid_name(service) {
            return Err(BundleError::ConfigError(format!(
                "'{service}' is not a valid service name"
            )));
        }
        if !seen.insert(service.as_str()) {
            return Err(BundleError::ConfigError(format!(
                "service '{service}' is listed more than once in `svc`"
            )));
        }
    }
    Ok(())
}
