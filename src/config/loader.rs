// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{BundleDescriptor, RawBundleDescriptor};
use crate::errors::{BundleError, Result};

/// File name of the descriptor at the root of every bundle.
pub const DESCRIPTOR_FILE_NAME: &str = "bundle.toml";

/// Load a descriptor from a given path without semantic validation.
///
/// Use [`load_and_validate`] everywhere outside of tests.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawBundleDescriptor> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        BundleError::ConfigError(format!(
            "cannot read bundle descriptor at {}: {e} (is this a bundle project?)",
            path.display()
        ))
    })?;

    let descriptor: RawBundleDescriptor = toml::from_str(&contents)?;

    Ok(descriptor)
}

/// Load a descriptor from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde`).
/// - Checks names, uniqueness, custom-stack commands and `[build]` values.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BundleDescriptor> {
    let raw = load_from_path(&path)?;
    BundleDescriptor::try_from(raw)
}

/// Path of the descriptor inside a bundle directory.
pub fn descriptor_path(bundle_dir: &Path) -> PathBuf {
    bundle_dir.join(DESCRIPTOR_FILE_NAME)
}
