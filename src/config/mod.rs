// src/config/mod.rs

//! Bundle descriptor loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed descriptor model (`model.rs`).
//! - Load `bundle.toml` from disk (`loader.rs`).
//! - Validate names, uniqueness and executor defaults (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DESCRIPTOR_FILE_NAME, descriptor_path, load_and_validate, load_from_path};
pub use model::{
    BuildSection, BundleDescriptor, ComponentCommands, ComponentConfig, RawBundleDescriptor,
};
pub use validate::is_valid_name;
