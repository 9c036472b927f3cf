#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use bundlekit::commands::BundleContext;
pub use bundlekit_test_utils::builders::{create_component_dirs, write_bundle};
pub use bundlekit_test_utils::{CapturedOutput, init_tracing, with_timeout};

/// A bundle laid out in a temporary directory.
///
/// The directory is removed when the value is dropped.
pub struct TestBundle {
    dir: TempDir,
}

impl TestBundle {
    /// Write `toml` as `bundle.toml` and create the given component dirs.
    pub fn new(toml: &str, microservices: &[&str], microfrontends: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("create temp bundle dir");
        write_bundle(dir.path(), toml);
        create_component_dirs(dir.path(), "microservices", microservices);
        create_component_dirs(dir.path(), "microfrontends", microfrontends);
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn context(&self) -> BundleContext {
        BundleContext::load(self.path()).expect("load test bundle")
    }

    pub fn log_file(&self, component: &str) -> PathBuf {
        self.path()
            .join(".bundlekit")
            .join("logs")
            .join(format!("{component}.log"))
    }
}
