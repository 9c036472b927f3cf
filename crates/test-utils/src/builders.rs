#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use bundlekit::config::{
    BuildSection, BundleDescriptor, ComponentCommands, ComponentConfig, RawBundleDescriptor,
};
use bundlekit::exec::{ExecutionSpec, OutputSink, SharedStream, color_for};
use bundlekit::types::Stack;

/// Builder for `BundleDescriptor` to simplify test setup.
pub struct DescriptorBuilder {
    raw: RawBundleDescriptor,
}

impl DescriptorBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            raw: RawBundleDescriptor {
                name: name.to_string(),
                version: "0.0.1".to_string(),
                description: None,
                svc: vec![],
                build: BuildSection::default(),
                microservices: vec![],
                microfrontends: vec![],
            },
        }
    }

    pub fn with_microservice(mut self, component: ComponentConfig) -> Self {
        self.raw.microservices.push(component);
        self
    }

    pub fn with_microfrontend(mut self, component: ComponentConfig) -> Self {
        self.raw.microfrontends.push(component);
        self
    }

    pub fn with_service(mut self, service: &str) -> Self {
        self.raw.svc.push(service.to_string());
        self
    }

    pub fn parallelism(mut self, n: usize) -> Self {
        self.raw.build.parallelism = Some(n);
        self
    }

    pub fn fail_fast(mut self, val: bool) -> Self {
        self.raw.build.fail_fast = val;
        self
    }

    pub fn build_raw(self) -> RawBundleDescriptor {
        self.raw
    }

    pub fn build(self) -> BundleDescriptor {
        BundleDescriptor::try_from(self.raw).expect("Failed to build valid descriptor from builder")
    }
}

/// Builder for `ComponentConfig`.
pub struct ComponentBuilder {
    component: ComponentConfig,
}

impl ComponentBuilder {
    pub fn new(name: &str, stack: Stack) -> Self {
        Self {
            component: ComponentConfig {
                name: name.to_string(),
                stack,
                commands: ComponentCommands::default(),
            },
        }
    }

    /// A `custom` stack component with both commands set.
    pub fn custom(name: &str, build: &str, run: &str) -> Self {
        Self::new(name, Stack::Custom).build_command(build).run_command(run)
    }

    pub fn build_command(mut self, cmd: &str) -> Self {
        self.component.commands.build = Some(cmd.to_string());
        self
    }

    pub fn run_command(mut self, cmd: &str) -> Self {
        self.component.commands.run = Some(cmd.to_string());
        self
    }

    pub fn build(self) -> ComponentConfig {
        self.component
    }
}

/// Spec writing to a log file.
pub fn log_spec(name: &str, command: &str, dir: &Path, log: &Path) -> ExecutionSpec {
    ExecutionSpec::new(name, command, dir, OutputSink::log_file(log))
        .expect("Failed to build log file spec")
}

/// Spec writing prefixed lines to `stream`.
pub fn stream_spec(
    name: &str,
    command: &str,
    dir: &Path,
    stream: &SharedStream,
    width: usize,
) -> ExecutionSpec {
    let sink = OutputSink::color_stream(name, width, color_for(0), stream.clone());
    ExecutionSpec::new(name, command, dir, sink).expect("Failed to build stream spec")
}

/// Spec for runners that never touch the OS (e.g. `FakeRunner`).
pub fn fake_spec(name: &str) -> ExecutionSpec {
    let sink = SharedStream::from_writer(std::io::sink());
    let sink = OutputSink::color_stream(name, name.len(), color_for(0), sink);
    ExecutionSpec::new(name, "true", std::env::temp_dir(), sink)
        .expect("Failed to build fake spec")
}

/// `fake_spec` for each name.
pub fn fake_specs(names: &[&str]) -> Vec<ExecutionSpec> {
    names.iter().map(|n| fake_spec(n)).collect()
}

/// Write `bundle.toml` into `dir`.
pub fn write_bundle(dir: &Path, toml: &str) -> PathBuf {
    let path = dir.join("bundle.toml");
    fs::write(&path, toml).expect("Failed to write bundle.toml");
    path
}

/// Create `<dir>/<folder>/<name>` component directories.
pub fn create_component_dirs(dir: &Path, folder: &str, names: &[&str]) {
    for name in names {
        fs::create_dir_all(dir.join(folder).join(name)).expect("Failed to create component dir");
    }
}
