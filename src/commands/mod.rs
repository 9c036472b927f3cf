// src/commands/mod.rs

//! Command-level orchestration.
//!
//! Each subcommand turns inventory entries into [`ExecutionSpec`]s, hands
//! them to a [`ParallelExecutor`] and converts the aggregated
//! [`crate::report::BuildReport`] into a CLI outcome.
//!
//! - [`build`]: build all or selected components (log files by default).
//! - [`run`]: run components with live, prefixed output.
//! - [`svc`]: start/stop auxiliary services through `docker compose`.
//! - [`list`]: print the inventory.

pub mod build;
pub mod list;
pub mod run;
pub mod svc;

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::config::{BundleDescriptor, descriptor_path, load_and_validate};
use crate::engine::{ExecutionEvent, ParallelExecutor};
use crate::errors::{BundleError, Result};
use crate::exec::{ComponentResult, ExecutionSpec, OutputSink};
use crate::inventory::{Component, ComponentInventory, command_for};
use crate::types::Phase;

/// Tool-owned folder inside the bundle.
pub const STATE_DIR: &str = ".bundlekit";
/// Per-component log files, relative to [`STATE_DIR`].
pub const LOGS_DIR: &str = "logs";
/// Build output folder, relative to [`STATE_DIR`].
pub const OUTPUT_DIR: &str = "output";
/// Folder holding `docker compose` files for auxiliary services.
pub const SVC_DIR: &str = "svc";

/// Loaded bundle: root directory, validated descriptor and inventory.
#[derive(Debug, Clone)]
pub struct BundleContext {
    pub bundle_dir: PathBuf,
    pub descriptor: BundleDescriptor,
    pub inventory: ComponentInventory,
}

impl BundleContext {
    /// Load `bundle.toml` from `bundle_dir`.
    ///
    /// The directory is made absolute so every spec gets an absolute working
    /// directory regardless of the process's current directory.
    pub fn load(bundle_dir: &Path) -> Result<Self> {
        let bundle_dir = std::path::absolute(bundle_dir)?;
        let descriptor = load_and_validate(descriptor_path(&bundle_dir))?;
        let inventory = ComponentInventory::from_descriptor(&bundle_dir, &descriptor);
        Ok(Self {
            bundle_dir,
            descriptor,
            inventory,
        })
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.bundle_dir.join(STATE_DIR).join(LOGS_DIR)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.bundle_dir.join(STATE_DIR).join(OUTPUT_DIR)
    }

    pub fn log_file_for(&self, component: &str) -> PathBuf {
        self.logs_dir().join(format!("{component}.log"))
    }
}

/// Executor settings resolved from CLI flags and the descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionOptions {
    pub parallelism: Option<usize>,
    pub fail_fast: bool,
    /// Drive a progress bar from completion events.
    pub progress: bool,
    /// Print the specs instead of executing them.
    pub dry_run: bool,
}

/// Build one spec per component for `phase`, choosing sinks with `sink_for`.
pub fn specs_for(
    components: &[Component],
    phase: Phase,
    mut sink_for: impl FnMut(usize, &Component) -> OutputSink,
) -> Result<Vec<ExecutionSpec>> {
    components
        .iter()
        .enumerate()
        .map(|(index, component)| {
            let command = command_for(component, phase)
                .ok_or_else(|| BundleError::EmptyCommand(component.name.clone()))?;
            ExecutionSpec::new(
                component.name.clone(),
                command,
                component.dir.clone(),
                sink_for(index, component),
            )
        })
        .collect()
}

/// Run a batch of specs and return the positional results.
///
/// Wires Ctrl-C to the executor's interrupt and, when requested, an
/// `indicatif` progress bar counting `Done` events.
pub async fn execute_batch(
    specs: Vec<ExecutionSpec>,
    options: ExecutionOptions,
) -> Result<Vec<ComponentResult>> {
    let total = specs.len() as u64;
    let executor = ParallelExecutor::new(specs, options.parallelism, options.fail_fast)?;

    let (interrupt_tx, interrupt_rx) = oneshot::channel::<()>();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = interrupt_tx.send(());
        }
    });

    let (events_tx, events_rx) = mpsc::unbounded_channel::<ExecutionEvent>();
    let progress = options.progress.then(|| progress_bar(total));
    let consumer = tokio::spawn(consume_events(events_rx, progress.clone()));

    let results = executor
        .with_events(events_tx)
        .with_interrupt(interrupt_rx)
        .execute()
        .await;

    ctrl_c.abort();
    if let Err(e) = consumer.await {
        debug!(error = %e, "progress consumer ended abnormally");
    }
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    Ok(results)
}

async fn consume_events(
    mut events: mpsc::UnboundedReceiver<ExecutionEvent>,
    progress: Option<ProgressBar>,
) {
    while let Some(event) = events.recv().await {
        debug!(?event, "execution event");
        let Some(bar) = progress.as_ref() else {
            continue;
        };
        match event {
            ExecutionEvent::Started { component, .. } => bar.set_message(component),
            ExecutionEvent::Done { .. } => bar.inc(1),
        }
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Print what would be executed, without launching anything.
pub fn print_dry_run(specs: &[ExecutionSpec], options: &ExecutionOptions) {
    println!("bundlekit dry-run");
    match options.parallelism {
        Some(p) => println!("  parallelism = {p}"),
        None => println!(
            "  parallelism = {} (default)",
            crate::engine::default_parallelism()
        ),
    }
    println!("  fail_fast = {}", options.fail_fast);
    println!();

    println!("components ({}):", specs.len());
    for spec in specs {
        println!("  - {}", spec.component_name());
        println!("      cmd: {}", spec.command());
        println!("      cwd: {}", spec.working_directory().display());
        println!("      output: {}", spec.sink().describe());
    }
}

/// Remove a directory tree if it exists.
fn clear_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        debug!(dir = %dir.display(), "clearing directory");
        std::fs::remove_dir_all(dir)?;
    }
    Ok(())
}
