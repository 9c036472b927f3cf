// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::ComponentType;

/// Command-line arguments for `bundlekit`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "bundlekit",
    version,
    about = "Build and run multi-component application bundles.",
    long_about = None
)]
pub struct CliArgs {
    /// Bundle root directory (the one containing `bundle.toml`).
    #[arg(long, value_name = "DIR", default_value = ".", global = true)]
    pub bundle_dir: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BUNDLEKIT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Print the commands that would run, without executing anything.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Build all (or the named) components in parallel.
    Build(BuildArgs),
    /// Run one or more components with live output.
    Run(RunArgs),
    /// Manage auxiliary services.
    #[command(subcommand)]
    Svc(SvcCommand),
    /// List the components of the bundle.
    List(KindFilter),
}

/// `--ms` / `--mfe` component kind filter.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct KindFilter {
    /// Only microservices.
    #[arg(long, conflicts_with = "mfe")]
    pub ms: bool,

    /// Only micro frontends.
    #[arg(long)]
    pub mfe: bool,
}

impl KindFilter {
    pub fn kind(&self) -> Option<ComponentType> {
        match (self.ms, self.mfe) {
            (true, _) => Some(ComponentType::Microservice),
            (_, true) => Some(ComponentType::Microfrontend),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
    /// Components to build; all when omitted.
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    #[command(flatten)]
    pub filter: KindFilter,

    /// Stream prefixed build output instead of writing log files.
    #[arg(long)]
    pub stdout: bool,

    /// Maximum number of components built at once (default: CPU count).
    #[arg(
        long,
        value_name = "N",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub parallelism: Option<usize>,

    /// Stop launching new builds after the first failure.
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Components to run.
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SvcCommand {
    /// Start auxiliary services.
    Start(SvcArgs),
    /// Stop running auxiliary services.
    Stop(SvcArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SvcArgs {
    /// Services to act on.
    #[arg(value_name = "SERVICE")]
    pub services: Vec<String>,

    /// Act on every service enabled in the bundle descriptor.
    #[arg(long)]
    pub all: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
