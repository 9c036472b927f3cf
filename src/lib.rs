// src/lib.rs

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod inventory;
pub mod logging;
pub mod report;
pub mod types;

use tracing::debug;

use crate::cli::{CliArgs, Command, SvcCommand};
use crate::commands::build::{BuildOptions, build_all};
use crate::commands::list::list_components;
use crate::commands::run::run_components;
use crate::commands::svc::{SvcAction, run_services};
use crate::commands::BundleContext;
use crate::errors::Result;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - bundle descriptor loading and validation
/// - the component inventory
/// - the subcommand's orchestration (specs, executor, report)
pub async fn run(args: CliArgs) -> Result<()> {
    let ctx = BundleContext::load(&args.bundle_dir)?;
    debug!(
        bundle = %ctx.descriptor.name,
        dir = %ctx.bundle_dir.display(),
        components = ctx.inventory.len(),
        "bundle loaded"
    );

    match args.command {
        Command::Build(build) => {
            let options = BuildOptions {
                stdout: build.stdout,
                parallelism: build.parallelism,
                fail_fast: build.fail_fast,
                dry_run: args.dry_run,
            };
            build_all(&ctx, &build.names, build.filter.kind(), options).await
        }
        Command::Run(run) => run_components(&ctx, &run.names, args.dry_run).await,
        Command::Svc(SvcCommand::Start(svc)) => {
            run_services(&ctx, SvcAction::Start, &svc.services, svc.all, args.dry_run).await
        }
        Command::Svc(SvcCommand::Stop(svc)) => {
            run_services(&ctx, SvcAction::Stop, &svc.services, svc.all, args.dry_run).await
        }
        Command::List(filter) => {
            list_components(&ctx, filter.kind());
            Ok(())
        }
    }
}
