// src/commands/svc.rs

//! Auxiliary services (databases, identity providers, ...) started and
//! stopped with `docker compose`, one compose file per service under `svc/`.

use console::style;

use crate::commands::{BundleContext, ExecutionOptions, SVC_DIR, execute_batch, print_dry_run};
use crate::errors::{BundleError, Result};
use crate::exec::{ComponentResult, ExecutionSpec, OutputSink, SharedStream, color_for};
use crate::report::GENERIC_FAILURE_EXIT_CODE;

/// Prefix used for the compose process output.
const SVC_PREFIX: &str = "svc";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvcAction {
    Start,
    Stop,
}

impl SvcAction {
    fn verb(self) -> &'static str {
        match self {
            SvcAction::Start => "start",
            SvcAction::Stop => "stop",
        }
    }

    fn progressive(self) -> &'static str {
        match self {
            SvcAction::Start => "Starting",
            SvcAction::Stop => "Stopping",
        }
    }
}

/// Resolve which services an invocation targets.
///
/// - `all`: every service enabled in the descriptor
/// - otherwise: the given names, each of which must be enabled
pub fn resolve_services(
    ctx: &BundleContext,
    action: SvcAction,
    names: &[String],
    all: bool,
) -> Result<Vec<String>> {
    if all {
        return Ok(ctx.descriptor.svc.clone());
    }

    if names.is_empty() {
        return Err(BundleError::Usage(format!(
            "At least one service name is required. You can also use `--all` flag to {} all enabled services",
            action.verb()
        )));
    }

    for name in names {
        if !ctx.descriptor.is_service_enabled(name) {
            return Err(BundleError::Usage(format!("Service {name} is not enabled.")));
        }
    }

    Ok(names.to_vec())
}

/// The `docker compose` command line for `action` on `services`.
pub fn compose_command(bundle_name: &str, action: SvcAction, services: &[String]) -> String {
    let files = services
        .iter()
        .map(|s| format!("-f {SVC_DIR}/{s}.yml"))
        .collect::<Vec<_>>()
        .join(" ");
    let names = services.join(" ");

    match action {
        SvcAction::Start => {
            format!("docker compose -p {bundle_name} {files} up --build -d {names}")
        }
        SvcAction::Stop => format!("docker compose -p {bundle_name} {files} stop {names}"),
    }
}

/// Start or stop services, failing with the compose process's exit code.
pub async fn run_services(
    ctx: &BundleContext,
    action: SvcAction,
    names: &[String],
    all: bool,
    dry_run: bool,
) -> Result<()> {
    let services = resolve_services(ctx, action, names, all)?;
    if services.is_empty() {
        println!("No enabled services to {}", action.verb());
        return Ok(());
    }

    let listed = services.join(", ");
    let spec = ExecutionSpec::new(
        SVC_PREFIX,
        compose_command(&ctx.descriptor.name, action, &services),
        ctx.bundle_dir.clone(),
        OutputSink::color_stream(
            SVC_PREFIX,
            SVC_PREFIX.len(),
            color_for(0),
            SharedStream::stdout(),
        ),
    )?;

    let options = ExecutionOptions {
        parallelism: Some(1),
        fail_fast: false,
        progress: false,
        dry_run,
    };

    if dry_run {
        print_dry_run(std::slice::from_ref(&spec), &options);
        return Ok(());
    }

    let announcement = if all {
        format!("{} all enabled services: ({listed})", action.progressive())
    } else {
        format!("{} services: {listed}", action.progressive())
    };
    println!("{}", style(announcement).bold());

    let results = execute_batch(vec![spec], options).await?;
    match results.first() {
        Some(ComponentResult::Finished(result)) if result.is_success() => Ok(()),
        Some(ComponentResult::Finished(result)) => Err(BundleError::ExecutionFailed {
            message: format!(
                "{} service(s) {listed} failed, {}",
                action.progressive(),
                result.reason()
            ),
            exit_code: result.exit_code().unwrap_or(GENERIC_FAILURE_EXIT_CODE),
        }),
        _ => Err(BundleError::ExecutionFailed {
            message: format!("{} service(s) {listed} was interrupted", action.progressive()),
            exit_code: GENERIC_FAILURE_EXIT_CODE,
        }),
    }
}
