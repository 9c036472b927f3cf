// src/commands/build.rs

use console::style;
use tracing::info;

use crate::commands::{BundleContext, ExecutionOptions, clear_dir, execute_batch, print_dry_run, specs_for};
use crate::errors::Result;
use crate::exec::{OutputSink, SharedStream, color_for, column_width};
use crate::inventory::Component;
use crate::report::aggregate;
use crate::types::{ComponentType, Phase};

/// Flags of the `build` subcommand, merged with `[build]` defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Stream prefixed output instead of writing per-component log files.
    pub stdout: bool,
    pub parallelism: Option<usize>,
    pub fail_fast: bool,
    pub dry_run: bool,
}

/// Build every selected component.
///
/// - no `names`: all components, optionally filtered by `kind`
/// - with `names`: exactly those, in the given order (`kind` still applies)
pub async fn build_all(
    ctx: &BundleContext,
    names: &[String],
    kind: Option<ComponentType>,
    options: BuildOptions,
) -> Result<()> {
    let components: Vec<Component> = if names.is_empty() {
        ctx.inventory.components(kind)
    } else {
        ctx.inventory
            .select(names)?
            .into_iter()
            .filter(|c| kind.is_none_or(|k| c.kind == k))
            .collect()
    };

    if components.is_empty() {
        println!("No components to build");
        return Ok(());
    }

    let listed = components
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let label = kind.map_or("components", ComponentType::plural_label);
    println!("{}", style(format!("Building {listed} {label}...")).bold().blue());

    build_components(ctx, &components, options).await
}

/// Build `components` in parallel and fail with one summarizing error.
pub async fn build_components(
    ctx: &BundleContext,
    components: &[Component],
    options: BuildOptions,
) -> Result<()> {
    let execution = ExecutionOptions {
        parallelism: options.parallelism.or(ctx.descriptor.build.parallelism),
        fail_fast: options.fail_fast || ctx.descriptor.build.fail_fast,
        progress: !options.stdout,
        dry_run: options.dry_run,
    };

    let stream = SharedStream::stdout();
    let width = column_width(components.iter().map(|c| c.name.as_str()));

    if execution.dry_run {
        let specs = specs_for(components, Phase::Build, |index, component| {
            build_sink(ctx, options.stdout, &stream, width, index, component)
        })?;
        print_dry_run(&specs, &execution);
        return Ok(());
    }

    clear_dir(&ctx.logs_dir())?;
    clear_dir(&ctx.output_dir())?;

    let specs = specs_for(components, Phase::Build, |index, component| {
        let sink = build_sink(ctx, options.stdout, &stream, width, index, component);
        if let OutputSink::LogFile(path) = &sink {
            println!(
                "- Build output for {} will be available in {}",
                component.name,
                path.display()
            );
        }
        sink
    })?;

    info!(
        components = specs.len(),
        parallelism = ?execution.parallelism,
        fail_fast = execution.fail_fast,
        "building components"
    );

    let results = execute_batch(specs, execution).await?;
    let names: Vec<&str> = components.iter().map(|c| c.name.as_str()).collect();
    let report = aggregate(&results, &names);

    if report.is_success() {
        println!("{}", style("Build completed successfully").green().bold());
    }

    let footer = (!options.stdout).then_some("See log files for more information");
    report.into_result("The following components failed to build:", footer)
}

fn build_sink(
    ctx: &BundleContext,
    stdout: bool,
    stream: &SharedStream,
    width: usize,
    index: usize,
    component: &Component,
) -> OutputSink {
    if stdout {
        OutputSink::color_stream(component.name.clone(), width, color_for(index), stream.clone())
    } else {
        OutputSink::log_file(ctx.log_file_for(&component.name))
    }
}
