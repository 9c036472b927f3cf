// src/commands/run.rs

use console::style;

use crate::commands::{BundleContext, ExecutionOptions, execute_batch, print_dry_run, specs_for};
use crate::errors::{BundleError, Result};
use crate::exec::{OutputSink, SharedStream, color_for, column_width};
use crate::report::aggregate;
use crate::types::Phase;

/// Run the named components with live, prefixed output.
///
/// All components start at once (parallelism = number of names) and a
/// failing component never stops its siblings. The exit code follows the
/// first failing component's own exit code.
pub async fn run_components(ctx: &BundleContext, names: &[String], dry_run: bool) -> Result<()> {
    if names.is_empty() {
        return Err(BundleError::Usage(
            "Run failed, missing required arg name".to_string(),
        ));
    }

    let components = ctx.inventory.select(names)?;
    for component in &components {
        if !component.dir.is_dir() {
            return Err(BundleError::ConfigError(format!(
                "Component directory {} does not exist",
                component.dir.display()
            )));
        }
    }

    let stream = SharedStream::stdout();
    let width = column_width(components.iter().map(|c| c.name.as_str()));
    let specs = specs_for(&components, Phase::Run, |index, component| {
        OutputSink::color_stream(component.name.clone(), width, color_for(index), stream.clone())
    })?;

    let options = ExecutionOptions {
        parallelism: Some(components.len()),
        fail_fast: false,
        progress: false,
        dry_run,
    };

    if dry_run {
        print_dry_run(&specs, &options);
        return Ok(());
    }

    let listed = components
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    println!("{}", style(format!("Running {listed}...")).bold().blue());

    let results = execute_batch(specs, options).await?;
    let names: Vec<&str> = components.iter().map(|c| c.name.as_str()).collect();
    let report = aggregate(&results, &names);

    report.into_result("The following components failed to run:", None)
}
