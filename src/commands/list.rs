// src/commands/list.rs

use console::style;

use crate::commands::BundleContext;
use crate::types::ComponentType;

/// Print the components of the bundle, optionally restricted to one kind.
pub fn list_components(ctx: &BundleContext, kind: Option<ComponentType>) {
    let components = ctx.inventory.components(kind);
    println!(
        "{} {} ({} components)",
        style(&ctx.descriptor.name).bold(),
        ctx.descriptor.version,
        components.len()
    );

    let width = crate::exec::column_width(components.iter().map(|c| c.name.as_str()));
    for c in &components {
        println!(
            "  {:<width$}  {:<13}  {:<11}  {}",
            c.name,
            c.kind.to_string(),
            c.stack.to_string(),
            c.dir.display()
        );
    }

    if !ctx.descriptor.svc.is_empty() {
        println!("services: {}", ctx.descriptor.svc.join(", "));
    }
}
