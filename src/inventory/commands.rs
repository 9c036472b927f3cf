// src/inventory/commands.rs

//! Default build/run commands per stack.

use crate::inventory::Component;
use crate::types::{Phase, Stack};

/// Command line used to execute `phase` for `component`.
///
/// A per-component override from the descriptor always wins. Returns `None`
/// only for a `custom` stack without override, which descriptor validation
/// already rejects.
pub fn command_for(component: &Component, phase: Phase) -> Option<String> {
    let custom = match phase {
        Phase::Build => component.commands.build.as_ref(),
        Phase::Run => component.commands.run.as_ref(),
    };

    if let Some(cmd) = custom {
        return Some(cmd.clone());
    }

    default_command(component.stack, phase).map(str::to_string)
}

fn default_command(stack: Stack, phase: Phase) -> Option<&'static str> {
    match (stack, phase) {
        (Stack::SpringBoot, Phase::Build) => Some("mvn clean package"),
        (Stack::SpringBoot, Phase::Run) => Some("mvn spring-boot:run"),
        (Stack::Node | Stack::React | Stack::Angular, Phase::Build) => {
            Some("npm install && npm run build")
        }
        (Stack::Node | Stack::React | Stack::Angular, Phase::Run) => {
            Some("npm install && npm start")
        }
        (Stack::Custom, _) => None,
    }
}
