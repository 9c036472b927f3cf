// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Kind of component in a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Microservice,
    Microfrontend,
}

impl ComponentType {
    /// Directory (relative to the bundle root) holding components of this kind.
    pub fn folder(self) -> &'static str {
        match self {
            ComponentType::Microservice => "microservices",
            ComponentType::Microfrontend => "microfrontends",
        }
    }

    /// Plural label used in user-facing messages.
    pub fn plural_label(self) -> &'static str {
        match self {
            ComponentType::Microservice => "microservices",
            ComponentType::Microfrontend => "micro frontends",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentType::Microservice => write!(f, "microservice"),
            ComponentType::Microfrontend => write!(f, "microfrontend"),
        }
    }
}

/// Technology stack of a component; decides the default build/run commands.
///
/// - `Custom` has no defaults: both `build` and `run` must be given in the
///   component's `commands` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stack {
    SpringBoot,
    Node,
    React,
    Angular,
    Custom,
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stack::SpringBoot => "spring-boot",
            Stack::Node => "node",
            Stack::React => "react",
            Stack::Angular => "angular",
            Stack::Custom => "custom",
        };
        f.write_str(s)
    }
}

impl FromStr for Stack {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spring-boot" => Ok(Stack::SpringBoot),
            "node" => Ok(Stack::Node),
            "react" => Ok(Stack::React),
            "angular" => Ok(Stack::Angular),
            "custom" => Ok(Stack::Custom),
            other => Err(format!(
                "invalid stack: {other} (expected one of spring-boot, node, react, angular, custom)"
            )),
        }
    }
}

/// Lifecycle phase a command is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Build,
    Run,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Build => write!(f, "build"),
            Phase::Run => write!(f, "run"),
        }
    }
}
