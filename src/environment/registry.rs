//! The environment registry.
//!
//! Maps environment names to descriptors saying whether variables come
//! from a local env file or from the deployment system.

use crate::config::OrchestratorConfig;
use crate::error::{GateError, Result};
use std::collections::BTreeMap;

/// Whether an environment is local or cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentKind {
    /// Variables are sourced from a developer-local env file.
    Local,
    /// Variables are provided by the deployment system.
    Cloud,
}

impl EnvironmentKind {
    /// Map an `isLocal` flag to a kind.
    pub fn from_is_local(is_local: bool) -> Self {
        if is_local {
            Self::Local
        } else {
            Self::Cloud
        }
    }

    /// True for [`EnvironmentKind::Local`].
    pub fn is_local(self) -> bool {
        self == Self::Local
    }
}

impl std::fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Cloud => write!(f, "cloud"),
        }
    }
}

/// A registered environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDescriptor {
    /// Registry key.
    pub name: String,
    /// Variables come from a local env file when true.
    pub is_local: bool,
}

impl EnvironmentDescriptor {
    /// Create a descriptor.
    pub fn new(name: impl Into<String>, is_local: bool) -> Self {
        Self {
            name: name.into(),
            is_local,
        }
    }

    /// The kind of this environment.
    pub fn kind(&self) -> EnvironmentKind {
        EnvironmentKind::from_is_local(self.is_local)
    }
}

/// Read-only view of the orchestrator's environments.
///
/// Names iterate alphabetically, so error messages listing them are stable.
///
/// # Example
///
/// ```
/// use dotenv_gate::environment::EnvironmentRegistry;
///
/// let registry = EnvironmentRegistry::new()
///     .with_environment("prod", false)
///     .with_environment("dev", true);
///
/// assert_eq!(registry.names(), vec!["dev", "prod"]);
/// assert!(registry.get("dev").unwrap().is_local);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentRegistry {
    environments: BTreeMap<String, EnvironmentDescriptor>,
}

impl EnvironmentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from the orchestrator configuration.
    pub fn from_config(config: &OrchestratorConfig) -> Self {
        Self {
            environments: config
                .environments
                .iter()
                .map(|(name, env)| {
                    (
                        name.clone(),
                        EnvironmentDescriptor::new(name.clone(), env.is_local),
                    )
                })
                .collect(),
        }
    }

    /// Add an environment, replacing any existing entry with the same name.
    pub fn with_environment(mut self, name: impl Into<String>, is_local: bool) -> Self {
        let descriptor = EnvironmentDescriptor::new(name, is_local);
        self.environments
            .insert(descriptor.name.clone(), descriptor);
        self
    }

    /// Get a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&EnvironmentDescriptor> {
        self.environments.get(name)
    }

    /// Get a descriptor by name, failing with the list of known names.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEnvironment` if `name` is not registered.
    pub fn lookup(&self, name: &str) -> Result<&EnvironmentDescriptor> {
        self.get(name).ok_or_else(|| GateError::UnknownEnvironment {
            name: name.to_string(),
            available: self.names().into_iter().map(String::from).collect(),
        })
    }

    /// Registered names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        self.environments.keys().map(String::as_str).collect()
    }

    /// Get the number of environments.
    pub fn len(&self) -> usize {
        self.environments.len()
    }

    /// Check if no environments are registered.
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}
