//! Configuration schema definitions.
//!
//! These structs map the orchestrator configuration file and the plugin
//! entries inside it. Field names follow the orchestrator's camelCase JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root of the orchestrator configuration (`orcdk.config.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Named deployment environments.
    ///
    /// BTreeMap for deterministic (alphabetical) ordering.
    pub environments: BTreeMap<String, EnvironmentConfig>,

    /// Plugin entries.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginConfig>,
}

impl OrchestratorConfig {
    /// Find the configuration entry for a plugin by name.
    pub fn plugin(&self, name: &str) -> Option<&PluginConfig> {
        self.plugins.iter().find(|p| p.name == name)
    }
}

/// One environment in the orchestrator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Variables come from a developer-local env file when true.
    #[serde(default, rename = "isLocal", alias = "is_local")]
    pub is_local: bool,

    /// Other orchestrator settings for this environment, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A plugin entry as the orchestrator passes it to `initialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Plugin package name.
    pub name: String,

    /// Whether the orchestrator should load the plugin.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Plugin-specific settings.
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

impl PluginConfig {
    /// Create an enabled plugin entry with no settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            config: serde_json::Map::new(),
        }
    }

    /// Set a plugin-specific setting.
    pub fn with_setting(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }
}

fn default_true() -> bool {
    true
}

/// Settings understood by the dotenv plugin inside `PluginConfig::config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DotenvSettings {
    /// Override for the default required variable list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_variables: Option<Vec<String>>,
}
