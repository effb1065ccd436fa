//! Configuration loading and parsing.
//!
//! This module handles:
//! - Schema definitions in [`schema`]
//! - Orchestrator config discovery and loading in [`loader`]
//! - Env file parsing and variable expansion in [`env_file`]
//!
//! # Example
//!
//! ```
//! use dotenv_gate::config::load_project_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join("orcdk.config.json"),
//!     r#"{ "environments": { "dev": { "isLocal": true } } }"#,
//! )
//! .unwrap();
//!
//! let config = load_project_config(temp.path()).unwrap();
//! assert!(config.environments["dev"].is_local);
//! ```

pub mod env_file;
pub mod loader;
pub mod schema;

// Schema re-exports
pub use schema::{DotenvSettings, EnvironmentConfig, OrchestratorConfig, PluginConfig};

// Loader re-exports
pub use loader::{
    find_orchestrator_config, load_orchestrator_config, load_project_config,
    parse_orchestrator_config, ConfigFormat, CONFIG_FILE_NAMES,
};

// Env file re-exports
pub use env_file::{expand, resolve_entries, EnvEntry, EnvFileParser, Quoting};

