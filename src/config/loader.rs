//! Orchestrator configuration discovery and loading.
//!
//! The orchestrator keeps its configuration in a single file at the
//! project root. JSON is the orchestrator's native format; YAML is
//! accepted as well.

use crate::config::schema::OrchestratorConfig;
use crate::error::{GateError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Candidate configuration file names, checked in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "orcdk.config.json",
    "orcdk.config.yml",
    "orcdk.config.yaml",
];

/// Supported configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension. Anything but `.yml`/`.yaml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Find the orchestrator config in `project_root`.
///
/// # Returns
///
/// The first existing file from [`CONFIG_FILE_NAMES`], or None.
pub fn find_orchestrator_config(project_root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| project_root.join(name))
        .find(|path| path.is_file())
}

/// Load and parse an orchestrator config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the content is invalid.
pub fn load_orchestrator_config(path: &Path) -> Result<OrchestratorConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GateError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            GateError::Io(e)
        }
    })?;

    parse_orchestrator_config(&content, ConfigFormat::from_path(path), path)
}

/// Discover and load the orchestrator config for a project.
///
/// # Errors
///
/// Returns `ConfigNotFound` (naming the JSON file) when no candidate exists.
pub fn load_project_config(project_root: &Path) -> Result<OrchestratorConfig> {
    match find_orchestrator_config(project_root) {
        Some(path) => load_orchestrator_config(&path),
        None => Err(GateError::ConfigNotFound {
            path: project_root.join(CONFIG_FILE_NAMES[0]),
        }),
    }
}

/// Parse configuration content.
///
/// # Arguments
///
/// * `content` - The file content to parse
/// * `format` - JSON or YAML
/// * `source_path` - Path for error reporting
pub fn parse_orchestrator_config(
    content: &str,
    format: ConfigFormat,
    source_path: &Path,
) -> Result<OrchestratorConfig> {
    let parsed: std::result::Result<OrchestratorConfig, String> = match format {
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
    };

    parsed.map_err(|message| GateError::ConfigParseError {
        path: source_path.to_path_buf(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("noext")), ConfigFormat::Json);
    }

    #[test]
    fn find_prefers_json() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("orcdk.config.yml"), "environments: {}").unwrap();
        fs::write(temp.path().join("orcdk.config.json"), "{}").unwrap();

        let found = find_orchestrator_config(temp.path()).unwrap();
        assert!(found.ends_with("orcdk.config.json"));
    }

    #[test]
    fn find_falls_back_to_yaml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("orcdk.config.yaml"), "environments: {}").unwrap();

        let found = find_orchestrator_config(temp.path()).unwrap();
        assert!(found.ends_with("orcdk.config.yaml"));
    }

    #[test]
    fn find_returns_none_when_absent() {
        let temp = TempDir::new().unwrap();
        assert!(find_orchestrator_config(temp.path()).is_none());
    }

    #[test]
    fn loads_json_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("orcdk.config.json");
        fs::write(&path, r#"{ "environments": { "dev": { "isLocal": true } } }"#).unwrap();

        let config = load_orchestrator_config(&path).unwrap();
        assert!(config.environments["dev"].is_local);
    }

    #[test]
    fn loads_yaml_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("orcdk.config.yml");
        fs::write(&path, "environments:\n  prod:\n    isLocal: false\n").unwrap();

        let config = load_orchestrator_config(&path).unwrap();
        assert!(!config.environments["prod"].is_local);
    }

    #[test]
    fn load_missing_file_is_config_not_found() {
        let result = load_orchestrator_config(Path::new("/nonexistent/orcdk.config.json"));
        assert!(matches!(result, Err(GateError::ConfigNotFound { .. })));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let result = parse_orchestrator_config(
            "{ not json",
            ConfigFormat::Json,
            Path::new("orcdk.config.json"),
        );
        assert!(matches!(result, Err(GateError::ConfigParseError { .. })));
    }

    #[test]
    fn wrong_shape_is_parse_error() {
        let result = parse_orchestrator_config(
            "environments: [1, 2]",
            ConfigFormat::Yaml,
            Path::new("orcdk.config.yml"),
        );
        assert!(matches!(result, Err(GateError::ConfigParseError { .. })));
    }

    #[test]
    fn load_project_config_reports_json_path_when_missing() {
        let temp = TempDir::new().unwrap();
        match load_project_config(temp.path()) {
            Err(GateError::ConfigNotFound { path }) => {
                assert!(path.ends_with("orcdk.config.json"));
            }
            other => panic!("expected ConfigNotFound, got {:?}", other),
        }
    }
}
