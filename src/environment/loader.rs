//! Variable loading for local and cloud environments.
//!
//! Local environments merge an env file named after the environment into
//! the ambient environment without overwriting anything already set.
//! Cloud environments load nothing: their variables come from the
//! deployment system.

use crate::config::env_file::{resolve_entries, EnvFileParser};
use crate::environment::ambient::AmbientEnv;
use crate::error::LoadWarning;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix of local env files: `.env.<environment>`.
pub const ENV_FILE_PREFIX: &str = ".env.";

/// Build the env file name for an environment.
pub fn env_file_name(environment: &str) -> String {
    format!("{}{}", ENV_FILE_PREFIX, environment)
}

/// What a local load did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// File that was read.
    pub path: PathBuf,
    /// Keys written into the ambient environment, in file order.
    pub applied: Vec<String>,
    /// Keys left alone because they were already set.
    pub skipped: Vec<String>,
}

/// Populates the ambient environment for the current environment.
pub trait VariableLoader {
    /// Merge variables for a local environment into `env`.
    ///
    /// Existing keys are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadWarning`] if the source is missing or unusable. The
    /// caller treats this as non-fatal.
    fn load_local(
        &self,
        environment: &str,
        env: &mut dyn AmbientEnv,
    ) -> Result<LoadReport, LoadWarning>;

    /// Note that a cloud environment uses system variables. Reads nothing.
    fn load_cloud(&self, environment: &str);
}

/// Loads `<root>/.env.<environment>` files.
///
/// # Example
///
/// ```
/// use dotenv_gate::environment::{AmbientEnv, DotenvLoader, MemoryEnv, VariableLoader};
/// use tempfile::TempDir;
/// use std::fs;
///
/// let temp = TempDir::new().unwrap();
/// fs::write(temp.path().join(".env.dev"), "CDK_DOMAIN=dev.example.com\nCDK_ACCOUNT=1").unwrap();
///
/// let loader = DotenvLoader::new(temp.path());
/// let mut env = MemoryEnv::from_pairs([("CDK_ACCOUNT", "already-set")]);
/// let report = loader.load_local("dev", &mut env).unwrap();
///
/// assert_eq!(report.applied, vec!["CDK_DOMAIN"]);
/// assert_eq!(report.skipped, vec!["CDK_ACCOUNT"]);
/// assert_eq!(env.get("CDK_ACCOUNT").as_deref(), Some("already-set"));
/// ```
#[derive(Debug, Clone)]
pub struct DotenvLoader {
    root: PathBuf,
}

impl DotenvLoader {
    /// Create a loader that reads env files from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a loader rooted at the current working directory.
    pub fn from_current_dir() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }

    /// Directory env files are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the env file for an environment.
    ///
    /// Always `<root>/.env.<environment>`, the same name missing-variable
    /// errors point the operator to.
    pub fn path_for(&self, environment: &str) -> PathBuf {
        self.root.join(env_file_name(environment))
    }
}

impl Default for DotenvLoader {
    fn default() -> Self {
        Self::from_current_dir()
    }
}

impl VariableLoader for DotenvLoader {
    fn load_local(
        &self,
        environment: &str,
        env: &mut dyn AmbientEnv,
    ) -> Result<LoadReport, LoadWarning> {
        let path = self.path_for(environment);
        debug!("Reading env file {}", path.display());

        let entries = EnvFileParser::load(&path)?;
        let resolved = resolve_entries(&entries, |name| env.get(name));

        let mut report = LoadReport {
            path,
            ..Default::default()
        };
        for (key, value) in resolved {
            if env.set_if_absent(&key, &value) {
                report.applied.push(key);
            } else {
                report.skipped.push(key);
            }
        }

        info!(
            "Loaded environment variables from {}",
            report.path.display()
        );
        debug!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            "Merged env file"
        );

        Ok(report)
    }

    fn load_cloud(&self, environment: &str) {
        info!(
            "Cloud environment '{}' detected - using system environment variables",
            environment
        );
    }
}
