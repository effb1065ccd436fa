//! Required variable validation.
//!
//! Checks that every required variable has a non-empty value in the
//! ambient environment and builds an actionable error when some don't.

use crate::environment::ambient::AmbientEnv;
use crate::environment::loader::env_file_name;
use crate::error::{GateError, Result};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::info;

/// Variables required when configuration doesn't name any.
pub const DEFAULT_REQUIRED_VARIABLES: &[&str] = &["CDK_ACCOUNT", "CDK_ENVIRONMENT", "CDK_DOMAIN"];

/// Ordered set of variable names that must be present.
///
/// Duplicates collapse to their first occurrence.
///
/// # Example
///
/// ```
/// use dotenv_gate::environment::RequiredVariables;
///
/// let required = RequiredVariables::new(["API_URL", "API_KEY", "API_URL"]).unwrap();
/// assert_eq!(required.names(), ["API_URL", "API_KEY"]);
///
/// let defaults = RequiredVariables::default();
/// assert_eq!(defaults.names(), ["CDK_ACCOUNT", "CDK_ENVIRONMENT", "CDK_DOMAIN"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredVariables {
    names: Vec<String>,
}

impl RequiredVariables {
    /// Build a required set from names.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if any name is blank.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();

        for name in names {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(GateError::InvalidConfig {
                    message: "requiredVariables must not contain empty names".to_string(),
                });
            }
            if seen.insert(name.clone()) {
                unique.push(name);
            }
        }

        Ok(Self { names: unique })
    }

    /// Use `configured` if given, otherwise [`DEFAULT_REQUIRED_VARIABLES`].
    pub fn from_config(configured: Option<Vec<String>>) -> Result<Self> {
        match configured {
            Some(names) => Self::new(names),
            None => Ok(Self::default()),
        }
    }

    /// Names in check order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Get the number of required variables.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if nothing is required.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for RequiredVariables {
    fn default() -> Self {
        Self {
            names: DEFAULT_REQUIRED_VARIABLES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Every required variable is present.
    Valid,
    /// Some variables are missing, in required order.
    Invalid { missing: Vec<String> },
}

impl ValidationResult {
    /// True for [`ValidationResult::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Missing variable names (empty when valid).
    pub fn missing(&self) -> &[String] {
        match self {
            Self::Valid => &[],
            Self::Invalid { missing } => missing,
        }
    }

    /// Turn an invalid result into a terminal error.
    ///
    /// `environment` names the env file in the local hint; `is_local`
    /// alone selects which hint is shown.
    ///
    /// # Errors
    ///
    /// Returns `MissingVariables` when the result is invalid.
    pub fn into_result(self, environment: &str, is_local: bool) -> Result<()> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid { missing } => {
                Err(MissingVariables::new(environment, is_local, missing).into())
            }
        }
    }
}

/// Check `required` against `env`. Reads only.
///
/// # Example
///
/// ```
/// use dotenv_gate::environment::{validate, MemoryEnv, RequiredVariables, ValidationResult};
///
/// let required = RequiredVariables::new(["A", "B", "C"]).unwrap();
/// let env = MemoryEnv::from_pairs([("B", "1"), ("C", "")]);
///
/// assert_eq!(
///     validate(&required, &env),
///     ValidationResult::Invalid { missing: vec!["A".into(), "C".into()] }
/// );
/// ```
pub fn validate(required: &RequiredVariables, env: &dyn AmbientEnv) -> ValidationResult {
    let missing: Vec<String> = required
        .names()
        .iter()
        .filter(|name| !env.is_present(name))
        .cloned()
        .collect();

    if missing.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid { missing }
    }
}

/// Validate and convert to a `Result`, logging on success.
///
/// # Errors
///
/// Returns `MissingVariables` listing every absent variable.
pub fn ensure_required(
    required: &RequiredVariables,
    env: &dyn AmbientEnv,
    environment: &str,
    is_local: bool,
) -> Result<()> {
    validate(required, env).into_result(environment, is_local)?;
    info!("All required variables validated");
    Ok(())
}

/// How to fix missing variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemediationHint {
    /// Add them to the environment's local env file.
    EnvFile { file_name: String },
    /// Set them as system environment variables.
    SystemVariables,
}

impl RemediationHint {
    /// Pick the hint for a local or cloud environment.
    pub fn for_environment(environment: &str, is_local: bool) -> Self {
        if is_local {
            Self::EnvFile {
                file_name: env_file_name(environment),
            }
        } else {
            Self::SystemVariables
        }
    }
}

impl fmt::Display for RemediationHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvFile { file_name } => {
                write!(f, "Please ensure your {} file contains:", file_name)
            }
            Self::SystemVariables => {
                write!(f, "Please ensure the following environment variables are set:")
            }
        }
    }
}

/// Required variables were absent after loading.
///
/// Displays as a multi-line report:
///
/// ```text
/// Missing required environment variables:
///   - CDK_DOMAIN
///
/// Please ensure your .env.dev file contains:
///   CDK_DOMAIN=<value>
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_missing(.missing, .hint))]
pub struct MissingVariables {
    /// Absent names, in required order.
    pub missing: Vec<String>,
    /// How to fix them.
    pub hint: RemediationHint,
}

impl MissingVariables {
    /// Build the error for an environment.
    pub fn new(environment: &str, is_local: bool, missing: Vec<String>) -> Self {
        Self {
            missing,
            hint: RemediationHint::for_environment(environment, is_local),
        }
    }
}

/// The multi-line report shown to the operator.
fn render_missing(missing: &[String], hint: &RemediationHint) -> String {
    let listed: String = missing.iter().map(|name| format!("  - {}\n", name)).collect();
    let templates: String = missing
        .iter()
        .map(|name| format!("\n  {}=<value>", name))
        .collect();
    format!(
        "Missing required environment variables:\n{}\n{}{}",
        listed, hint, templates
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::ambient::MemoryEnv;

    fn required(names: &[&str]) -> RequiredVariables {
        RequiredVariables::new(names.iter().copied()).unwrap()
    }

    #[test]
    fn default_has_three_canonical_names() {
        let defaults = RequiredVariables::default();
        assert_eq!(
            defaults.names(),
            ["CDK_ACCOUNT", "CDK_ENVIRONMENT", "CDK_DOMAIN"]
        );
    }

    #[test]
    fn from_config_prefers_configured_list() {
        let configured = RequiredVariables::from_config(Some(vec!["X".to_string()])).unwrap();
        assert_eq!(configured.names(), ["X"]);

        let fallback = RequiredVariables::from_config(None).unwrap();
        assert_eq!(fallback, RequiredVariables::default());
    }

    #[test]
    fn configured_empty_list_requires_nothing() {
        let configured = RequiredVariables::from_config(Some(vec![])).unwrap();
        assert!(configured.is_empty());
    }

    #[test]
    fn duplicates_keep_first_position() {
        let set = required(&["B", "A", "B", "C", "A"]);
        assert_eq!(set.names(), ["B", "A", "C"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn blank_names_are_rejected() {
        let result = RequiredVariables::new(["A", "  "]);
        assert!(matches!(result, Err(GateError::InvalidConfig { .. })));
    }

    #[test]
    fn valid_when_all_present() {
        let env = MemoryEnv::from_pairs([("A", "1"), ("B", "2")]);
        let result = validate(&required(&["A", "B"]), &env);
        assert!(result.is_valid());
        assert!(result.missing().is_empty());
    }

    #[test]
    fn missing_preserves_required_order() {
        let env = MemoryEnv::from_pairs([("B", "2")]);
        let result = validate(&required(&["C", "B", "A"]), &env);
        assert_eq!(result.missing(), ["C", "A"]);
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let env = MemoryEnv::from_pairs([("A", "")]);
        let result = validate(&required(&["A"]), &env);
        assert_eq!(
            result,
            ValidationResult::Invalid {
                missing: vec!["A".to_string()]
            }
        );
    }

    #[test]
    fn validation_does_not_mutate_env() {
        let env = MemoryEnv::from_pairs([("A", "1")]);
        let before = env.clone();
        let _ = validate(&required(&["A", "B"]), &env);
        assert_eq!(env, before);
    }

    #[test]
    fn nothing_required_is_valid() {
        let env = MemoryEnv::new();
        let set = RequiredVariables::new(Vec::<String>::new()).unwrap();
        assert!(validate(&set, &env).is_valid());
    }

    #[test]
    fn local_message_points_to_env_file() {
        let err = MissingVariables::new("dev", true, vec!["B".into(), "C".into()]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables:\n  - B\n  - C\n\n\
             Please ensure your .env.dev file contains:\n  B=<value>\n  C=<value>"
        );
    }

    #[test]
    fn missing_variables_is_a_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(MissingVariables::new("dev", true, vec!["B".into()]));
        assert!(err.source().is_none());
        assert!(err.to_string().starts_with("Missing required environment variables:"));
    }

    #[test]
    fn cloud_message_asks_for_system_variables() {
        let err = MissingVariables::new("prod", false, vec!["B".into()]);
        let msg = err.to_string();
        assert!(msg.contains("Please ensure the following environment variables are set:"));
        assert!(!msg.contains(".env.prod"));
        assert!(msg.contains("\n  - B\n"));
        assert!(msg.ends_with("\n  B=<value>"));
    }

    #[test]
    fn hint_follows_flag_only() {
        assert_eq!(
            RemediationHint::for_environment("prod", true),
            RemediationHint::EnvFile {
                file_name: ".env.prod".to_string()
            }
        );
        assert_eq!(
            RemediationHint::for_environment("local", false),
            RemediationHint::SystemVariables
        );
    }

    #[test]
    fn into_result_converts_invalid() {
        let result = ValidationResult::Invalid {
            missing: vec!["A".into()],
        }
        .into_result("dev", true);

        match result {
            Err(GateError::MissingVariables(err)) => {
                assert_eq!(err.missing, vec!["A"]);
                assert!(matches!(err.hint, RemediationHint::EnvFile { .. }));
            }
            other => panic!("expected MissingVariables, got {:?}", other),
        }
        assert!(ValidationResult::Valid.into_result("dev", true).is_ok());
    }

    #[test]
    fn ensure_required_reports_every_missing_variable_once() {
        let env = MemoryEnv::from_pairs([("A", "1")]);
        let err = ensure_required(&required(&["A", "B", "C"]), &env, "dev", true).unwrap_err();
        let msg = err.to_string();

        assert_eq!(msg.matches("  - B").count(), 1);
        assert_eq!(msg.matches("  - C").count(), 1);
        assert!(!msg.contains("  - A"));
    }
}
