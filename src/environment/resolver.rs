//! Environment resolution.
//!
//! Resolves the current environment and prepares its variables:
//! 1. Read the environment name from `CDK_ENVIRONMENT`
//! 2. Look it up in the registry
//! 3. Load the local env file, or trust system variables for cloud
//! 4. Validate required variables (always, whatever step 3 did)

use std::rc::Rc;

use tracing::{debug, warn};

use super::ambient::AmbientEnv;
use super::loader::{LoadReport, VariableLoader};
use super::registry::{EnvironmentDescriptor, EnvironmentKind, EnvironmentRegistry};
use super::validator::{ensure_required, RequiredVariables};
use crate::error::{GateError, Result};

/// Variable naming the current environment.
pub const CURRENT_ENVIRONMENT_VAR: &str = "CDK_ENVIRONMENT";

/// A successfully resolved environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEnvironment {
    /// The environment name (e.g., "local", "dev", "prod").
    pub name: String,
    /// Whether variables came from a local file or the system.
    pub kind: EnvironmentKind,
    /// What the local load merged. None for cloud, or when the load failed.
    pub load: Option<LoadReport>,
}

/// Resolves and validates the current environment.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use dotenv_gate::environment::{
///     DotenvLoader, EnvironmentKind, EnvironmentRegistry, EnvironmentResolver, MemoryEnv,
///     RequiredVariables,
/// };
///
/// let registry = EnvironmentRegistry::new().with_environment("prod", false);
/// let required = RequiredVariables::new(["CDK_ENVIRONMENT", "API_URL"]).unwrap();
/// let resolver = EnvironmentResolver::new(
///     registry,
///     required,
///     Rc::new(DotenvLoader::new("/nonexistent")),
/// );
///
/// let mut env = MemoryEnv::from_pairs([
///     ("CDK_ENVIRONMENT", "prod"),
///     ("API_URL", "https://api.example.com"),
/// ]);
/// let resolved = resolver.resolve(&mut env).unwrap();
/// assert_eq!(resolved.kind, EnvironmentKind::Cloud);
/// ```
pub struct EnvironmentResolver {
    registry: EnvironmentRegistry,
    required: RequiredVariables,
    loader: Rc<dyn VariableLoader>,
}

impl EnvironmentResolver {
    /// Create a resolver.
    pub fn new(
        registry: EnvironmentRegistry,
        required: RequiredVariables,
        loader: Rc<dyn VariableLoader>,
    ) -> Self {
        Self {
            registry,
            required,
            loader,
        }
    }

    /// The registry environments are looked up in.
    pub fn registry(&self) -> &EnvironmentRegistry {
        &self.registry
    }

    /// Variables checked after loading.
    pub fn required(&self) -> &RequiredVariables {
        &self.required
    }

    /// Read the current environment name.
    ///
    /// # Errors
    ///
    /// Returns `EnvironmentNotSet` if `CDK_ENVIRONMENT` is absent or empty.
    pub fn current_environment(env: &dyn AmbientEnv) -> Result<String> {
        env.get(CURRENT_ENVIRONMENT_VAR)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| GateError::EnvironmentNotSet {
                variable: CURRENT_ENVIRONMENT_VAR.to_string(),
            })
    }

    /// Look up a named environment.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEnvironment`, listing the registered names.
    pub fn lookup(&self, name: &str) -> Result<&EnvironmentDescriptor> {
        self.registry.lookup(name)
    }

    /// Resolve the current environment, load its variables and validate them.
    ///
    /// A failed local load is logged and does not stop validation;
    /// validation alone decides success.
    ///
    /// # Errors
    ///
    /// Returns `EnvironmentNotSet` or `UnknownEnvironment` for configuration
    /// problems and `MissingVariables` if validation fails.
    pub fn resolve(&self, env: &mut dyn AmbientEnv) -> Result<ResolvedEnvironment> {
        let name = Self::current_environment(env)?;
        let descriptor = self.lookup(&name)?;
        let kind = descriptor.kind();
        debug!("Resolving {} environment '{}'", kind, name);

        let load = match kind {
            EnvironmentKind::Local => match self.loader.load_local(&name, env) {
                Ok(report) => Some(report),
                Err(warning) => {
                    warn!("Failed to load .env file for local environment: {}", warning);
                    None
                }
            },
            EnvironmentKind::Cloud => {
                self.loader.load_cloud(&name);
                None
            }
        };

        ensure_required(&self.required, env, &name, kind.is_local())?;

        Ok(ResolvedEnvironment { name, kind, load })
    }
}
