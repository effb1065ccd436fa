//! Environment resolution, loading and validation.
//!
//! Determines which deployment environment is active and makes sure its
//! variables are in place:
//!
//! 1. `CDK_ENVIRONMENT` names the current environment
//! 2. The registry says whether it is local or cloud
//! 3. Local environments merge `.env.<name>` without overwriting anything
//! 4. Required variables are validated in every case

pub mod ambient;
pub mod loader;
pub mod registry;
pub mod resolver;
pub mod validator;

pub use ambient::{AmbientEnv, MemoryEnv, ProcessEnv};
pub use loader::{env_file_name, DotenvLoader, LoadReport, VariableLoader, ENV_FILE_PREFIX};
pub use registry::{EnvironmentDescriptor, EnvironmentKind, EnvironmentRegistry};
pub use resolver::{EnvironmentResolver, ResolvedEnvironment, CURRENT_ENVIRONMENT_VAR};
pub use validator::{
    ensure_required, validate, MissingVariables, RemediationHint, RequiredVariables,
    ValidationResult, DEFAULT_REQUIRED_VARIABLES,
};
