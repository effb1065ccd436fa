//! dotenv-gate - Environment resolution and validation for deployments.
//!
//! Decides whether the current deployment environment takes its variables
//! from a local `.env.<name>` file or from the surrounding system, loads
//! them without overwriting anything already set, and refuses to continue
//! until every required variable is present.
//!
//! # Modules
//!
//! - [`config`] - Orchestrator configuration and env file parsing
//! - [`environment`] - Environment registry, loading, resolution and validation
//! - [`error`] - Error types and result aliases
//! - [`lifecycle`] - Orchestrator plugin and event handling
//! - [`logging`] - Tracing subscriber setup
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use dotenv_gate::environment::{
//!     DotenvLoader, EnvironmentRegistry, EnvironmentResolver, MemoryEnv, RequiredVariables,
//! };
//!
//! let registry = EnvironmentRegistry::new()
//!     .with_environment("local", true)
//!     .with_environment("prod", false);
//! let resolver = EnvironmentResolver::new(
//!     registry,
//!     RequiredVariables::new(["CDK_ENVIRONMENT", "CDK_DOMAIN"]).unwrap(),
//!     Rc::new(DotenvLoader::new("/nonexistent")),
//! );
//!
//! // Nothing provides CDK_DOMAIN, so resolution stops with an actionable error
//! let mut env = MemoryEnv::from_pairs([("CDK_ENVIRONMENT", "local")]);
//! let err = resolver.resolve(&mut env).unwrap_err();
//! assert!(err.to_string().contains("  - CDK_DOMAIN"));
//! assert!(err.to_string().contains(".env.local"));
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod lifecycle;
pub mod logging;

pub use error::{GateError, LoadWarning, Result};
