//! The dotenv plugin.
//!
//! Wires the environment resolver into the orchestrator lifecycle:
//! `initialize` reads configuration and subscribes to the setup trigger,
//! each trigger firing is one resolution attempt, and `cleanup` releases
//! the subscriptions.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, error};

use super::events::{Event, EventBus, EventKind, SubscriptionId};
use crate::config::{DotenvSettings, OrchestratorConfig, PluginConfig};
use crate::environment::{
    AmbientEnv, DotenvLoader, EnvironmentRegistry, EnvironmentResolver, RequiredVariables,
    ResolvedEnvironment, VariableLoader,
};
use crate::error::{GateError, Result};

/// Package name the orchestrator knows this plugin by.
pub const PLUGIN_NAME: &str = "@orcdkestrator/orcdk-plugin-dotenvx";

/// Plugin version reported to the orchestrator.
pub const PLUGIN_VERSION: &str = "1.0.0";

/// An orchestrator plugin.
pub trait Plugin {
    /// Package name.
    fn name(&self) -> &str;

    /// Plugin version.
    fn version(&self) -> &str;

    /// Read configuration and register event handlers on `bus`.
    fn initialize(
        &mut self,
        config: &PluginConfig,
        orchestrator: &OrchestratorConfig,
        bus: &mut EventBus,
    ) -> Result<()>;

    /// Release everything registered by `initialize`. Safe to call repeatedly.
    fn cleanup(&mut self, bus: &mut EventBus) -> Result<()>;
}

/// Where the plugin is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// `initialize` has not run.
    Uninitialized,
    /// Subscribed and waiting for the setup trigger.
    Initialized,
    /// The last trigger resolved and validated the environment.
    EnvironmentResolved,
    /// The last trigger failed. Nothing is retried.
    Failed,
    /// `cleanup` has run.
    Cleaned,
}

/// Loads and validates environment variables before the setup stage.
///
/// # Example
///
/// ```
/// use dotenv_gate::config::{OrchestratorConfig, PluginConfig};
/// use dotenv_gate::environment::MemoryEnv;
/// use dotenv_gate::lifecycle::{DotenvPlugin, Event, EventBus, LifecycleState, Plugin, PLUGIN_NAME};
///
/// let orchestrator: OrchestratorConfig =
///     serde_json::from_str(r#"{ "environments": { "prod": { "isLocal": false } } }"#).unwrap();
/// let config = PluginConfig::new(PLUGIN_NAME)
///     .with_setting("requiredVariables", serde_json::json!(["API_URL"]));
///
/// let mut bus = EventBus::new();
/// let mut plugin = DotenvPlugin::new();
/// plugin.initialize(&config, &orchestrator, &mut bus).unwrap();
///
/// let mut env = MemoryEnv::from_pairs([
///     ("CDK_ENVIRONMENT", "prod"),
///     ("API_URL", "https://api.example.com"),
/// ]);
/// bus.emit(&Event::BeforeSetup, &mut env).unwrap();
/// assert_eq!(plugin.state(), LifecycleState::EnvironmentResolved);
///
/// plugin.cleanup(&mut bus).unwrap();
/// plugin.cleanup(&mut bus).unwrap();
/// ```
pub struct DotenvPlugin {
    loader: Rc<dyn VariableLoader>,
    resolver: Option<Rc<EnvironmentResolver>>,
    state: Rc<Cell<LifecycleState>>,
    subscriptions: Vec<SubscriptionId>,
}

impl DotenvPlugin {
    /// Create a plugin that reads env files from the current directory.
    pub fn new() -> Self {
        Self::with_loader(Rc::new(DotenvLoader::from_current_dir()))
    }

    /// Create a plugin with a custom loader.
    pub fn with_loader(loader: Rc<dyn VariableLoader>) -> Self {
        Self {
            loader,
            resolver: None,
            state: Rc::new(Cell::new(LifecycleState::Uninitialized)),
            subscriptions: Vec::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    /// The configured resolver, once initialized.
    pub fn resolver(&self) -> Option<&EnvironmentResolver> {
        self.resolver.as_deref()
    }

    /// Resolve the environment now, outside of the event trigger.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` before `initialize` or after `cleanup`,
    /// otherwise whatever resolution returns.
    pub fn setup_environment(&self, env: &mut dyn AmbientEnv) -> Result<ResolvedEnvironment> {
        let resolver = self.resolver.as_ref().ok_or(GateError::NotInitialized)?;
        run_setup(resolver, &self.state, env)
    }

    /// Unsubscribe every handler this plugin registered.
    fn release(&mut self, bus: &mut EventBus) {
        for id in self.subscriptions.drain(..) {
            if !bus.unsubscribe(id) {
                debug!("Subscription {:?} was already removed", id);
            }
        }
    }
}

impl Default for DotenvPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for DotenvPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn version(&self) -> &str {
        PLUGIN_VERSION
    }

    fn initialize(
        &mut self,
        config: &PluginConfig,
        orchestrator: &OrchestratorConfig,
        bus: &mut EventBus,
    ) -> Result<()> {
        let settings = plugin_settings(config)?;
        let required = RequiredVariables::from_config(settings.required_variables)?;
        let registry = EnvironmentRegistry::from_config(orchestrator);
        debug!(
            "Initializing with {} required variables and environments: {}",
            required.len(),
            registry.names().join(", ")
        );

        self.release(bus);
        let resolver = Rc::new(EnvironmentResolver::new(
            registry,
            required,
            Rc::clone(&self.loader),
        ));

        let setup_resolver = Rc::clone(&resolver);
        let setup_state = Rc::clone(&self.state);
        let setup = bus.subscribe(EventKind::BeforeSetup, move |_event, env| {
            run_setup(&setup_resolver, &setup_state, env).map(|_| ())
        });
        let errors = bus.subscribe(EventKind::PluginError, |event, _env| {
            log_plugin_error(event);
            Ok(())
        });

        self.subscriptions = vec![setup, errors];
        self.resolver = Some(resolver);
        self.state.set(LifecycleState::Initialized);
        Ok(())
    }

    fn cleanup(&mut self, bus: &mut EventBus) -> Result<()> {
        self.release(bus);
        self.resolver = None;
        self.state.set(LifecycleState::Cleaned);
        Ok(())
    }
}

/// One resolution attempt, recording the outcome in `state`.
fn run_setup(
    resolver: &EnvironmentResolver,
    state: &Cell<LifecycleState>,
    env: &mut dyn AmbientEnv,
) -> Result<ResolvedEnvironment> {
    match resolver.resolve(env) {
        Ok(resolved) => {
            state.set(LifecycleState::EnvironmentResolved);
            Ok(resolved)
        }
        Err(e) => {
            state.set(LifecycleState::Failed);
            Err(e)
        }
    }
}

/// Read the plugin's own settings out of its config entry.
fn plugin_settings(config: &PluginConfig) -> Result<DotenvSettings> {
    serde_json::from_value(serde_json::Value::Object(config.config.clone())).map_err(|e| {
        GateError::InvalidConfig {
            message: format!("invalid settings for plugin '{}': {}", config.name, e),
        }
    })
}

fn log_plugin_error(event: &Event) {
    if let Event::PluginError { context, message } = event {
        error!("Error in {}: {}", context, message);
    }
}
