//! Orchestrator lifecycle integration.
//!
//! - [`events`] - Event kinds and handler registration
//! - [`plugin`] - The [`Plugin`] trait and [`DotenvPlugin`]

pub mod events;
pub mod plugin;

pub use events::{Event, EventBus, EventKind, Handler, SubscriptionId};
pub use plugin::{DotenvPlugin, LifecycleState, Plugin, PLUGIN_NAME, PLUGIN_VERSION};
