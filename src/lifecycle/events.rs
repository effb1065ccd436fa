//! Orchestrator events and handler registration.
//!
//! Handlers are registered per [`EventKind`] and identified by the
//! [`SubscriptionId`] returned from [`EventBus::subscribe`]. Releasing a
//! subscription only ever removes that one handler.

use crate::environment::AmbientEnv;
use crate::error::Result;

/// Kinds of events a plugin can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Fired once before the orchestrator's pattern detection stage.
    BeforeSetup,
    /// Fired when any plugin reports an error.
    PluginError,
}

impl EventKind {
    /// The orchestrator's name for this event.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeforeSetup => "orchestrator:before:pattern-detection",
            Self::PluginError => "plugin:error",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An event with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    BeforeSetup,
    PluginError {
        /// Where the error happened.
        context: String,
        /// The error message.
        message: String,
    },
}

impl Event {
    /// Build a plugin error event.
    pub fn plugin_error(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PluginError {
            context: context.into(),
            message: message.into(),
        }
    }

    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::BeforeSetup => EventKind::BeforeSetup,
            Self::PluginError { .. } => EventKind::PluginError,
        }
    }
}

/// Handle for one registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A registered event handler.
pub type Handler = Box<dyn FnMut(&Event, &mut dyn AmbientEnv) -> Result<()>>;

struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler,
}

/// Dispatches events to subscribed handlers.
///
/// Single-threaded: handlers may hold `Rc` state.
///
/// # Example
///
/// ```
/// use dotenv_gate::environment::MemoryEnv;
/// use dotenv_gate::lifecycle::{Event, EventBus, EventKind};
///
/// let mut bus = EventBus::new();
/// let id = bus.subscribe(EventKind::BeforeSetup, |_event, _env| Ok(()));
///
/// let mut env = MemoryEnv::new();
/// bus.emit(&Event::BeforeSetup, &mut env).unwrap();
///
/// assert!(bus.unsubscribe(id));
/// assert!(!bus.unsubscribe(id));
/// ```
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl EventBus {
    /// Create a bus with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `kind`.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&Event, &mut dyn AmbientEnv) -> Result<()> + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a handler. Returns false if it was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Run every handler for the event's kind, in subscription order.
    ///
    /// # Errors
    ///
    /// Returns the first handler error; later handlers do not run.
    pub fn emit(&mut self, event: &Event, env: &mut dyn AmbientEnv) -> Result<()> {
        let kind = event.kind();
        for subscription in self.subscriptions.iter_mut().filter(|s| s.kind == kind) {
            (subscription.handler)(event, &mut *env)?;
        }
        Ok(())
    }

    /// Number of handlers registered for `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.subscriptions.iter().filter(|s| s.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::MemoryEnv;
    use crate::error::GateError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn event_names_match_orchestrator() {
        assert_eq!(
            EventKind::BeforeSetup.to_string(),
            "orchestrator:before:pattern-detection"
        );
        assert_eq!(EventKind::PluginError.to_string(), "plugin:error");
    }

    #[test]
    fn event_kind_from_payload() {
        assert_eq!(Event::BeforeSetup.kind(), EventKind::BeforeSetup);
        assert_eq!(
            Event::plugin_error("deploy", "boom").kind(),
            EventKind::PluginError
        );
    }

    #[test]
    fn emit_runs_only_matching_handlers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        for label in ["first", "second"] {
            let seen = Rc::clone(&seen);
            bus.subscribe(EventKind::BeforeSetup, move |_, _| {
                seen.borrow_mut().push(label);
                Ok(())
            });
        }
        let other = Rc::clone(&seen);
        bus.subscribe(EventKind::PluginError, move |_, _| {
            other.borrow_mut().push("error");
            Ok(())
        });

        bus.emit(&Event::BeforeSetup, &mut MemoryEnv::new()).unwrap();

        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn handlers_can_fill_the_environment() {
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::BeforeSetup, |_, env| {
            env.set_if_absent("FILLED", "yes");
            Ok(())
        });

        let mut env = MemoryEnv::new();
        bus.emit(&Event::BeforeSetup, &mut env).unwrap();

        assert_eq!(env.get("FILLED"), Some("yes".to_string()));
    }

    #[test]
    fn emit_stops_at_first_error() {
        let ran = Rc::new(RefCell::new(false));
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::BeforeSetup, |_, _| Err(GateError::NotInitialized));
        let flag = Rc::clone(&ran);
        bus.subscribe(EventKind::BeforeSetup, move |_, _| {
            *flag.borrow_mut() = true;
            Ok(())
        });

        let result = bus.emit(&Event::BeforeSetup, &mut MemoryEnv::new());

        assert!(matches!(result, Err(GateError::NotInitialized)));
        assert!(!*ran.borrow());
    }

    #[test]
    fn unsubscribe_removes_only_that_handler() {
        let mut bus = EventBus::new();
        let a = bus.subscribe(EventKind::BeforeSetup, |_, _| Ok(()));
        let _b = bus.subscribe(EventKind::BeforeSetup, |_, _| Ok(()));

        assert!(bus.unsubscribe(a));
        assert_eq!(bus.handler_count(EventKind::BeforeSetup), 1);
        assert!(!bus.unsubscribe(a));
    }

    #[test]
    fn emit_without_handlers_is_ok() {
        let mut bus = EventBus::new();
        assert!(bus
            .emit(&Event::plugin_error("x", "y"), &mut MemoryEnv::new())
            .is_ok());
    }
}
