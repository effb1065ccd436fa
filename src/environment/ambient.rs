//! The ambient environment.
//!
//! Resolution reads and fills a key/value environment passed in by the
//! caller rather than touching the process environment directly.
//! [`ProcessEnv`] is the real process environment; [`MemoryEnv`] is an
//! isolated map for tests and embedding.

use std::collections::BTreeMap;

/// Key/value environment the resolver works against.
///
/// The only write is [`set_if_absent`](AmbientEnv::set_if_absent): once a
/// key exists it is never overwritten.
pub trait AmbientEnv {
    /// Get the value of a variable, if set (possibly empty).
    fn get(&self, key: &str) -> Option<String>;

    /// Set `key` unless it already exists. Returns true if the value was written.
    fn set_if_absent(&mut self, key: &str, value: &str) -> bool;

    /// Check if a variable is set, even to an empty value.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Check if a variable is set to a non-empty value.
    fn is_present(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.is_empty())
    }
}

/// The environment of the current process.
///
/// # Example
///
/// ```
/// use dotenv_gate::environment::{AmbientEnv, ProcessEnv};
///
/// let env = ProcessEnv;
/// // PATH is set in practically every process
/// let _ = env.contains("PATH");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

/// Presence checks use the raw OS value, so a non-UTF-8 value counts as set
/// even though [`get`](AmbientEnv::get) cannot return it.
impl AmbientEnv for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var_os(key).and_then(|value| value.into_string().ok())
    }

    fn set_if_absent(&mut self, key: &str, value: &str) -> bool {
        if self.contains(key) {
            return false;
        }
        std::env::set_var(key, value);
        true
    }

    fn contains(&self, key: &str) -> bool {
        std::env::var_os(key).is_some()
    }

    fn is_present(&self, key: &str) -> bool {
        std::env::var_os(key).is_some_and(|value| !value.is_empty())
    }
}

/// An in-memory environment.
///
/// # Example
///
/// ```
/// use dotenv_gate::environment::{AmbientEnv, MemoryEnv};
///
/// let mut env = MemoryEnv::from_pairs([("CDK_ENVIRONMENT", "dev")]);
/// assert!(!env.set_if_absent("CDK_ENVIRONMENT", "prod"));
/// assert!(env.set_if_absent("CDK_DOMAIN", "example.com"));
/// assert_eq!(env.get("CDK_ENVIRONMENT").as_deref(), Some("dev"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryEnv {
    vars: BTreeMap<String, String>,
}

impl MemoryEnv {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Snapshot the current process environment. Non-UTF-8 entries are left out.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// All variables, ordered by name.
    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    /// Get the number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check if the environment is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl AmbientEnv for MemoryEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set_if_absent(&mut self, key: &str, value: &str) -> bool {
        if self.vars.contains_key(key) {
            return false;
        }
        self.vars.insert(key.to_string(), value.to_string());
        true
    }
}
