//! Named guards and callbacks referenced from configuration.

use crate::callback::{Callback, TransitionContext};
use crate::core::Guard;
use crate::error::{BoxError, FiniteError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Lookup table resolving the guard and `do` names used in a
/// [`MachineConfig`](super::MachineConfig).
pub struct Registry<T> {
    guards: HashMap<String, Guard<T>>,
    callbacks: HashMap<String, Callback<T>>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            guards: HashMap::new(),
            callbacks: HashMap::new(),
        }
    }

    /// Register a guard; a later registration under the same name wins.
    pub fn guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.guards.insert(name.into(), Guard::new(predicate));
        self
    }

    /// Register a callback; a later registration under the same name wins.
    pub fn callback<F>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&mut T, &TransitionContext) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.callbacks.insert(name.into(), Arc::new(callback));
        self
    }

    pub fn resolve_guard(&self, name: &str) -> Result<Guard<T>, FiniteError> {
        self.guards
            .get(name)
            .cloned()
            .ok_or_else(|| FiniteError::configuration(format!("guard '{name}' is not registered")))
    }

    pub fn resolve_callback(&self, name: &str) -> Result<Callback<T>, FiniteError> {
        self.callbacks.get(name).map(Arc::clone).ok_or_else(|| {
            FiniteError::configuration(format!("callback '{name}' is not registered"))
        })
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut guards: Vec<&str> = self.guards.keys().map(String::as_str).collect();
        let mut callbacks: Vec<&str> = self.callbacks.keys().map(String::as_str).collect();
        guards.sort_unstable();
        callbacks.sort_unstable();
        f.debug_struct("Registry")
            .field("guards", &guards)
            .field("callbacks", &callbacks)
            .finish()
    }
}
