//! Populating state machines from declarative configuration.
//!
//! [`ArrayLoader`] reads a [`MachineConfig`] (built in code or parsed from
//! any `serde_json::Value`) and registers states, then transitions, then
//! callbacks on a [`StateMachine`]. Guard and callback names are resolved
//! through a [`Registry`].
//!
//! Transitions may name states that are not registered yet; those
//! references are checked when the transition is applied.
//!
//! # Example
//!
//! ```rust
//! use finite::core::Stateful;
//! use finite::loader::{ArrayLoader, Loader, Registry};
//! use finite::StateMachine;
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct Article {
//!     state: Option<String>,
//!     reviewed: bool,
//! }
//!
//! impl Stateful for Article {
//!     fn finite_state(&self) -> Option<&str> {
//!         self.state.as_deref()
//!     }
//!
//!     fn set_finite_state(&mut self, state: &str) {
//!         self.state = Some(state.to_string());
//!     }
//! }
//!
//! let registry = Registry::new().guard("reviewed", |a: &Article| a.reviewed);
//! let loader = ArrayLoader::from_value(
//!     json!({
//!         "class": "Article",
//!         "states": {
//!             "draft": { "kind": "initial" },
//!             "published": { "kind": "final" }
//!         },
//!         "transitions": {
//!             "publish": { "from": "draft", "to": "published", "guard": "reviewed" }
//!         }
//!     }),
//!     registry,
//! )
//! .unwrap();
//!
//! let article = Article { reviewed: true, ..Article::default() };
//! assert!(loader.supports(&article));
//!
//! let mut machine = StateMachine::new(article);
//! loader.load(&mut machine).unwrap();
//! machine.initialize().unwrap();
//! assert_eq!(machine.apply("publish").unwrap(), "published");
//! ```

pub mod config;
mod registry;

pub use config::{CallbacksConfig, MachineConfig, OneOrMany, StateConfig, TransitionConfig};
pub use registry::Registry;

use crate::callback::{CallbackSpec, Position};
use crate::core::{State, Stateful, Transition};
use crate::error::{FiniteError, Result};
use crate::machine::StateMachine;
use serde_json::{Map, Value};

/// Populates a machine for a given kind of stateful object.
pub trait Loader<T: Stateful> {
    fn load(&self, machine: &mut StateMachine<T>) -> Result<()>;

    /// Whether this loader describes machines for `object`.
    fn supports(&self, object: &T) -> bool;
}

/// Loader reading a plain configuration structure.
#[derive(Debug)]
pub struct ArrayLoader<T> {
    config: MachineConfig,
    registry: Registry<T>,
}

impl<T: Stateful> ArrayLoader<T> {
    pub fn new(config: MachineConfig, registry: Registry<T>) -> Self {
        Self { config, registry }
    }

    pub fn from_value(value: Value, registry: Registry<T>) -> Result<Self> {
        Ok(Self::new(MachineConfig::from_value(value)?, registry))
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    fn load_states(&self, machine: &mut StateMachine<T>) -> Result<()> {
        for (id, config) in &self.config.states {
            let state =
                State::new(id.as_str(), config.kind).with_properties(config.properties.clone());
            machine.add_state(state)?;
        }
        Ok(())
    }

    fn load_transitions(&self, machine: &mut StateMachine<T>) -> Result<()> {
        for (name, config) in &self.config.transitions {
            let guard = config
                .guard
                .as_deref()
                .map(|guard| self.registry.resolve_guard(guard))
                .transpose()?;
            let transition = Transition::new(
                name.as_str(),
                config.from.clone().into_set(),
                config.to.as_str(),
                guard,
            )?;
            machine.add_transition(transition)?;
        }
        Ok(())
    }

    fn load_callbacks(&self, machine: &mut StateMachine<T>) -> Result<()> {
        let Some(callbacks) = &self.config.callbacks else {
            return Ok(());
        };

        for (position, entries) in [
            (Position::Before, &callbacks.before),
            (Position::After, &callbacks.after),
        ] {
            for entry in entries {
                let (name, spec) = split_callback_entry(entry.clone())?;
                let callback = self.registry.resolve_callback(&name)?;
                machine.callbacks_mut().add(position, callback, spec);
            }
        }
        Ok(())
    }
}

impl<T: Stateful> Loader<T> for ArrayLoader<T> {
    fn load(&self, machine: &mut StateMachine<T>) -> Result<()> {
        self.load_states(machine)?;
        self.load_transitions(machine)?;
        self.load_callbacks(machine)?;
        tracing::debug!(
            class = %self.config.class,
            states = self.config.states.len(),
            transitions = self.config.transitions.len(),
            "state machine loaded"
        );
        Ok(())
    }

    /// An empty configured class supports no object.
    fn supports(&self, object: &T) -> bool {
        !self.config.class.is_empty() && object.class() == self.config.class
    }
}

/// Remove the `do` key and parse the remainder as filter criteria.
fn split_callback_entry(mut entry: Map<String, Value>) -> Result<(String, CallbackSpec)> {
    let name = match entry.remove("do") {
        Some(Value::String(name)) => name,
        Some(other) => {
            return Err(FiniteError::configuration(format!(
                "callback 'do' must be a name, got {other}"
            )))
        }
        None => return Err(FiniteError::configuration("callback entry is missing 'do'")),
    };
    Ok((name, CallbackSpec::from_map(entry)?))
}
