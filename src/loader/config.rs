//! Declarative configuration consumed by the loader.
//!
//! The schema is strict: unknown keys on the machine, a state or a
//! transition entry are rejected. Callback entries stay raw maps so their
//! `do` key can be split off before the remaining filter keys are parsed.

use crate::core::StateKind;
use crate::error::FiniteError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// A single id or a list of ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_set(self) -> BTreeSet<String> {
        match self {
            Self::One(id) => BTreeSet::from([id]),
            Self::Many(ids) => ids.into_iter().collect(),
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(id: &str) -> Self {
        Self::One(id.to_string())
    }
}

impl<const N: usize> From<[&str; N]> for OneOrMany {
    fn from(ids: [&str; N]) -> Self {
        Self::Many(ids.iter().map(|id| id.to_string()).collect())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateConfig {
    #[serde(default, alias = "type")]
    pub kind: StateKind,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

impl StateConfig {
    pub fn new(kind: StateKind) -> Self {
        Self {
            kind,
            properties: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionConfig {
    pub from: OneOrMany,
    pub to: String,
    /// Name of a guard registered in the loader's registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<String>,
}

impl TransitionConfig {
    pub fn new(from: impl Into<OneOrMany>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            guard: None,
        }
    }

    pub fn guarded_by(mut self, guard: impl Into<String>) -> Self {
        self.guard = Some(guard.into());
        self
    }
}

/// Raw `{do: name, ...filters}` callback entries per position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallbacksConfig {
    #[serde(default)]
    pub before: Vec<Map<String, Value>>,
    #[serde(default)]
    pub after: Vec<Map<String, Value>>,
}

/// Complete machine description.
///
/// # Example
///
/// ```rust
/// use finite::loader::MachineConfig;
/// use serde_json::json;
///
/// let config = MachineConfig::from_value(json!({
///     "class": "Order",
///     "states": {
///         "new": { "kind": "initial" },
///         "paid": { "type": "final", "properties": { "billable": true } }
///     },
///     "transitions": {
///         "pay": { "from": "new", "to": "paid" }
///     }
/// }))
/// .unwrap();
///
/// assert_eq!(config.states.len(), 2);
/// assert!(config.callbacks.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineConfig {
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub states: BTreeMap<String, StateConfig>,
    #[serde(default)]
    pub transitions: BTreeMap<String, TransitionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<CallbacksConfig>,
}

impl MachineConfig {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ..Self::default()
        }
    }

    pub fn from_value(value: Value) -> Result<Self, FiniteError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn state(mut self, id: impl Into<String>, config: StateConfig) -> Self {
        self.states.insert(id.into(), config);
        self
    }

    pub fn transition(mut self, name: impl Into<String>, config: TransitionConfig) -> Self {
        self.transitions.insert(name.into(), config);
        self
    }

    pub fn before(mut self, entry: Map<String, Value>) -> Self {
        self.callbacks
            .get_or_insert_with(CallbacksConfig::default)
            .before
            .push(entry);
        self
    }

    pub fn after(mut self, entry: Map<String, Value>) -> Self {
        self.callbacks
            .get_or_insert_with(CallbacksConfig::default)
            .after
            .push(entry);
        self
    }
}
