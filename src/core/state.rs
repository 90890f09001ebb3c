//! State values registered on a state machine.
//!
//! A `State` is immutable once constructed. Its properties are opaque data
//! for guards and callbacks; the runtime itself only looks at the id and kind.

use crate::error::FiniteError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Role of a state within its machine.
///
/// Exactly one `Initial` state must exist for `initialize()` to pick a
/// starting point. `Final` is advisory: it does not lock the machine.
///
/// # Example
///
/// ```rust
/// use finite::core::StateKind;
///
/// let kind: StateKind = "final".parse().unwrap();
/// assert_eq!(kind, StateKind::Final);
/// assert!("terminal".parse::<StateKind>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum StateKind {
    Initial,
    #[default]
    Normal,
    Final,
}

impl StateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Normal => "normal",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateKind {
    type Err = FiniteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(Self::Initial),
            "normal" => Ok(Self::Normal),
            "final" => Ok(Self::Final),
            other => Err(FiniteError::configuration(format!(
                "unknown state kind '{other}', expected one of: initial, normal, final"
            ))),
        }
    }
}

impl TryFrom<String> for StateKind {
    type Error = FiniteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A named condition the bound object can be in.
///
/// # Example
///
/// ```rust
/// use finite::core::{State, StateKind};
/// use serde_json::json;
///
/// let state = State::new("pending", StateKind::Initial)
///     .with_property("visible", json!(true));
///
/// assert_eq!(state.id(), "pending");
/// assert!(state.is_initial());
/// assert_eq!(state.get("visible"), Some(&json!(true)));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    id: String,
    kind: StateKind,
    #[serde(default)]
    properties: BTreeMap<String, Value>,
}

impl State {
    pub fn new(id: impl Into<String>, kind: StateKind) -> Self {
        Self {
            id: id.into(),
            kind,
            properties: BTreeMap::new(),
        }
    }

    /// Build a state from a textual kind, failing on unrecognized kinds.
    pub fn parse(
        id: impl Into<String>,
        kind: &str,
        properties: BTreeMap<String, Value>,
    ) -> Result<Self, FiniteError> {
        Ok(Self {
            id: id.into(),
            kind: kind.parse()?,
            properties,
        })
    }

    /// Attach a property. Consumes the state so it stays immutable after
    /// registration.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn with_properties(mut self, properties: BTreeMap<String, Value>) -> Self {
        self.properties.extend(properties);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> StateKind {
        self.kind
    }

    pub fn is_initial(&self) -> bool {
        self.kind == StateKind::Initial
    }

    pub fn is_final(&self) -> bool {
        self.kind == StateKind::Final
    }

    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }

    pub fn has(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
