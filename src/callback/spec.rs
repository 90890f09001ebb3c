//! Filter criteria scoping a callback to states, transitions and properties.

use crate::callback::context::TransitionContext;
use crate::core::Stateful;
use crate::error::FiniteError;
use crate::loader::config::OneOrMany;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Filter descriptor for a registered callback.
///
/// Each axis is optional; an absent axis matches everything. Axes combine
/// with AND semantics. An empty list is treated like an absent axis.
///
/// # Example
///
/// ```rust
/// use finite::callback::CallbackSpec;
/// use serde_json::json;
///
/// let spec = CallbackSpec::new()
///     .on("approve")
///     .to("approved")
///     .with_property("region", json!("eu"));
///
/// assert!(!spec.matches_all());
/// assert!(CallbackSpec::new().matches_all());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallbackSpec {
    /// Source states of the transition
    #[serde(
        default,
        deserialize_with = "optional_set",
        skip_serializing_if = "Option::is_none"
    )]
    from: Option<BTreeSet<String>>,

    /// Destination states of the transition
    #[serde(
        default,
        deserialize_with = "optional_set",
        skip_serializing_if = "Option::is_none"
    )]
    to: Option<BTreeSet<String>>,

    /// Transition names
    #[serde(
        default,
        deserialize_with = "optional_set",
        skip_serializing_if = "Option::is_none"
    )]
    on: Option<BTreeSet<String>>,

    /// Object properties that must compare equal
    #[serde(default)]
    properties: BTreeMap<String, Value>,
}

impl CallbackSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse filter criteria from a raw map, rejecting unknown keys.
    pub fn from_map(map: Map<String, Value>) -> Result<Self, FiniteError> {
        serde_json::from_value(Value::Object(map))
            .map_err(|err| FiniteError::configuration(format!("invalid callback filter: {err}")))
    }

    pub fn from(mut self, state: impl Into<String>) -> Self {
        self.from.get_or_insert_with(BTreeSet::new).insert(state.into());
        self
    }

    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.to.get_or_insert_with(BTreeSet::new).insert(state.into());
        self
    }

    pub fn on(mut self, transition: impl Into<String>) -> Self {
        self.on
            .get_or_insert_with(BTreeSet::new)
            .insert(transition.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// True when no axis restricts this spec.
    pub fn matches_all(&self) -> bool {
        self.from.is_none() && self.to.is_none() && self.on.is_none() && self.properties.is_empty()
    }

    /// Evaluate every axis against the transition in progress.
    pub fn matches<T: Stateful>(&self, context: &TransitionContext, object: &T) -> bool {
        axis_matches(&self.from, &context.from)
            && axis_matches(&self.to, &context.to)
            && axis_matches(&self.on, &context.transition)
            && self
                .properties
                .iter()
                .all(|(key, expected)| object.property(key).as_ref() == Some(expected))
    }
}

fn axis_matches(axis: &Option<BTreeSet<String>>, value: &str) -> bool {
    axis.as_ref().is_none_or(|set| set.contains(value))
}

fn optional_set<'de, D>(deserializer: D) -> Result<Option<BTreeSet<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let set = Option::<OneOrMany>::deserialize(deserializer)?.map(OneOrMany::into_set);
    Ok(set.filter(|set| !set.is_empty()))
}
