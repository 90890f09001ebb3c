//! Transition values and their builder.

use crate::core::guard::Guard;
use crate::error::FiniteError;
use std::collections::BTreeSet;
use std::fmt;

/// A named move from a set of source states to one destination state.
///
/// State ids are not checked against the machine when the transition is
/// built; the machine resolves them when the transition is applied.
pub struct Transition<T> {
    name: String,
    from: BTreeSet<String>,
    to: String,
    guard: Option<Guard<T>>,
}

impl<T> Transition<T> {
    /// Create a transition. Fails if `from` is empty.
    pub fn new<I, S>(
        name: impl Into<String>,
        from: I,
        to: impl Into<String>,
        guard: Option<Guard<T>>,
    ) -> Result<Self, FiniteError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let from: BTreeSet<String> = from.into_iter().map(Into::into).collect();
        if from.is_empty() {
            return Err(FiniteError::configuration(format!(
                "transition '{name}' must have at least one source state"
            )));
        }

        Ok(Self {
            name,
            from,
            to: to.into(),
            guard,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn from_states(&self) -> &BTreeSet<String> {
        &self.from
    }

    pub fn to_state(&self) -> &str {
        &self.to
    }

    pub fn guard(&self) -> Option<&Guard<T>> {
        self.guard.as_ref()
    }

    pub fn leaves(&self, state: &str) -> bool {
        self.from.contains(state)
    }

    /// Check if this transition can fire from `current` for `object`.
    pub fn can_execute(&self, current: &str, object: &T) -> bool {
        if !self.leaves(current) {
            return false;
        }

        self.guard.as_ref().is_none_or(|g| g.check(object))
    }
}

impl<T> Clone for Transition<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<T> fmt::Debug for Transition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("name", &self.name)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

/// Builder for constructing transitions with a fluent API.
///
/// # Example
///
/// ```rust
/// use finite::core::TransitionBuilder;
///
/// struct Invoice {
///     paid: bool,
/// }
///
/// let settle = TransitionBuilder::<Invoice>::new("settle")
///     .from("issued")
///     .from("overdue")
///     .to("settled")
///     .when(|invoice| invoice.paid)
///     .build()
///     .unwrap();
///
/// assert!(settle.can_execute("overdue", &Invoice { paid: true }));
/// assert!(!settle.can_execute("issued", &Invoice { paid: false }));
/// ```
pub struct TransitionBuilder<T> {
    name: String,
    from: Vec<String>,
    to: Option<String>,
    guard: Option<Guard<T>>,
}

impl<T> TransitionBuilder<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: Vec::new(),
            to: None,
            guard: None,
        }
    }

    /// Add a source state (at least one required).
    pub fn from(mut self, state: impl Into<String>) -> Self {
        self.from.push(state.into());
        self
    }

    /// Add several source states.
    pub fn from_any<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.from.extend(states.into_iter().map(Into::into));
        self
    }

    /// Set the destination state (required).
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.to = Some(state.into());
        self
    }

    pub fn guard(mut self, guard: Guard<T>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    pub fn build(self) -> Result<Transition<T>, FiniteError> {
        let to = self.to.ok_or_else(|| {
            FiniteError::configuration(format!(
                "transition '{}' has no destination state. Call .to(state)",
                self.name
            ))
        })?;

        Transition::new(self.name, self.from, to, self.guard)
    }
}
