//! State machine runtime bound to a stateful object.

use crate::callback::{CallbackHandler, TransitionContext};
use crate::core::{State, StateHistory, StateTransition, Stateful, Transition};
use crate::error::{FiniteError, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::fmt;

/// Runtime that tracks and mutates the state of a bound object.
///
/// The machine owns its states, transitions and callback handler. It owns
/// the bound object too; bind `&mut O` instead of `O` when the caller must
/// keep ownership.
///
/// Errors raised before the mutation step of [`apply`](Self::apply) leave
/// the state untouched. Errors raised by after-hooks surface once the new
/// state is already committed; there is no rollback.
///
/// # Example
///
/// ```rust
/// use finite::core::{State, StateKind, Stateful, Transition};
/// use finite::StateMachine;
///
/// #[derive(Default)]
/// struct Task {
///     state: Option<String>,
/// }
///
/// impl Stateful for Task {
///     fn finite_state(&self) -> Option<&str> {
///         self.state.as_deref()
///     }
///
///     fn set_finite_state(&mut self, state: &str) {
///         self.state = Some(state.to_string());
///     }
/// }
///
/// let mut machine = StateMachine::new(Task::default());
/// machine.add_state(State::new("idle", StateKind::Initial)).unwrap();
/// machine.add_state(State::new("running", StateKind::Normal)).unwrap();
/// machine
///     .add_transition(Transition::new("start", ["idle"], "running", None).unwrap())
///     .unwrap();
///
/// machine.initialize().unwrap();
/// assert_eq!(machine.apply("start").unwrap(), "running");
/// assert_eq!(machine.object().finite_state(), Some("running"));
/// ```
pub struct StateMachine<T> {
    object: T,
    states: HashMap<String, State>,
    transitions: HashMap<String, Transition<T>>,
    callbacks: CallbackHandler<T>,
    current: Option<String>,
    history: StateHistory,
}

impl<T: Stateful> StateMachine<T> {
    pub fn new(object: T) -> Self {
        Self::with_callbacks(object, CallbackHandler::new())
    }

    pub fn with_callbacks(object: T, callbacks: CallbackHandler<T>) -> Self {
        Self {
            object,
            states: HashMap::new(),
            transitions: HashMap::new(),
            callbacks,
            current: None,
            history: StateHistory::new(),
        }
    }

    pub fn add_state(&mut self, state: State) -> Result<()> {
        if self.states.contains_key(state.id()) {
            return Err(FiniteError::DuplicateState(state.id().to_string()));
        }
        self.states.insert(state.id().to_string(), state);
        Ok(())
    }

    pub fn add_transition(&mut self, transition: Transition<T>) -> Result<()> {
        if self.transitions.contains_key(transition.name()) {
            return Err(FiniteError::DuplicateTransition(
                transition.name().to_string(),
            ));
        }
        self.transitions
            .insert(transition.name().to_string(), transition);
        Ok(())
    }

    /// Derive the current state from the bound object.
    ///
    /// A stored state id that names a registered state is kept. Otherwise the
    /// single initial state is selected and written back to the object.
    /// Calling this again re-derives the state from the object.
    pub fn initialize(&mut self) -> Result<()> {
        let stored = self
            .object
            .finite_state()
            .filter(|id| self.states.contains_key(*id))
            .map(str::to_string);

        let current = match stored {
            Some(id) => id,
            None => {
                if let Some(id) = self.object.finite_state() {
                    tracing::debug!(state = id, "stored state is not registered, using initial state");
                }
                let id = self.initial_state_id()?.to_string();
                self.object.set_finite_state(&id);
                id
            }
        };

        tracing::debug!(state = %current, "state machine initialized");
        self.current = Some(current);
        Ok(())
    }

    /// Whether `transition` may fire from the current state.
    ///
    /// Returns `false` when the machine is not initialized.
    pub fn can(&self, transition: &str) -> Result<bool> {
        let transition = self.lookup(transition)?;
        Ok(self
            .current
            .as_deref()
            .is_some_and(|current| transition.can_execute(current, &self.object)))
    }

    /// Apply a transition and return the new current state id.
    pub fn apply(&mut self, name: &str) -> Result<String> {
        let transition = self.lookup(name)?;
        let from = self.current.clone().ok_or(FiniteError::NotInitialized)?;

        if !transition.can_execute(&from, &self.object) {
            return Err(FiniteError::InvalidTransition {
                transition: name.to_string(),
                state: from,
            });
        }

        let to = transition.to_state().to_string();
        if !self.states.contains_key(&to) {
            return Err(FiniteError::UnknownState(to));
        }

        let context = TransitionContext::new(name, from.clone(), to.clone());
        self.callbacks.call_before(&mut self.object, &context)?;

        self.object.set_finite_state(&to);
        self.current = Some(to.clone());
        self.history.push(StateTransition {
            transition: name.to_string(),
            from: from.clone(),
            to: to.clone(),
            timestamp: Utc::now(),
        });
        tracing::debug!(transition = name, from = %from, to = %to, "transition applied");

        self.callbacks.call_after(&mut self.object, &context)?;
        Ok(to)
    }

    /// Names of every transition that can fire right now, sorted.
    pub fn available_transitions(&self) -> Vec<&str> {
        let Some(current) = self.current.as_deref() else {
            return Vec::new();
        };

        let mut names: Vec<&str> = self
            .transitions
            .values()
            .filter(|t| t.can_execute(current, &self.object))
            .map(Transition::name)
            .collect();
        names.sort_unstable();
        names
    }

    pub fn is_initialized(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_state_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_state(&self) -> Option<&State> {
        self.current.as_deref().and_then(|id| self.states.get(id))
    }

    /// Whether the current state is flagged final.
    ///
    /// Advisory only: transitions leaving a final state still apply.
    pub fn is_final(&self) -> bool {
        self.current_state().is_some_and(State::is_final)
    }

    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.get(id)
    }

    pub fn has_state(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    pub fn transition(&self, name: &str) -> Option<&Transition<T>> {
        self.transitions.get(name)
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition<T>> {
        self.transitions.values()
    }

    pub fn callbacks(&self) -> &CallbackHandler<T> {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut CallbackHandler<T> {
        &mut self.callbacks
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Forget recorded transitions. The current state is kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn object(&self) -> &T {
        &self.object
    }

    /// Mutable access to the bound object.
    ///
    /// Writing the state field directly desynchronizes the cached current
    /// state until the next `initialize()`.
    pub fn object_mut(&mut self) -> &mut T {
        &mut self.object
    }

    pub fn into_object(self) -> T {
        self.object
    }

    fn lookup(&self, name: &str) -> Result<&Transition<T>> {
        self.transitions
            .get(name)
            .ok_or_else(|| FiniteError::UnknownTransition(name.to_string()))
    }

    fn initial_state_id(&self) -> Result<&str> {
        let mut initial = self.states.values().filter(|s| s.is_initial());
        match (initial.next(), initial.next()) {
            (Some(state), None) => Ok(state.id()),
            (None, _) => Err(FiniteError::NoInitialState { found: 0 }),
            (Some(_), Some(_)) => Err(FiniteError::NoInitialState {
                found: 2 + initial.count(),
            }),
        }
    }
}

impl<T> fmt::Debug for StateMachine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("states", &self.states.len())
            .field("transitions", &self.transitions.len())
            .field("callbacks", &self.callbacks)
            .finish()
    }
}
