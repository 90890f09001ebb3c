//! Event-aware decorator around [`StateMachine`].
//!
//! [`ListenableStateMachine`] publishes lifecycle notifications to an
//! injected [`EventSink`]:
//!
//! - `Initialize` after the wrapped machine initialized
//! - `PreTransition` at the start of `apply`, before any validation, so an
//!   unknown or invalid transition still publishes it
//! - `PostTransition` only after the wrapped `apply` succeeded
//!
//! Sink failures propagate to the caller like callback failures do.

use crate::core::Stateful;
use crate::error::{BoxError, FiniteError, Result};
use crate::machine::StateMachine;
use std::fmt;
use std::ops::Deref;

/// Lifecycle topics published by a [`ListenableStateMachine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    Initialize,
    PreTransition,
    PostTransition,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Self::Initialize, Self::PreTransition, Self::PostTransition];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "finite.initialize",
            Self::PreTransition => "finite.pre_transition",
            Self::PostTransition => "finite.post_transition",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a lifecycle notification.
pub struct StateMachineEvent<'a, T> {
    machine: &'a StateMachine<T>,
    transition: Option<&'a str>,
}

impl<'a, T: Stateful> StateMachineEvent<'a, T> {
    pub fn new(machine: &'a StateMachine<T>, transition: Option<&'a str>) -> Self {
        Self {
            machine,
            transition,
        }
    }

    pub fn machine(&self) -> &'a StateMachine<T> {
        self.machine
    }

    /// Transition being attempted or just applied; `None` for `Initialize`.
    pub fn transition(&self) -> Option<&'a str> {
        self.transition
    }

    pub fn current_state_id(&self) -> Option<&'a str> {
        self.machine.current_state_id()
    }
}

/// Publish/subscribe sink receiving lifecycle notifications.
pub trait EventSink<T> {
    fn publish(
        &mut self,
        topic: Topic,
        event: &StateMachineEvent<'_, T>,
    ) -> std::result::Result<(), BoxError>;
}

impl<T, P: EventSink<T> + ?Sized> EventSink<T> for &mut P {
    fn publish(
        &mut self,
        topic: Topic,
        event: &StateMachineEvent<'_, T>,
    ) -> std::result::Result<(), BoxError> {
        (**self).publish(topic, event)
    }
}

/// Sink that drops every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl<T> EventSink<T> for NoopSink {
    fn publish(
        &mut self,
        _topic: Topic,
        _event: &StateMachineEvent<'_, T>,
    ) -> std::result::Result<(), BoxError> {
        Ok(())
    }
}

type Subscriber<T> =
    Box<dyn FnMut(&StateMachineEvent<'_, T>) -> std::result::Result<(), BoxError>>;

/// Synchronous in-process dispatcher.
///
/// Subscribers run in subscription order on the publishing thread. The first
/// failing subscriber stops delivery of that notification.
pub struct EventDispatcher<T> {
    subscribers: Vec<(Topic, Subscriber<T>)>,
}

impl<T> EventDispatcher<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, topic: Topic, subscriber: F) -> &mut Self
    where
        F: FnMut(&StateMachineEvent<'_, T>) -> std::result::Result<(), BoxError> + 'static,
    {
        self.subscribers.push((topic, Box::new(subscriber)));
        self
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscribers.iter().filter(|(t, _)| *t == topic).count()
    }
}

impl<T> Default for EventDispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventSink<T> for EventDispatcher<T> {
    fn publish(
        &mut self,
        topic: Topic,
        event: &StateMachineEvent<'_, T>,
    ) -> std::result::Result<(), BoxError> {
        for (subscribed, subscriber) in self.subscribers.iter_mut() {
            if *subscribed == topic {
                subscriber(event)?;
            }
        }
        Ok(())
    }
}

/// A [`StateMachine`] that publishes lifecycle notifications.
///
/// Read access to the wrapped machine goes through `Deref`; mutation only
/// through [`initialize`](Self::initialize) and [`apply`](Self::apply) so
/// that every lifecycle step is published.
///
/// # Example
///
/// ```rust
/// use finite::core::{State, StateKind, Stateful, Transition};
/// use finite::listenable::{EventDispatcher, ListenableStateMachine, Topic};
/// use finite::StateMachine;
/// use std::sync::{Arc, Mutex};
///
/// #[derive(Default)]
/// struct Door {
///     state: Option<String>,
/// }
///
/// impl Stateful for Door {
///     fn finite_state(&self) -> Option<&str> {
///         self.state.as_deref()
///     }
///
///     fn set_finite_state(&mut self, state: &str) {
///         self.state = Some(state.to_string());
///     }
/// }
///
/// let mut machine = StateMachine::new(Door::default());
/// machine.add_state(State::new("closed", StateKind::Initial)).unwrap();
/// machine.add_state(State::new("open", StateKind::Normal)).unwrap();
/// machine
///     .add_transition(Transition::new("open", ["closed"], "open", None).unwrap())
///     .unwrap();
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let recorder = Arc::clone(&seen);
/// let mut dispatcher = EventDispatcher::<Door>::new();
/// dispatcher.subscribe(Topic::PostTransition, move |event| {
///     let state = event.current_state_id().unwrap_or_default();
///     recorder.lock().unwrap().push(state.to_string());
///     Ok(())
/// });
///
/// let mut listenable = ListenableStateMachine::new(machine, dispatcher);
/// listenable.initialize().unwrap();
/// listenable.apply("open").unwrap();
///
/// assert_eq!(*seen.lock().unwrap(), vec!["open".to_string()]);
/// ```
pub struct ListenableStateMachine<T, P> {
    machine: StateMachine<T>,
    sink: P,
}

impl<T: Stateful, P: EventSink<T>> ListenableStateMachine<T, P> {
    pub fn new(machine: StateMachine<T>, sink: P) -> Self {
        Self { machine, sink }
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.machine.initialize()?;
        self.publish(Topic::Initialize, None)
    }

    pub fn apply(&mut self, transition: &str) -> Result<String> {
        self.publish(Topic::PreTransition, Some(transition))?;
        let state = self.machine.apply(transition)?;
        self.publish(Topic::PostTransition, Some(transition))?;
        Ok(state)
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut P {
        &mut self.sink
    }

    pub fn into_inner(self) -> (StateMachine<T>, P) {
        (self.machine, self.sink)
    }

    fn publish(&mut self, topic: Topic, transition: Option<&str>) -> Result<()> {
        tracing::trace!(%topic, transition, "publishing state machine event");
        let event = StateMachineEvent::new(&self.machine, transition);
        self.sink
            .publish(topic, &event)
            .map_err(|source| FiniteError::callback(format!("{topic} subscriber"), source))
    }
}

impl<T, P> Deref for ListenableStateMachine<T, P> {
    type Target = StateMachine<T>;

    fn deref(&self) -> &Self::Target {
        &self.machine
    }
}
