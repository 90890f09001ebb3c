//! Before and after hooks around transitions.
//!
//! Hooks are registered with a [`CallbackSpec`] scoping them to states,
//! transitions or object properties. On every `apply` the handler evaluates
//! each registered spec afresh and invokes matching hooks in registration
//! order. The first failing hook aborts the remaining ones.
//!
//! # Example
//!
//! ```rust
//! use finite::callback::{CallbackHandler, CallbackSpec, TransitionContext};
//! use finite::core::Stateful;
//!
//! struct Job {
//!     state: Option<String>,
//!     log: Vec<String>,
//! }
//!
//! impl Stateful for Job {
//!     fn finite_state(&self) -> Option<&str> {
//!         self.state.as_deref()
//!     }
//!
//!     fn set_finite_state(&mut self, state: &str) {
//!         self.state = Some(state.to_string());
//!     }
//! }
//!
//! let mut handler = CallbackHandler::new();
//! handler.add_before(
//!     |job: &mut Job, ctx: &TransitionContext| {
//!         job.log.push(format!("leaving {}", ctx.from));
//!         Ok(())
//!     },
//!     CallbackSpec::new().on("start"),
//! );
//!
//! let mut job = Job { state: None, log: Vec::new() };
//! handler
//!     .call_before(&mut job, &TransitionContext::new("start", "idle", "running"))
//!     .unwrap();
//! assert_eq!(job.log, vec!["leaving idle"]);
//! ```

mod context;
mod spec;

pub use context::TransitionContext;
pub use spec::CallbackSpec;

use crate::core::Stateful;
use crate::error::{BoxError, FiniteError};
use std::fmt;
use std::sync::Arc;

/// Type alias for hook functions.
pub type Callback<T> =
    Arc<dyn Fn(&mut T, &TransitionContext) -> Result<(), BoxError> + Send + Sync>;

/// When a hook runs relative to the state mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    Before,
    After,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
        }
    }
}

struct Entry<T> {
    callback: Callback<T>,
    spec: CallbackSpec,
}

/// Registry and dispatcher for before/after hooks.
pub struct CallbackHandler<T> {
    before: Vec<Entry<T>>,
    after: Vec<Entry<T>>,
}

impl<T: Stateful> CallbackHandler<T> {
    pub fn new() -> Self {
        Self {
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    pub fn add_before<F>(&mut self, callback: F, spec: CallbackSpec) -> &mut Self
    where
        F: Fn(&mut T, &TransitionContext) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.add(Position::Before, Arc::new(callback), spec)
    }

    pub fn add_after<F>(&mut self, callback: F, spec: CallbackSpec) -> &mut Self
    where
        F: Fn(&mut T, &TransitionContext) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.add(Position::After, Arc::new(callback), spec)
    }

    /// Register an already shared callback.
    pub fn add(
        &mut self,
        position: Position,
        callback: Callback<T>,
        spec: CallbackSpec,
    ) -> &mut Self {
        let entry = Entry { callback, spec };
        match position {
            Position::Before => self.before.push(entry),
            Position::After => self.after.push(entry),
        }
        self
    }

    pub fn call_before(
        &self,
        object: &mut T,
        context: &TransitionContext,
    ) -> Result<(), FiniteError> {
        dispatch(&self.before, Position::Before, object, context)
    }

    pub fn call_after(
        &self,
        object: &mut T,
        context: &TransitionContext,
    ) -> Result<(), FiniteError> {
        dispatch(&self.after, Position::After, object, context)
    }

    pub fn len(&self, position: Position) -> usize {
        match position {
            Position::Before => self.before.len(),
            Position::After => self.after.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }
}

impl<T: Stateful> Default for CallbackHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CallbackHandler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackHandler")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}

fn dispatch<T: Stateful>(
    entries: &[Entry<T>],
    position: Position,
    object: &mut T,
    context: &TransitionContext,
) -> Result<(), FiniteError> {
    for (index, entry) in entries.iter().enumerate() {
        if !entry.spec.matches(context, &*object) {
            continue;
        }

        tracing::trace!(%position, index, transition = %context.transition, "invoking hook");
        (entry.callback)(&mut *object, context).map_err(|source| {
            FiniteError::callback(
                format!("{position} hook #{index} for '{}'", context.transition),
                source,
            )
        })?;
    }
    Ok(())
}
