//! Finite: a declarative finite state machine engine
//!
//! Finite tracks the state of an arbitrary object and enforces which
//! transitions are legal from which states. A machine is described by
//! states, transitions with optional guards, and before/after callbacks,
//! either registered in code or loaded from a plain configuration value.
//!
//! # Core Concepts
//!
//! - **State**: identifier, kind (initial, normal, final) and properties
//! - **Transition**: named move from a set of states to one state, optionally
//!   gated by a **Guard** over the bound object
//! - **Stateful**: contract of the bound object holding the current state id
//! - **CallbackHandler**: before/after hooks scoped by state, transition and
//!   property filters
//! - **ListenableStateMachine**: decorator publishing lifecycle events
//! - **Loader**: builds a machine from a `MachineConfig`
//!
//! Everything runs synchronously on the calling thread. A machine is not
//! meant to be shared between threads without external synchronization.
//!
//! # Example
//!
//! ```rust
//! use finite::callback::{CallbackSpec, TransitionContext};
//! use finite::core::Stateful;
//! use finite::loader::{ArrayLoader, Loader, Registry};
//! use finite::{FiniteError, StateMachine};
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct Job {
//!     state: Option<String>,
//!     notes: Vec<String>,
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
//! let loader = ArrayLoader::from_value(
//!     json!({
//!         "class": "Job",
//!         "states": {
//!             "idle": { "kind": "initial" },
//!             "running": { "kind": "normal" },
//!             "done": { "kind": "final" }
//!         },
//!         "transitions": {
//!             "start": { "from": "idle", "to": "running" },
//!             "finish": { "from": "running", "to": "done" }
//!         }
//!     }),
//!     Registry::<Job>::new(),
//! )
//! .unwrap();
//!
//! let mut machine = StateMachine::new(Job::default());
//! loader.load(&mut machine).unwrap();
//! machine.callbacks_mut().add_after(
//!     |job: &mut Job, ctx: &TransitionContext| {
//!         job.notes.push(format!("{} -> {}", ctx.from, ctx.to));
//!         Ok(())
//!     },
//!     CallbackSpec::new(),
//! );
//!
//! machine.initialize().unwrap();
//! machine.apply("start").unwrap();
//! machine.apply("finish").unwrap();
//!
//! assert!(machine.is_final());
//! assert_eq!(machine.object().notes, vec!["idle -> running", "running -> done"]);
//! assert!(matches!(
//!     machine.apply("start"),
//!     Err(FiniteError::InvalidTransition { .. })
//! ));
//! ```

pub mod callback;
pub mod core;
pub mod error;
pub mod listenable;
pub mod loader;
pub mod machine;

// Re-export commonly used types
pub use callback::{CallbackHandler, CallbackSpec, Position, TransitionContext};
pub use crate::core::{Guard, State, StateHistory, StateKind, StateTransition, Stateful, Transition};
pub use error::{BoxError, FiniteError, Result};
pub use listenable::{EventDispatcher, EventSink, ListenableStateMachine, NoopSink, Topic};
pub use loader::{ArrayLoader, Loader, MachineConfig, Registry};
pub use machine::StateMachine;
