//! Core value types of the state machine.
//!
//! This module contains the data the runtime operates on:
//! - `State` values and their `StateKind`
//! - `Transition` values, built directly or through `TransitionBuilder`
//! - `Guard` predicates over the bound object
//! - The `Stateful` contract the bound object implements
//! - Immutable history of applied transitions

mod guard;
mod history;
mod state;
mod stateful;
mod transition;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::{State, StateKind};
pub use stateful::Stateful;
pub use transition::{Transition, TransitionBuilder};
