//! Error types for state machine configuration and execution.

use thiserror::Error;

/// Boxed error raised by user code (callbacks and event subscribers).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FiniteError>;

/// Errors that can occur while building, loading or running a state machine.
///
/// Every error surfaces synchronously to the caller of the operation that
/// detected it. Nothing is retried or suppressed internally.
#[derive(Debug, Error)]
pub enum FiniteError {
    /// Malformed configuration: unknown or missing keys, invalid state kind,
    /// empty source set, unresolved guard or callback names.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("State '{0}' is already registered")]
    DuplicateState(String),

    #[error("Transition '{0}' is already registered")]
    DuplicateTransition(String),

    #[error("Transition '{0}' is not registered")]
    UnknownTransition(String),

    /// A transition references a state id that was never registered.
    #[error("State '{0}' is not registered")]
    UnknownState(String),

    #[error("State machine is not initialized. Call initialize() before apply()")]
    NotInitialized,

    #[error("Cannot determine initial state: expected exactly one initial state, found {found}")]
    NoInitialState { found: usize },

    #[error("Transition '{transition}' cannot be applied from state '{state}'")]
    InvalidTransition { transition: String, state: String },

    /// A user supplied callback or event subscriber failed.
    #[error("Callback failed during {stage}: {source}")]
    Callback {
        stage: String,
        #[source]
        source: BoxError,
    },
}

impl FiniteError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        FiniteError::Configuration(message.into())
    }

    pub(crate) fn callback(stage: impl Into<String>, source: BoxError) -> Self {
        FiniteError::Callback {
            stage: stage.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for FiniteError {
    fn from(err: serde_json::Error) -> Self {
        FiniteError::Configuration(err.to_string())
    }
}
