//! Context passed to callbacks while a transition is in progress.

/// Transition in progress, as seen by before and after hooks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionContext {
    pub transition: String,
    pub from: String,
    pub to: String,
}

impl TransitionContext {
    pub fn new(
        transition: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            transition: transition.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}
