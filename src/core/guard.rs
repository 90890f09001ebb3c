//! Guard predicates for controlling transitions.
//!
//! Guards are boolean functions over the bound object. A transition whose
//! guard returns `false` is blocked even when the current state matches.

use std::fmt;
use std::sync::Arc;

/// Predicate deciding whether a transition may currently fire.
///
/// Guards are cheap to clone and thread-safe (`Send + Sync`), so the same
/// guard can be shared between transitions and loader registries.
///
/// # Example
///
/// ```rust
/// use finite::core::Guard;
///
/// struct Expense {
///     amount: u32,
///     manager_sign_off: bool,
/// }
///
/// let has_manager_sign_off = Guard::new(|e: &Expense| e.manager_sign_off);
///
/// assert!(has_manager_sign_off.check(&Expense { amount: 10, manager_sign_off: true }));
/// assert!(!has_manager_sign_off.check(&Expense { amount: 10, manager_sign_off: false }));
/// ```
pub struct Guard<T: ?Sized> {
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T: ?Sized> Guard<T> {
    /// Create a guard from a predicate function.
    ///
    /// The predicate should be fast and side-effect free: it may run several
    /// times per `apply` (once for `can`, again for `available_transitions`).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    pub fn check(&self, object: &T) -> bool {
        (self.predicate)(object)
    }
}

impl<T: ?Sized> Clone for Guard<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Guard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
