//! Contract for objects whose state a machine tracks.

use serde_json::Value;

/// An object carrying a current-state identifier.
///
/// The machine only reads and writes the state identifier. Every other field
/// belongs to guards and callbacks.
///
/// # Example
///
/// ```rust
/// use finite::core::Stateful;
///
/// struct Order {
///     state: Option<String>,
/// }
///
/// impl Stateful for Order {
///     fn finite_state(&self) -> Option<&str> {
///         self.state.as_deref()
///     }
///
///     fn set_finite_state(&mut self, state: &str) {
///         self.state = Some(state.to_string());
///     }
/// }
///
/// let order = Order { state: None };
/// assert_eq!(order.class(), "Order");
/// ```
pub trait Stateful {
    /// The stored state identifier, if any.
    fn finite_state(&self) -> Option<&str>;

    fn set_finite_state(&mut self, state: &str);

    /// Property lookup used by callback filters.
    ///
    /// Default implementation exposes no properties.
    fn property(&self, _key: &str) -> Option<Value> {
        None
    }

    /// Type tag compared against a loader's configured class.
    ///
    /// Defaults to the unqualified type name.
    fn class(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Lets a machine borrow an object the caller keeps ownership of.
impl<S: Stateful + ?Sized> Stateful for &mut S {
    fn finite_state(&self) -> Option<&str> {
        (**self).finite_state()
    }

    fn set_finite_state(&mut self, state: &str) {
        (**self).set_finite_state(state)
    }

    fn property(&self, key: &str) -> Option<Value> {
        (**self).property(key)
    }

    fn class(&self) -> &str {
        (**self).class()
    }
}

fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
