//! Guard predicates for selecting transitions.
//!
//! Guards are pure boolean functions over the current state. A transition
//! is selectable only while its guard holds.

use super::state::State;
use std::fmt;

/// Pure predicate that decides whether a transition is selectable.
///
/// Guards must be deterministic: they may only observe the state they are
/// given. A guard that reads anything else makes transition selection
/// unpredictable.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{Guard, State};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
/// enum Phase {
///     #[default]
///     Empty,
///     Loaded(u32),
/// }
///
/// impl State for Phase {
///     fn name(&self) -> &str {
///         match self {
///             Self::Empty => "Empty",
///             Self::Loaded(_) => "Loaded",
///         }
///     }
/// }
///
/// let loaded = Guard::new(|s: &Phase| matches!(s, Phase::Loaded(_)));
/// let small = Guard::new(|s: &Phase| matches!(s, Phase::Loaded(n) if *n < 10));
/// let guard = loaded.and(small);
///
/// assert!(guard.check(&Phase::Loaded(3)));
/// assert!(!guard.check(&Phase::Loaded(30)));
/// assert!(!guard.check(&Phase::Empty));
/// ```
pub struct Guard<S: State> {
    predicate: Box<dyn Fn(&S) -> bool + Send + Sync>,
}

impl<S: State + 'static> Guard<S> {
    /// Create a guard from a pure predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Combine two guards; the result holds only when both hold.
    ///
    /// Evaluation short-circuits left to right.
    pub fn and(self, other: Guard<S>) -> Self {
        let left = self.predicate;
        let right = other.predicate;
        Guard::new(move |state: &S| left(state) && right(state))
    }
}

impl<S: State> Guard<S> {
    /// Check if the guard holds for this state.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}

impl<S: State> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
