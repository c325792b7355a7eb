//! Completed-transition history.
//!
//! Every time a transition yields a new state the machine appends a record
//! here. Suspensions are not recorded; only state replacements are.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single state replacement.
///
/// States are stored by variant name so the history stays small even when
/// a state carries a large payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// Name of the transition that produced the new state
    pub transition: String,
    /// Variant name of the replaced state
    pub from: String,
    /// Variant name of the new state
    pub to: String,
    /// When the state was replaced
    pub timestamp: DateTime<Utc>,
    /// Position of this record in the history, starting at 0
    pub sequence: usize,
}

/// Ordered history of state replacements.
///
/// # Example
///
/// ```rust
/// use waypoint::core::StateHistory;
/// use chrono::Utc;
///
/// let history = StateHistory::new()
///     .record("load", "Empty", "Loaded", Utc::now())
///     .record("idle", "Loaded", "Unloading", Utc::now())
///     .record("unload", "Unloading", "Empty", Utc::now());
///
/// assert_eq!(history.get_path(), vec!["Empty", "Loaded", "Unloading", "Empty"]);
/// assert_eq!(history.transitions()[2].sequence, 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<StateTransition>,
}

impl StateHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Append a record and return the extended history.
    pub fn record(
        mut self,
        transition: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let sequence = self.transitions.len();
        self.transitions.push(StateTransition {
            transition: transition.into(),
            from: from.into(),
            to: to.into(),
            timestamp,
            sequence,
        });
        self
    }

    /// Get the path of state names traversed.
    ///
    /// Returns the `from` of the first record followed by the `to` of
    /// every record. Empty when nothing has been recorded.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(first.from.as_str());
        }
        path.extend(self.transitions.iter().map(|t| t.to.as_str()));
        path
    }

    /// Time between the first and last record, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Names of the transitions that completed, in order.
    pub fn transition_names(&self) -> Vec<&str> {
        self.transitions
            .iter()
            .map(|t| t.transition.as_str())
            .collect()
    }

    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
