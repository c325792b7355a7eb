//! Core State trait for workflow positions.
//!
//! A workflow's state is a closed set of variants. Exactly one variant is
//! active at a time and transitions replace the whole value.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// The `Default` value is the empty/initial variant a machine starts in
/// when no explicit state is supplied.
///
/// # Required Traits
///
/// - `Clone`: states are snapshotted for checkpoints and rolled forward by value
/// - `PartialEq`: the machine compares states to detect stalled initial actions
/// - `Default`: provides the initial variant
/// - `Serialize` + `Deserialize`: states must be serializable for checkpoints
///
/// # Example
///
/// ```rust
/// use waypoint::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
/// enum DoorState {
///     #[default]
///     Closed,
///     Open { visitors: u32 },
/// }
///
/// impl State for DoorState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Open { .. } => "Open",
///         }
///     }
/// }
///
/// assert!(DoorState::Closed.is_initial());
/// assert!(!DoorState::Open { visitors: 2 }.is_initial());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Default + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's variant name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is the initial (default) variant.
    fn is_initial(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
    enum TestState {
        #[default]
        Empty,
        Loaded(String),
        Unloading(String),
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Empty => "Empty",
                Self::Loaded(_) => "Loaded",
                Self::Unloading(_) => "Unloading",
            }
        }
    }

    #[test]
    fn state_name_ignores_payload() {
        assert_eq!(TestState::Empty.name(), "Empty");
        assert_eq!(TestState::Loaded("a".into()).name(), "Loaded");
        assert_eq!(TestState::Loaded("b".into()).name(), "Loaded");
        assert_eq!(TestState::Unloading("a".into()).name(), "Unloading");
    }

    #[test]
    fn is_initial_matches_default_variant() {
        assert!(TestState::Empty.is_initial());
        assert!(!TestState::Loaded("a".into()).is_initial());
    }

    #[test]
    fn payload_participates_in_equality() {
        assert_eq!(TestState::Loaded("a".into()), TestState::Loaded("a".into()));
        assert_ne!(TestState::Loaded("a".into()), TestState::Loaded("b".into()));
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::Loaded("units".into());
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
