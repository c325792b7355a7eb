//! Checkpoint and resume functionality for state machines.
//!
//! A checkpoint captures where a machine stands between two calls to
//! `run`: its state, the outstanding request and the name of the suspended
//! transition. Transitions hold closures and are not serialized; the caller
//! supplies them again when resuming with
//! [`StateMachine::resume`](crate::machine::StateMachine::resume).

use crate::core::{Request, State, StateHistory};
use crate::machine::MachineConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a state machine.
///
/// # Example
///
/// ```
/// use waypoint::checkpoint::Checkpoint;
/// use waypoint::core::{Request, StateHistory};
/// use waypoint::state_enum;
/// use serde::{Deserialize, Serialize};
///
/// state_enum! {
///     #[derive(Default)]
///     enum Door {
///         #[default]
///         Closed,
///         Open,
///     }
/// }
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct Knock;
///
/// impl Request for Knock {
///     fn name(&self) -> &str {
///         "Knock"
///     }
/// }
///
/// let checkpoint = Checkpoint::new(Door::Closed, Some(Knock), Some("answer".into()), StateHistory::new());
/// let bytes = checkpoint.to_bytes().unwrap();
/// let restored: Checkpoint<Door, Knock> = Checkpoint::from_bytes(&bytes).unwrap();
///
/// assert_eq!(restored.request, Some(Knock));
/// assert_eq!(restored.active_transition.as_deref(), Some("answer"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Checkpoint<S: State, Q: Request> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    pub state: S,

    /// Request awaiting an answer, `None` when the machine was halted
    pub request: Option<Q>,

    /// Name of the suspended transition
    pub active_transition: Option<String>,

    pub history: StateHistory,

    /// Limits the machine ran with, restored on resume
    pub config: MachineConfig,
}

impl<S: State, Q: Request> Checkpoint<S, Q> {
    /// Create a checkpoint stamped with a fresh id and the current time.
    pub fn new(
        state: S,
        request: Option<Q>,
        active_transition: Option<String>,
        history: StateHistory,
    ) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            state,
            request,
            active_transition,
            history,
            config: MachineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Whether the machine was waiting for input when the snapshot was taken.
    pub fn is_suspended(&self) -> bool {
        self.request.is_some()
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }
}
