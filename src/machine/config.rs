//! Runtime limits for a state machine.

use serde::{Deserialize, Deserializer, Serialize};

/// Default bound on transition invocations within one `run` call.
pub const DEFAULT_MAX_AUTO_STEPS: usize = 64;

/// Configuration passed explicitly to a [`StateMachine`](crate::machine::StateMachine).
///
/// ```rust
/// use waypoint::machine::MachineConfig;
///
/// let config: MachineConfig = serde_json::from_str(r#"{ "max_auto_steps": 8 }"#).unwrap();
/// assert_eq!(config.max_auto_steps, 8);
/// assert!(config.record_history);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Transition invocations allowed per `run` before it fails with `Stalled`.
    /// Never below one; zero is rejected when deserializing.
    #[serde(deserialize_with = "at_least_one")]
    pub max_auto_steps: usize,

    /// Whether completed transitions are appended to the history.
    pub record_history: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_auto_steps: DEFAULT_MAX_AUTO_STEPS,
            record_history: true,
        }
    }
}

impl MachineConfig {
    /// Zero is raised to one: a machine must be allowed to start a transition.
    pub fn max_auto_steps(mut self, steps: usize) -> Self {
        self.max_auto_steps = steps.max(1);
        self
    }

    pub fn record_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }
}

fn at_least_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let steps = usize::deserialize(deserializer)?;
    if steps == 0 {
        return Err(serde::de::Error::custom("max_auto_steps must be at least 1"));
    }
    Ok(steps)
}
