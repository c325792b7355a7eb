//! Errors raised while running a state machine.

use thiserror::Error;

/// Errors that can occur during [`StateMachine::run`](crate::machine::StateMachine::run).
///
/// Protocol errors (`InvalidResponse`, `Unexpected`) are always recoverable:
/// the machine is untouched and the same request is still outstanding.
/// `Action` carries a domain failure raised by a transition handler.
#[derive(Debug, Error)]
pub enum MachineError<E: std::error::Error + 'static> {
    #[error("Transition '{transition}' cannot accept {received}")]
    InvalidResponse { transition: String, received: String },

    #[error("No transition is waiting for input, got {received}")]
    Unexpected { received: String },

    #[error("Transition '{transition}' returned the state '{state}' unchanged without input")]
    NoProgress { transition: String, state: String },

    #[error("Run did not suspend or halt within {steps} steps (last transition '{transition}')")]
    Stalled { transition: String, steps: usize },

    #[error("Transition '{transition}' failed: {source}")]
    Action {
        transition: String,
        #[source]
        source: E,
    },
}

impl<E: std::error::Error + 'static> MachineError<E> {
    /// True for mismatched or unexpected responses.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::InvalidResponse { .. } | Self::Unexpected { .. })
    }

    /// The domain error raised by a handler, if any.
    pub fn domain(&self) -> Option<&E> {
        match self {
            Self::Action { source, .. } => Some(source),
            _ => None,
        }
    }
}
