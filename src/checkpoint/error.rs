//! Checkpoint error types.

use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The suspended transition is not among those supplied on resume
    #[error("Checkpoint names transition '{0}', which is not registered")]
    UnknownTransition(String),

    /// Request and suspended transition disagree
    #[error("Checkpoint validation failed: {0}")]
    ValidationFailed(String),
}
