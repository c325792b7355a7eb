//! Editor error types.

use crate::dataset::StoreError;
use thiserror::Error;

/// Failures raised by editor transitions.
///
/// These abort the `run` call that hit them. Problems the user can fix from
/// the idle menu, such as a rejected edit, are reported as a notice on the
/// next request instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("Could not open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("Could not save '{path}': {source}")]
    Save {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("Invalid dataset path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Transition '{transition}' cannot run in state '{state}'")]
    UnexpectedState { transition: String, state: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid editor configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("file_ending must not be empty")]
    EmptyFileEnding,
}
