//! Interactive dataset editor built on the state machine.
//!
//! The editor cycles through three transitions:
//!
//! - `load` asks for a dataset path and opens it from the store,
//! - `idle` offers edit, save and unload commands on the open dataset,
//! - `unload` releases the store handle without asking anything.
//!
//! Saving over an existing file that the session neither came from nor
//! previously wrote asks for confirmation first.

mod config;
mod error;
mod types;
mod workflow;

pub use config::{EditorConfig, DEFAULT_FILE_ENDING};
pub use error::{ConfigError, EditorError};
pub use types::{
    EditResponse, EditorRequest, EditorResponse, EditorResponseKind, EditorState,
    OverwriteResponse, SaveResponse, SelectResponse, Session, UnloadResponse,
};
pub use workflow::{DataSetEditor, EditorEnv, SAVE_CANCELLED};
