//! States, requests and responses of the dataset editor.

use crate::core::Request;
use crate::dataset::DataSet;
use serde::{Deserialize, Serialize};

/// An open dataset and where it will be saved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub data_set: DataSet,

    /// Path the dataset was opened from. Its store handle is released on unload.
    pub source: String,

    /// Path the next save writes to.
    pub target: String,

    pub last_saved: Option<String>,
}

impl Session {
    pub fn new(data_set: DataSet, source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            data_set,
            target: source.clone(),
            source,
            last_saved: None,
        }
    }

    /// Saving to the file this session came from, or last wrote, needs no
    /// confirmation.
    pub fn owns_target(&self) -> bool {
        self.target == self.source || self.last_saved.as_deref() == Some(self.target.as_str())
    }

    pub(crate) fn saved(mut self) -> Self {
        self.last_saved = Some(self.target.clone());
        self
    }
}

crate::state_enum! {
    /// Where the editor stands.
    #[derive(Default)]
    pub enum EditorState {
        /// Nothing loaded.
        #[default]
        Empty,
        /// A dataset is open for editing.
        Loaded(Session),
        /// The user asked to close the dataset; its handle is still held.
        Unloading(Session),
    }
}

impl EditorState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Empty => None,
            Self::Loaded(session) | Self::Unloading(session) => Some(session),
        }
    }
}

/// What the editor asks the driver for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EditorRequest {
    /// Choose a dataset path to open.
    SelectDataSet,

    /// Waiting for the next command, with feedback on the previous one.
    Idle { notice: Option<String> },

    /// The save target exists; ask whether to replace it.
    ConfirmOverwrite { path: String },
}

impl Request for EditorRequest {
    fn name(&self) -> &str {
        match self {
            Self::SelectDataSet => "SelectDataSet",
            Self::Idle { .. } => "Idle",
            Self::ConfirmOverwrite { .. } => "ConfirmOverwrite",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectResponse {
    pub path: String,
}

/// Change one property: `name <new name>` or `path <new target>`.
#[derive(Debug, Clone, PartialEq)]
pub struct EditResponse {
    pub key: String,
    pub args: Vec<String>,
}

impl EditResponse {
    pub fn new(key: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            key: key.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveResponse;

#[derive(Debug, Clone, PartialEq)]
pub struct OverwriteResponse {
    pub confirmed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnloadResponse;

crate::response_enum! {
    #[derive(Clone, PartialEq)]
    pub enum EditorResponse => EditorResponseKind {
        Select(SelectResponse),
        Edit(EditResponse),
        Save(SaveResponse),
        Overwrite(OverwriteResponse),
        Unload(UnloadResponse),
    }
}

impl EditorRequest {
    /// Whether `response` answers this request.
    pub fn accepts(&self, response: &EditorResponse) -> bool {
        matches!(
            (self, response),
            (Self::SelectDataSet, EditorResponse::Select(_))
                | (
                    Self::Idle { .. },
                    EditorResponse::Edit(_) | EditorResponse::Save(_) | EditorResponse::Unload(_)
                )
                | (Self::ConfirmOverwrite { .. }, EditorResponse::Overwrite(_))
        )
    }
}
