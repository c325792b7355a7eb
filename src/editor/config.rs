//! Editor configuration and path resolution.

use crate::editor::error::{ConfigError, EditorError};
use serde::{Deserialize, Serialize};

/// Default extension every dataset path must carry.
pub const DEFAULT_FILE_ENDING: &str = ".dataset";

/// Settings the editor workflow reads from its environment.
///
/// ```rust
/// use waypoint::editor::EditorConfig;
///
/// let config = EditorConfig::from_json(r#"{ "data_set_folder": "C:\\sets" }"#).unwrap();
/// assert_eq!(config.resolve("\"units.dataset\" ").unwrap(), "C:/sets/units.dataset");
/// assert!(config.resolve("units.txt").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Folder relative dataset paths are resolved against.
    pub data_set_folder: Option<String>,

    pub file_ending: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            data_set_folder: None,
            file_ending: DEFAULT_FILE_ENDING.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.file_ending.trim().is_empty() {
            return Err(ConfigError::EmptyFileEnding);
        }
        Ok(config)
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.data_set_folder = Some(folder.into());
        self
    }

    /// Turn user input into a dataset path.
    ///
    /// Surrounding whitespace and quotes are dropped and backslashes become
    /// forward slashes. Relative paths are joined onto `data_set_folder`.
    pub fn resolve(&self, raw: &str) -> Result<String, EditorError> {
        let path = normalize(raw);
        let invalid = |reason: &str| EditorError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        if path.is_empty() {
            return Err(invalid("path is empty"));
        }
        if path.ends_with('/') {
            return Err(invalid("path is not a file"));
        }
        if !path.ends_with(&self.file_ending) {
            return Err(invalid(&format!("expected a '{}' file", self.file_ending)));
        }

        match &self.data_set_folder {
            Some(folder) if !is_absolute(&path) => {
                let folder = normalize(folder);
                Ok(format!("{}/{}", folder.trim_end_matches('/'), path))
            }
            _ => Ok(path),
        }
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().replace('"', "").replace('\\', "/")
}

fn is_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/') || (bytes.len() > 2 && bytes[0].is_ascii_alphabetic() && &bytes[1..3] == b":/")
}
