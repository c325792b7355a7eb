//! Dataset storage seam.

use crate::dataset::model::DataSet;
use crate::dataset::validation::DataSetViolation;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("No dataset at '{0}'")]
    NotFound(String),

    #[error("Dataset at '{path}' is invalid ({} violations)", .violations.len())]
    Invalid {
        path: String,
        violations: Vec<DataSetViolation>,
    },

    #[error("A dataset already exists at '{0}'")]
    AlreadyExists(String),
}

/// Where datasets are read from and written to.
///
/// `open` acquires a handle on the path that stays held until `release`;
/// an editor that forgets to release leaks it.
pub trait DataSetStore {
    /// Load and validate the dataset at `path`.
    fn open(&mut self, path: &str) -> Result<DataSet, StoreError>;

    fn exists(&self, path: &str) -> bool;

    /// Write `data_set` to `path`.
    ///
    /// Fails with [`StoreError::AlreadyExists`] when `path` is taken and
    /// `overwrite` is false.
    fn save(&mut self, path: &str, data_set: &DataSet, overwrite: bool) -> Result<(), StoreError>;

    /// Give back the handle acquired by `open`.
    fn release(&mut self, path: &str);

    /// Every stored path, sorted.
    fn paths(&self) -> Vec<String>;
}

/// In-memory store with open-handle accounting.
///
/// ```
/// use waypoint::dataset::{DataSet, DataSetStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.insert("a.dataset", DataSet::new("A"));
///
/// let opened = store.open("a.dataset").unwrap();
/// assert_eq!(opened.name, "A");
/// assert_eq!(store.open_count(), 1);
///
/// store.release("a.dataset");
/// assert_eq!(store.open_count(), 0);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, DataSet>,
    open_handles: BTreeMap<String, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, replacing whatever was at `path`.
    pub fn insert(&mut self, path: impl Into<String>, data_set: DataSet) {
        self.entries.insert(path.into(), data_set);
    }

    pub fn get(&self, path: &str) -> Option<&DataSet> {
        self.entries.get(path)
    }

    /// Handles acquired by `open` and not yet released, across all paths.
    pub fn open_count(&self) -> usize {
        self.open_handles.values().sum()
    }

    pub fn is_open(&self, path: &str) -> bool {
        self.open_handles.contains_key(path)
    }
}

impl DataSetStore for MemoryStore {
    fn open(&mut self, path: &str) -> Result<DataSet, StoreError> {
        let data_set = self
            .entries
            .get(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;

        data_set.check().map_err(|violations| StoreError::Invalid {
            path: path.to_string(),
            violations,
        })?;

        *self.open_handles.entry(path.to_string()).or_insert(0) += 1;
        debug!(path, handles = self.open_count(), "opened dataset");
        Ok(data_set.clone())
    }

    fn exists(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    fn save(&mut self, path: &str, data_set: &DataSet, overwrite: bool) -> Result<(), StoreError> {
        if !overwrite && self.exists(path) {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }

        self.entries.insert(path.to_string(), data_set.clone());
        debug!(path, overwrite, "saved dataset");
        Ok(())
    }

    fn release(&mut self, path: &str) {
        if let Some(count) = self.open_handles.get_mut(path) {
            *count -= 1;
            if *count == 0 {
                self.open_handles.remove(path);
            }
            trace!(path, "released dataset handle");
        }
    }

    fn paths(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert("b.dataset", DataSet::new("B"));
        store.insert("a.dataset", DataSet::new("A"));
        store
    }

    #[test]
    fn open_missing_path_fails() {
        let mut store = store();

        assert_eq!(
            store.open("c.dataset"),
            Err(StoreError::NotFound("c.dataset".into()))
        );
        assert_eq!(store.open_count(), 0);
    }

    #[test]
    fn open_rejects_invalid_dataset_without_taking_handle() {
        let mut store = store();
        store.insert("bad.dataset", DataSet::new(""));

        let err = store.open("bad.dataset").unwrap_err();

        assert!(matches!(err, StoreError::Invalid { ref violations, .. } if violations.len() == 1));
        assert!(!store.is_open("bad.dataset"));
    }

    #[test]
    fn handles_are_counted_per_open() {
        let mut store = store();

        store.open("a.dataset").unwrap();
        store.open("a.dataset").unwrap();
        store.open("b.dataset").unwrap();
        assert_eq!(store.open_count(), 3);

        store.release("a.dataset");
        assert!(store.is_open("a.dataset"));
        store.release("a.dataset");
        store.release("a.dataset");
        assert!(!store.is_open("a.dataset"));
        assert_eq!(store.open_count(), 1);
    }

    #[test]
    fn save_refuses_to_clobber_without_overwrite() {
        let mut store = store();
        let replacement = DataSet::new("Replacement");

        assert_eq!(
            store.save("a.dataset", &replacement, false),
            Err(StoreError::AlreadyExists("a.dataset".into()))
        );
        assert_eq!(store.get("a.dataset").map(|d| d.name.as_str()), Some("A"));

        store.save("a.dataset", &replacement, true).unwrap();
        assert_eq!(
            store.get("a.dataset").map(|d| d.name.as_str()),
            Some("Replacement")
        );
    }

    #[test]
    fn save_creates_new_paths() {
        let mut store = store();

        store.save("c.dataset", &DataSet::new("C"), false).unwrap();

        assert_eq!(store.paths(), vec!["a.dataset", "b.dataset", "c.dataset"]);
    }
}
