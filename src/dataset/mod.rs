//! Datasets: the documents the editor workflow loads, edits and saves.

mod model;
mod store;
mod validation;

pub use model::{Action, ActionStep, DataSet, Faction, Level, Range, Stats, Unit, DATA_SET_VERSION};
pub use store::{DataSetStore, MemoryStore, StoreError};
pub use validation::DataSetViolation;
