//! Integrity checks for datasets.
//!
//! Every check runs; violations are accumulated rather than stopping at the
//! first one, so an editor can report everything wrong with a file at once.

use crate::dataset::model::{DataSet, DATA_SET_VERSION};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A single integrity problem found in a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSetViolation {
    #[error("Dataset version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Dataset name is empty")]
    EmptyName,

    #[error("Action id '{0}' is used more than once")]
    DuplicateActionId(String),

    #[error("Unit codename '{0}' is used more than once")]
    DuplicateUnitCodename(String),

    #[error("A unit has an empty codename")]
    EmptyUnitCodename,

    #[error("Unit '{unit}' level {level} references unknown action '{action}'")]
    UnknownAction {
        unit: String,
        level: u8,
        action: String,
    },
}

type Check = Validation<(), NonEmptyVec<DataSetViolation>>;

fn require(holds: bool, violation: impl FnOnce() -> DataSetViolation) -> Check {
    if holds {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

impl DataSet {
    /// Validate the dataset, returning all violations if any.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<DataSetViolation>> {
        let mut checks: Vec<Check> = vec![
            require(self.version == DATA_SET_VERSION, || {
                DataSetViolation::UnsupportedVersion {
                    found: self.version,
                    supported: DATA_SET_VERSION,
                }
            }),
            require(!self.name.trim().is_empty(), || DataSetViolation::EmptyName),
        ];

        let mut action_ids = HashSet::new();
        for action in &self.actions {
            checks.push(require(action_ids.insert(action.id.as_str()), || {
                DataSetViolation::DuplicateActionId(action.id.clone())
            }));
        }

        let mut codenames = HashSet::new();
        for unit in &self.units {
            if unit.codename.trim().is_empty() {
                checks.push(Validation::fail(DataSetViolation::EmptyUnitCodename));
            } else {
                checks.push(require(codenames.insert(unit.codename.as_str()), || {
                    DataSetViolation::DuplicateUnitCodename(unit.codename.clone())
                }));
            }

            for level in &unit.levels {
                for action in &level.actions {
                    checks.push(require(action_ids.contains(action.as_str()), || {
                        DataSetViolation::UnknownAction {
                            unit: unit.codename.clone(),
                            level: level.rank,
                            action: action.clone(),
                        }
                    }));
                }
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// [`validate`](Self::validate) flattened into a plain `Result`.
    pub fn check(&self) -> Result<(), Vec<DataSetViolation>> {
        match self.validate() {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::model::{Action, Level, Unit};

    fn action(id: &str) -> Action {
        Action {
            id: id.into(),
            name: id.to_uppercase(),
            description: String::new(),
            steps: Vec::new(),
        }
    }

    fn unit(codename: &str, first_level_actions: &[&str]) -> Unit {
        let mut levels: [Level; 4] = Default::default();
        for (rank, level) in levels.iter_mut().enumerate() {
            level.rank = rank as u8 + 1;
        }
        levels[0].actions = first_level_actions.iter().map(|a| a.to_string()).collect();
        Unit {
            codename: codename.into(),
            icon_path: String::new(),
            levels,
        }
    }

    #[test]
    fn valid_dataset_passes() {
        let mut data_set = DataSet::new("Valid");
        data_set.actions = vec![action("move"), action("strike")];
        data_set.units = vec![unit("archer", &["move"]), unit("knight", &["strike"])];

        assert!(data_set.validate().is_success());
        assert_eq!(data_set.check(), Ok(()));
    }

    #[test]
    fn accumulates_all_violations() {
        let mut data_set = DataSet::new("  ");
        data_set.version = 2;
        data_set.actions = vec![action("move"), action("move")];
        data_set.units = vec![
            unit("archer", &["move", "fly"]),
            unit("archer", &[]),
            unit("", &[]),
        ];

        let violations = data_set.check().unwrap_err();

        assert_eq!(violations.len(), 6);
        assert!(violations.contains(&DataSetViolation::UnsupportedVersion {
            found: 2,
            supported: DATA_SET_VERSION,
        }));
        assert!(violations.contains(&DataSetViolation::EmptyName));
        assert!(violations.contains(&DataSetViolation::DuplicateActionId("move".into())));
        assert!(violations.contains(&DataSetViolation::DuplicateUnitCodename("archer".into())));
        assert!(violations.contains(&DataSetViolation::EmptyUnitCodename));
        assert!(violations.contains(&DataSetViolation::UnknownAction {
            unit: "archer".into(),
            level: 1,
            action: "fly".into(),
        }));
    }

    #[test]
    fn validation_reports_failure() {
        let mut data_set = DataSet::new("Broken");
        data_set.units = vec![unit("archer", &["ghost"])];

        match data_set.validate() {
            Validation::Failure(errors) => assert_eq!(errors.len(), 1),
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }
}
