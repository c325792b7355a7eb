//! Content model of a dataset: actions and the units that use them.

use serde::{Deserialize, Serialize};

/// Current dataset format version.
pub const DATA_SET_VERSION: u32 = 1;

/// Which side a selection may target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Ally,
    Enemy,
    #[default]
    Any,
}

/// Distance a selection may reach.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Range {
    Melee,
    Ranged,
    #[default]
    Any,
}

/// One step of an action, executed in order.
///
/// Externally tagged so the binary checkpoint format can decode it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActionStep {
    SwapPosition,
    PhysicalAttack {
        accuracy: i32,
        power: i32,
    },
    SelectSelf,
    SelectAutomatic {
        allow_self: bool,
        faction: Faction,
        range: Range,
    },
    SelectManual {
        allow_self: bool,
        faction: Faction,
        range: Range,
        selection_count: u32,
        up_to_selection_count: bool,
        empty_field_allowed: bool,
    },
}

impl ActionStep {
    pub fn description(&self) -> &'static str {
        match self {
            Self::SwapPosition => "Move",
            Self::PhysicalAttack { .. } => "Does a physical attack",
            Self::SelectSelf => "Selects the acting unit",
            Self::SelectAutomatic { .. } => "Automatically selects all eligible units",
            Self::SelectManual { .. } => "Select units manually",
        }
    }

    /// Whether this step chooses targets rather than acting on them.
    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            Self::SelectSelf | Self::SelectAutomatic { .. } | Self::SelectManual { .. }
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub name: String,
    pub description: String,
    pub steps: Vec<ActionStep>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: i32,
    pub strength: i32,
    pub toughness: i32,
    pub precision: i32,
    pub agility: i32,
    pub power: i32,
    pub defense: i32,
    pub aura: i32,
    pub willpower: i32,
}

/// A unit at one of its four ranks. `actions` holds action ids.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub rank: u8,
    pub name: String,
    pub sprite_path: String,
    pub stats: Stats,
    pub actions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub codename: String,
    pub icon_path: String,
    pub levels: [Level; 4],
}

/// A named collection of actions and units, edited as one document.
///
/// ```
/// use waypoint::dataset::{Action, ActionStep, DataSet};
///
/// let mut data_set = DataSet::new("Starter");
/// data_set.actions.push(Action {
///     id: "strike".into(),
///     name: "Strike".into(),
///     description: "A basic hit".into(),
///     steps: vec![ActionStep::PhysicalAttack { accuracy: 90, power: 10 }],
/// });
///
/// assert_eq!(data_set.action("strike").map(|a| a.name.as_str()), Some("Strike"));
/// assert!(data_set.check().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub units: Vec<Unit>,
}

impl DataSet {
    /// Create an empty dataset in the current format version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: DATA_SET_VERSION,
            name: name.into(),
            actions: Vec::new(),
            units: Vec::new(),
        }
    }

    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    pub fn unit(&self, codename: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.codename == codename)
    }

    /// Resolve a level's action ids, skipping ids that name no action.
    pub fn level_actions<'a>(&'a self, level: &'a Level) -> impl Iterator<Item = &'a Action> + 'a {
        level.actions.iter().filter_map(move |id| self.action(id))
    }
}
