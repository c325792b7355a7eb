//! Build errors for state machine and transition builders.

use thiserror::Error;

/// Errors that can occur when building state machines and transitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("Transition name is empty. Pass a name to TransitionBuilder::new(name)")]
    MissingName,

    #[error("Transition '{0}' has no condition and could never be selected. Call .condition(predicate)")]
    MissingCondition(String),

    #[error("Transition '{0}' has no handlers. Call .initial_action(handler) or .action(handler)")]
    NoHandlers(String),

    #[error("Transition '{0}' sets its initial action more than once")]
    DuplicateInitialAction(String),

    #[error("Transition '{transition}' registers a handler for {kind} more than once")]
    DuplicateAction { transition: String, kind: String },

    #[error("Transition '{transition}' is invalid ({} problems)", .problems.len())]
    Invalid {
        transition: String,
        problems: Vec<BuildError>,
    },

    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("Transition name '{0}' is used more than once")]
    DuplicateTransition(String),
}

impl BuildError {
    /// Flatten into the individual problems.
    pub fn problems(&self) -> Vec<&BuildError> {
        match self {
            Self::Invalid { problems, .. } => problems.iter().collect(),
            other => vec![other],
        }
    }
}
