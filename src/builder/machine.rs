//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::machine::{MachineConfig, StateMachine, Transition, Workflow};
use std::collections::HashSet;

/// Builder for constructing state machines with a fluent API.
///
/// Transition order is preserved: the first transition whose condition
/// holds is the one the machine selects.
pub struct StateMachineBuilder<W: Workflow> {
    initial: Option<W::State>,
    config: MachineConfig,
    transitions: Vec<Transition<W>>,
}

impl<W: Workflow> StateMachineBuilder<W> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            config: MachineConfig::default(),
            transitions: Vec::new(),
        }
    }

    /// Set the initial state. Defaults to `W::State::default()`.
    pub fn initial(mut self, state: W::State) -> Self {
        self.initial = Some(state);
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<W>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<W>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<W>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Build the state machine around `env`.
    ///
    /// Fails when no transitions were added or when two transitions share a
    /// name, since names identify the suspended transition in checkpoints.
    pub fn build(self, env: W::Env) -> Result<StateMachine<W>, BuildError> {
        if self.transitions.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = self
            .transitions
            .iter()
            .find(|t| !seen.insert(t.name().to_string()))
        {
            return Err(BuildError::DuplicateTransition(duplicate.name().to_string()));
        }

        let mut machine = match self.initial {
            Some(state) => StateMachine::with_state(env, state),
            None => StateMachine::new(env),
        }
        .with_config(self.config);

        for transition in self.transitions {
            machine.add_transition(transition);
        }

        Ok(machine)
    }
}

impl<W: Workflow> Default for StateMachineBuilder<W> {
    fn default() -> Self {
        Self::new()
    }
}
