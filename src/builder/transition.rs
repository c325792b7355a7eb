//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Guard, Response, ResponseVariant};
use crate::machine::{
    InitialAction, MachineError, Outcome, ResponseAction, ResponseKind, Transition, Workflow,
};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing transitions with a fluent API.
///
/// Handlers receive the machine's environment and the current state and
/// return a domain `Result`; the builder wraps domain errors into
/// [`MachineError::Action`] tagged with the transition name.
///
/// `build` rejects transitions that could never run correctly instead of
/// producing them: a missing condition, no handlers at all, or a handler
/// registered twice for the same response kind.
pub struct TransitionBuilder<W: Workflow> {
    name: String,
    guard: Option<Guard<W::State>>,
    initial: Option<InitialAction<W>>,
    actions: HashMap<ResponseKind<W>, ResponseAction<W>>,
    duplicates: Vec<BuildError>,
}

impl<W: Workflow> TransitionBuilder<W> {
    /// Create a new transition builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guard: None,
            initial: None,
            actions: HashMap::new(),
            duplicates: Vec::new(),
        }
    }

    /// Add a selection condition. All conditions must hold.
    pub fn condition<F>(self, predicate: F) -> Self
    where
        F: Fn(&W::State) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Add a prebuilt guard. All guards must hold.
    pub fn guard(mut self, guard: Guard<W::State>) -> Self {
        self.guard = Some(match self.guard.take() {
            Some(existing) => existing.and(guard),
            None => guard,
        });
        self
    }

    /// Set the handler used when the transition starts without a response.
    pub fn initial_action<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut W::Env, &W::State) -> Result<Outcome<W>, W::Error> + Send + Sync + 'static,
    {
        if self.initial.is_some() {
            self.duplicates
                .push(BuildError::DuplicateInitialAction(self.name.clone()));
        }

        let name = self.name.clone();
        self.initial = Some(Box::new(move |env: &mut W::Env, state: &W::State| {
            handler(env, state).map_err(|source| MachineError::Action {
                transition: name.clone(),
                source,
            })
        }));
        self
    }

    /// Register the handler for responses carrying payload `P`.
    ///
    /// ```ignore
    /// builder.action(|env, state, select: SelectResponse| { ... })
    /// ```
    pub fn action<P, F>(mut self, handler: F) -> Self
    where
        P: ResponseVariant<W::Response> + 'static,
        F: Fn(&mut W::Env, &W::State, P) -> Result<Outcome<W>, W::Error> + Send + Sync + 'static,
    {
        let kind = P::KIND;
        let name = self.name.clone();
        let action: ResponseAction<W> = Box::new(
            move |env: &mut W::Env, state: &W::State, response: W::Response| {
                let received = response.kind();
                let payload =
                    P::extract(response).ok_or_else(|| MachineError::InvalidResponse {
                        transition: name.clone(),
                        received: format!("{received:?}"),
                    })?;
                handler(env, state, payload).map_err(|source| MachineError::Action {
                    transition: name.clone(),
                    source,
                })
            },
        );

        if self.actions.insert(kind, action).is_some() {
            self.duplicates.push(BuildError::DuplicateAction {
                transition: self.name.clone(),
                kind: format!("{kind:?}"),
            });
        }
        self
    }

    /// Build the transition, reporting every defect at once.
    pub fn build(self) -> Result<Transition<W>, BuildError> {
        let mut checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = vec![
            require(!self.name.trim().is_empty(), || BuildError::MissingName),
            require(self.guard.is_some(), || {
                BuildError::MissingCondition(self.name.clone())
            }),
            require(self.initial.is_some() || !self.actions.is_empty(), || {
                BuildError::NoHandlers(self.name.clone())
            }),
        ];
        checks.extend(
            self.duplicates
                .iter()
                .map(|duplicate| Validation::fail(duplicate.clone())),
        );

        if let Validation::Failure(errors) = Validation::all_vec(checks) {
            let mut problems: Vec<BuildError> = errors.iter().cloned().collect();
            return Err(if problems.len() == 1 {
                problems.remove(0)
            } else {
                BuildError::Invalid {
                    transition: self.name,
                    problems,
                }
            });
        }

        let guard = self
            .guard
            .ok_or_else(|| BuildError::MissingCondition(self.name.clone()))?;

        Ok(Transition {
            name: self.name,
            guard,
            initial: self.initial,
            actions: self.actions,
        })
    }
}

fn require(
    holds: bool,
    error: impl FnOnce() -> BuildError,
) -> Validation<(), NonEmptyVec<BuildError>> {
    if holds {
        Validation::success(())
    } else {
        Validation::fail(error())
    }
}
