//! Transitions: named, conditionally selectable units of workflow logic.

use crate::core::{Guard, Response};
use crate::machine::error::MachineError;
use crate::machine::workflow::Workflow;
use std::collections::HashMap;
use std::fmt;

/// Result of invoking a transition handler.
///
/// Either the transition finished with a new state, or it needs input and
/// suspends with a request. Never both.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionResult<S, Q> {
    /// Replace the current state; the transition is finished.
    NewState(S),

    /// Keep the current state and wait for the driver to answer.
    Request(Q),
}

impl<S, Q> TransitionResult<S, Q> {
    pub fn is_request(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

/// `TransitionResult` specialised to a workflow.
pub type Outcome<W> = TransitionResult<<W as Workflow>::State, <W as Workflow>::Request>;

/// What a stored handler returns.
pub type HandlerResult<W> = Result<Outcome<W>, MachineError<<W as Workflow>::Error>>;

/// Handler invoked when a transition starts without a response.
pub type InitialAction<W> = Box<
    dyn Fn(&mut <W as Workflow>::Env, &<W as Workflow>::State) -> HandlerResult<W> + Send + Sync,
>;

/// Handler invoked with a response of one registered kind.
pub type ResponseAction<W> = Box<
    dyn Fn(
            &mut <W as Workflow>::Env,
            &<W as Workflow>::State,
            <W as Workflow>::Response,
        ) -> HandlerResult<W>
        + Send
        + Sync,
>;

/// Key of a transition's dispatch table.
pub type ResponseKind<W> = <<W as Workflow>::Response as Response>::Kind;

/// A named unit of workflow logic.
///
/// Built with [`TransitionBuilder`](crate::builder::TransitionBuilder) and
/// immutable afterwards. The machine selects it when its guard holds for
/// the current state, then drives it through its initial action and its
/// response dispatch table until it yields a new state.
pub struct Transition<W: Workflow> {
    pub(crate) name: String,
    pub(crate) guard: Guard<W::State>,
    pub(crate) initial: Option<InitialAction<W>>,
    pub(crate) actions: HashMap<ResponseKind<W>, ResponseAction<W>>,
}

impl<W: Workflow> Transition<W> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if this transition is selectable from `state` (pure).
    pub fn is_applicable(&self, state: &W::State) -> bool {
        self.guard.check(state)
    }

    pub fn has_initial_action(&self) -> bool {
        self.initial.is_some()
    }

    /// Check if a response of `kind` has a registered handler.
    pub fn accepts(&self, kind: ResponseKind<W>) -> bool {
        self.actions.contains_key(&kind)
    }

    /// Registered response kinds, in no particular order.
    pub fn accepted_kinds(&self) -> Vec<ResponseKind<W>> {
        self.actions.keys().copied().collect()
    }

    /// Run the initial action.
    pub(crate) fn start(&self, env: &mut W::Env, state: &W::State) -> HandlerResult<W> {
        match &self.initial {
            Some(action) => action(env, state),
            None => Err(MachineError::InvalidResponse {
                transition: self.name.clone(),
                received: "no response".to_string(),
            }),
        }
    }

    /// Dispatch `response` to the handler registered for its kind.
    pub(crate) fn respond(
        &self,
        env: &mut W::Env,
        state: &W::State,
        response: W::Response,
    ) -> HandlerResult<W> {
        let kind = response.kind();
        match self.actions.get(&kind) {
            Some(action) => action(env, state, response),
            None => Err(MachineError::InvalidResponse {
                transition: self.name.clone(),
                received: format!("{kind:?}"),
            }),
        }
    }
}

impl<W: Workflow> fmt::Debug for Transition<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("name", &self.name)
            .field("initial", &self.initial.is_some())
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}
