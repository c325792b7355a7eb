//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for declaring workflow
//! types and transitions with minimal boilerplate while maintaining type
//! safety.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use transition::TransitionBuilder;

use crate::machine::{Transition, TransitionResult, Workflow};

/// Start a transition whose initial action always asks `request`.
///
/// Register the response handlers on the returned builder.
///
/// # Example
///
/// ```
/// use waypoint::builder::prompt;
/// use waypoint::core::Request;
/// use waypoint::machine::{TransitionResult, Workflow};
/// use waypoint::{response_enum, state_enum};
/// use serde::{Deserialize, Serialize};
///
/// state_enum! {
///     #[derive(Default)]
///     enum Light {
///         #[default]
///         Off,
///         On,
///     }
/// }
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct Switch;
///
/// impl Request for Switch {
///     fn name(&self) -> &str {
///         "Switch"
///     }
/// }
///
/// #[derive(Debug)]
/// struct Flip;
///
/// response_enum! {
///     enum LightResponse => LightResponseKind {
///         Flip(Flip),
///     }
/// }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("broken")]
/// struct Broken;
///
/// struct Lamp;
///
/// impl Workflow for Lamp {
///     type State = Light;
///     type Request = Switch;
///     type Response = LightResponse;
///     type Env = ();
///     type Error = Broken;
/// }
///
/// let transition = prompt::<Lamp, _>("switch_on", |s| matches!(s, Light::Off), Switch)
///     .action(|_, _, _: Flip| Ok(TransitionResult::NewState(Light::On)))
///     .build()
///     .unwrap();
///
/// assert!(transition.has_initial_action());
/// ```
pub fn prompt<W, F>(name: impl Into<String>, condition: F, request: W::Request) -> TransitionBuilder<W>
where
    W: Workflow,
    F: Fn(&W::State) -> bool + Send + Sync + 'static,
{
    TransitionBuilder::<W>::new(name)
        .condition(condition)
        .initial_action(move |_, _| Ok(TransitionResult::Request(request.clone())))
}

/// Build a transition that completes without driver input.
///
/// `step` computes the next state from the current one and may touch the
/// environment, for example to release resources.
pub fn automatic<W, F, G>(
    name: impl Into<String>,
    condition: F,
    step: G,
) -> Result<Transition<W>, BuildError>
where
    W: Workflow,
    F: Fn(&W::State) -> bool + Send + Sync + 'static,
    G: Fn(&mut W::Env, &W::State) -> Result<W::State, W::Error> + Send + Sync + 'static,
{
    TransitionBuilder::<W>::new(name)
        .condition(condition)
        .initial_action(move |env, state| step(env, state).map(TransitionResult::NewState))
        .build()
}
