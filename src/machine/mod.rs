//! Resumable state machine runtime.
//!
//! A [`StateMachine`] owns its workflow's environment, a list of
//! [`Transition`]s and the current state. Transitions suspend by returning a
//! request; the driver answers by passing a response to the next
//! [`StateMachine::run`] call.

mod config;
mod error;
#[allow(clippy::module_inception)]
mod machine;
mod transition;
mod workflow;

pub use config::{MachineConfig, DEFAULT_MAX_AUTO_STEPS};
pub use error::MachineError;
pub use machine::StateMachine;
pub use transition::{
    HandlerResult, InitialAction, Outcome, ResponseAction, ResponseKind, Transition,
    TransitionResult,
};
pub use workflow::Workflow;
