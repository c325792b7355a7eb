//! Waypoint: resumable, request-driven state machines
//!
//! A workflow is a set of transitions over a state type. Each transition
//! either produces a new state or suspends with a typed request; the driver
//! answers with a typed response on the next call to
//! [`StateMachine::run`](machine::StateMachine::run). Transitions that need
//! no input chain automatically within one call.
//!
//! # Core Concepts
//!
//! - **State**: type-safe state representation via the `State` trait
//! - **Requests and responses**: the `Request`, `Response` and `ResponseVariant` traits
//! - **Transitions**: guarded units of logic with an initial action and a
//!   response dispatch table
//! - **Checkpoints**: serializable snapshots of a suspended machine
//!
//! The [`editor`] module builds a dataset editor on top of these pieces.
//!
//! # Example
//!
//! ```rust
//! use waypoint::builder::{StateMachineBuilder, TransitionBuilder};
//! use waypoint::core::Request;
//! use waypoint::machine::{TransitionResult, Workflow};
//! use waypoint::{response_enum, state_enum};
//! use serde::{Deserialize, Serialize};
//!
//! state_enum! {
//!     #[derive(Default)]
//!     enum Counter {
//!         #[default]
//!         Idle,
//!         Counting(u32),
//!     }
//! }
//!
//! #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
//! struct AskStart;
//!
//! impl Request for AskStart {
//!     fn name(&self) -> &str {
//!         "AskStart"
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct Start(u32);
//!
//! response_enum! {
//!     enum CounterResponse => CounterResponseKind {
//!         Start(Start),
//!     }
//! }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("refused")]
//! struct Refused;
//!
//! struct CounterFlow;
//!
//! impl Workflow for CounterFlow {
//!     type State = Counter;
//!     type Request = AskStart;
//!     type Response = CounterResponse;
//!     type Env = ();
//!     type Error = Refused;
//! }
//!
//! let mut machine = StateMachineBuilder::<CounterFlow>::new()
//!     .transition(
//!         TransitionBuilder::<CounterFlow>::new("start")
//!             .condition(|s| matches!(s, Counter::Idle))
//!             .initial_action(|_, _| Ok(TransitionResult::Request(AskStart)))
//!             .action(|_, _, Start(n): Start| Ok(TransitionResult::NewState(Counter::Counting(n)))),
//!     )
//!     .unwrap()
//!     .build(())
//!     .unwrap();
//!
//! machine.run(None).unwrap();
//! assert_eq!(machine.current_request(), Some(&AskStart));
//!
//! machine.run(Some(Start(3).into())).unwrap();
//! assert_eq!(machine.current_state(), &Counter::Counting(3));
//! assert!(machine.current_request().is_none());
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod dataset;
pub mod editor;
pub mod machine;

// Re-export commonly used types
pub use crate::builder::{BuildError, StateMachineBuilder, TransitionBuilder};
pub use crate::checkpoint::{Checkpoint, CheckpointError};
pub use crate::core::{Guard, Request, Response, ResponseVariant, State, StateHistory, StateTransition};
pub use crate::machine::{MachineConfig, MachineError, StateMachine, Transition, TransitionResult, Workflow};
