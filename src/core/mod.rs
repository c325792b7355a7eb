//! Core state machine types.
//!
//! This module contains the data side of the machine:
//! - State definitions via the `State` trait
//! - Typed requests and responses via `Request`, `Response` and `ResponseVariant`
//! - Guard predicates for transition selection
//! - History of completed transitions
//!
//! Nothing in this module performs I/O.

mod guard;
mod history;
mod interaction;
mod state;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use interaction::{Request, Response, ResponseVariant};
pub use state::State;
