//! The type family a state machine is instantiated over.

use crate::core::{Request, Response, State};

/// Groups the types one workflow is made of.
///
/// `Env` holds everything handlers need from the outside world: stores,
/// configuration, clocks. The machine owns it and lends it to each handler,
/// so no handler reaches for global state.
pub trait Workflow: 'static {
    type State: State;
    type Request: Request;
    type Response: Response;
    type Env;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Whether `response` is a valid answer to `request`.
    ///
    /// Checked before dispatch while a request is outstanding. The default
    /// accepts any response the active transition registered.
    fn answers(request: &Self::Request, response: &Self::Response) -> bool {
        let _ = (request, response);
        true
    }
}
