//! Typed requests and responses exchanged with the driver.
//!
//! A request describes the input a suspended transition needs. A response
//! is the driver's answer. Responses carry an explicit tag (`Kind`) so that
//! transitions dispatch on a closed, hashable discriminant instead of
//! inspecting types at runtime.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Input a suspended transition is waiting for.
pub trait Request:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Variant name for display/logging.
    fn name(&self) -> &str;
}

/// Driver-supplied answer to an outstanding request.
///
/// Usually generated with [`response_enum!`](crate::response_enum).
pub trait Response: Debug + Send + Sync + 'static {
    /// Explicit discriminant used as the dispatch key.
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;
}

/// A payload type that is carried by exactly one response variant.
///
/// Transition handlers are registered per payload type; the machine routes
/// a response to the handler registered for `KIND` and hands it the
/// extracted payload.
pub trait ResponseVariant<R: Response>: Sized {
    const KIND: R::Kind;

    /// Unwrap the payload, `None` when `response` is another variant.
    fn extract(response: R) -> Option<Self>;
}
