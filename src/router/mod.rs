//! Route registration, matching and dispatch.
//!
//! Routes are registered into a [`RouteRegistry`] and handler types into a
//! [`ResourceRegistry`]. Both are then moved into a [`Dispatcher`], which
//! serves calls without further mutation.

mod dispatcher;
mod error;
mod registry;
mod resource;
mod route;

// Re-export public items
pub use dispatcher::{Call, Dispatcher, Outcome};
pub use error::{DispatchError, Error, HandlerError, HandlerResult, LookupError};
pub use registry::{RouteMatch, RouteRegistry};
pub use resource::{Resource, ResourceRegistry};
pub use route::{signature, HandlerRef, ParamSlot, Route, RouteContext};
