//! Error types for registration, lookups and dispatch.

use std::error::Error as StdError;

use thiserror::Error;

use crate::parser::Error as ParserError;
use crate::server::ResponseError;

/// Errors returned by the router to its caller.
#[derive(Debug, Error)]
pub enum Error {
    /// A route could not be registered.
    #[error("route {pattern} can not be registered")]
    Registration {
        /// The pattern that was being registered.
        pattern: String,
        #[source]
        source: ParserError,
    },

    /// A resolved route could not be called.
    #[error("registered route {signature} can not be called")]
    Dispatch {
        /// Signature of the resolved route.
        signature: String,
        #[source]
        source: DispatchError,
    },
}

impl Error {
    /// The dispatch failure, if this is one.
    pub fn dispatch_error(&self) -> Option<&DispatchError> {
        match self {
            Error::Dispatch { source, .. } => Some(source),
            Error::Registration { .. } => None,
        }
    }

    /// Messages of this error and every error that caused it, outermost first.
    pub fn causes(&self) -> Vec<String> {
        std::iter::successors(Some(self as &dyn StdError), |&e| e.source())
            .map(|e| e.to_string())
            .collect()
    }
}

/// Why a resolved route could not be served.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No resource type is registered under the bound name.
    #[error("resource {0:?} serving the route does not exist")]
    ClassNotFound(String),

    /// The bound type exists but does not implement `Resource`.
    #[error("type {0:?} serving the route is not a resource")]
    WrongType(String),

    /// The resource does not list the bound method.
    #[error("method {method:?} serving the route does not exist in {resource:?}")]
    MethodNotFound {
        resource: String,
        method: String,
    },

    /// The handler method ran and failed.
    #[error("handler failed")]
    Handler(#[source] HandlerError),
}

/// Failed reads of a route context.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("route parameter {name:?} does not exist, known: {known:?}")]
    ParamNotFound { name: String, known: Vec<String> },

    #[error("route attribute {name:?} does not exist, known: {known:?}")]
    AttributeNotFound { name: String, known: Vec<String> },

    #[error("route attribute {0:?} holds a list, not a single value")]
    AttributeNotScalar(String),
}

/// Errors a resource method can return.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Response(#[from] ResponseError),

    /// `invoke` was called with a name the resource does not handle.
    #[error("resource has no method {0:?}")]
    UnknownMethod(String),

    /// Application-specific failure.
    #[error("{0}")]
    Failed(String),
}

/// Result type for resource methods.
pub type HandlerResult = Result<(), HandlerError>;
