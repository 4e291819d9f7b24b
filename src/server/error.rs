//! Error types for responses and the transport adapter.

use thiserror::Error;

use crate::parser::Error as ParserError;
use crate::router::Error as RouterError;

/// Errors that can occur while serving connections.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The router failed to serve a resolved route.
    #[error("Routing error: {0}")]
    Router(#[from] RouterError),
}

/// A value did not have the shape a response mode accepts.
#[derive(Debug, Error)]
#[error("expected {expected}, got {found}")]
pub struct TypeHintError {
    /// What the response mode accepts.
    pub expected: &'static str,
    /// What was actually given.
    pub found: String,
}

/// Errors raised by the response-sending operations.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The value could not be sent because it has the wrong type.
    #[error("route can not send response because the response has a wrong type")]
    WrongType(#[source] TypeHintError),
}
