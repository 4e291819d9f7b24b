use thiserror::Error;

/// Failures to read a method name or a raw request.
#[derive(Debug, Error)]
pub enum Error {
    /// Not one of the routable methods.
    #[error("method {0:?} is not one of GET, POST, PUT, DELETE, PATCH")]
    InvalidMethod(String),

    #[error("request target {0:?} is not an absolute path")]
    InvalidPath(String),

    #[error("request line {0:?} is not `METHOD TARGET VERSION`")]
    MalformedRequestLine(String),

    #[error("request head is not valid UTF-8")]
    NonUtf8Head,

    #[error("unsupported protocol version {0:?}")]
    InvalidVersion(String),

    /// A header the protocol version makes mandatory is absent.
    #[error("{0} header is required")]
    MissingHeader(&'static str),

    #[error("header line {0:?} has no `:` separator")]
    InvalidHeaderFormat(String),

    #[error("empty request")]
    EmptyRequest,
}
