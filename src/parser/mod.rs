//! Parsing of methods, attribute strings and raw HTTP requests.

mod attributes;
mod error;
mod method;
mod request;
mod tests;

// Re-export public items
pub use attributes::{parse_attributes, AttributeValue, Attributes, LIST_SUFFIX};
pub use error::Error;
pub use method::Method;
pub use request::{parse_request, HttpRequest};
