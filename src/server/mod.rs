//! Responses and the transport adapter that serves a dispatcher over TCP.
//!
//! [`Response`] is what handlers write into. [`HttpServer`] reads one
//! request per connection, hands it to the dispatcher, and writes back
//! whatever the handler produced.

mod config;
mod error;
mod http_server;
mod response;

// Re-export public items
pub use config::ServerConfig;
pub use error::{Error, ResponseError, TypeHintError};
pub use http_server::HttpServer;
pub use response::{Response, StatusCode, HTML_CONTENT_TYPE, JSON_CONTENT_TYPE, TEXT_CONTENT_TYPE};
