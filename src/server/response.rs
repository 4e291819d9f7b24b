//! Responses and the operations handlers use to fill them.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::server::error::{ResponseError, TypeHintError};

/// Content type written by [`Response::send_json`].
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
/// Content type written by [`Response::send_text`].
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
/// Content type written by [`Response::send_html`].
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

const JSON_INDENT: &[u8] = b"    ";

/// A numeric HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const CREATED: StatusCode = StatusCode(201);
    pub const NO_CONTENT: StatusCode = StatusCode(204);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
    pub const SERVICE_UNAVAILABLE: StatusCode = StatusCode(503);

    /// Wrap any numeric code.
    pub const fn new(code: u16) -> Self {
        StatusCode(code)
    }

    /// The numeric code.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Get the reason phrase for this status code, empty when unknown.
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            _ => "",
        }
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::OK
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

/// Represents an HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// The HTTP headers, without `Content-Length`
    pub headers: HashMap<String, String>,
    /// The response body
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}

impl Response {
    /// Create a new response with the given status code.
    pub fn new(status: StatusCode) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Server".to_string(), "microroute-rs".to_string());

        Self {
            status,
            headers,
            body: Vec::new(),
        }
    }

    /// Response for a call that matched no route: 404, no body.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the content type.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// Set the response body with a string.
    pub fn with_body_string(mut self, body: impl Into<String>) -> Self {
        self.body = body.into().into_bytes();
        self
    }

    /// Get a header value, ignoring the case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case(name).then_some(v.as_str()))
    }

    /// The content type, if one was set.
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// Send a value as JSON.
    ///
    /// The status and content type are set before the value is inspected, so
    /// they stick even when the value is rejected. `null` leaves the body
    /// empty; a scalar is sent as a one-element array; arrays and maps are
    /// sent as they are. A value that does not serialize to JSON is rejected
    /// and the body is left empty.
    ///
    /// Non-finite floats have no JSON form and are written as `null`, so a
    /// bare `f64::NAN` sends headers only and `[f64::NAN]` sends `[null]`.
    ///
    /// # Errors
    ///
    /// [`ResponseError::WrongType`] when `value` fails to serialize.
    pub fn send_json<T: Serialize + ?Sized>(&mut self, value: &T, status: StatusCode) -> Result<(), ResponseError> {
        self.set_head(status, JSON_CONTENT_TYPE);

        let value = serde_json::to_value(value).map_err(wrong_type)?;
        let value = match value {
            Value::Null => return Ok(()),
            Value::Array(_) | Value::Object(_) => value,
            scalar => Value::Array(vec![scalar]),
        };

        let mut body = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut body, PrettyFormatter::with_indent(JSON_INDENT));
        value.serialize(&mut serializer).map_err(wrong_type)?;
        self.body = body;

        Ok(())
    }

    /// Send a string verbatim as plain text.
    pub fn send_text(&mut self, value: impl Into<String>, status: StatusCode) {
        self.set_head(status, TEXT_CONTENT_TYPE);
        self.body = value.into().into_bytes();
    }

    /// Send a string verbatim as HTML.
    pub fn send_html(&mut self, value: impl Into<String>, status: StatusCode) {
        self.set_head(status, HTML_CONTENT_TYPE);
        self.body = value.into().into_bytes();
    }

    fn set_head(&mut self, status: StatusCode, content_type: &str) {
        self.status = status;
        self.headers.insert("Content-Type".to_string(), content_type.to_string());
        self.body.clear();
    }

    /// Convert the response to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        let status_line = format!("HTTP/1.1 {}\r\n", self.status);
        bytes.extend_from_slice(status_line.as_bytes());

        for (name, value) in &self.headers {
            let header_line = format!("{name}: {value}\r\n");
            bytes.extend_from_slice(header_line.as_bytes());
        }
        let length_line = format!("Content-Length: {}\r\n\r\n", self.body.len());
        bytes.extend_from_slice(length_line.as_bytes());

        bytes.extend_from_slice(&self.body);

        bytes
    }
}

fn wrong_type(source: serde_json::Error) -> ResponseError {
    ResponseError::WrongType(TypeHintError {
        expected: "a scalar, a list or a map",
        found: source.to_string(),
    })
}
