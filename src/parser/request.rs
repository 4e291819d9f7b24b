//! Raw HTTP request parsing for the transport adapter.

use std::collections::HashMap;

use crate::parser::error::Error;
use crate::parser::method::Method;

/// HTTP versions the adapter accepts on the request line.
const VERSIONS: [&str; 4] = ["HTTP/1.0", "HTTP/1.1", "HTTP/2", "HTTP/2.0"];

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// An HTTP request as read off the wire.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The method token, verbatim. The router decides whether it is known.
    pub method: String,
    /// The request path, without the query string
    pub path: String,
    /// The raw query string (everything after `?`), not decoded
    pub query: String,
    /// The HTTP version token
    pub version: String,
    /// The HTTP headers
    pub headers: HashMap<String, String>,
    /// The request body
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Create a request for `target`, splitting off its query string.
    pub fn new(method: impl Into<String>, target: &str, version: impl Into<String>, headers: HashMap<String, String>) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));

        Self {
            method: method.into(),
            path: path.to_string(),
            query: query.to_string(),
            version: version.into(),
            headers,
            body: Vec::new(),
        }
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Get a header value, ignoring the case of the name.
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case(name).then_some(v))
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// Whether the body is form-urlencoded.
    pub fn is_form(&self) -> bool {
        self.get_header("Content-Type")
            .is_some_and(|content_type| content_type.starts_with(FORM_CONTENT_TYPE))
    }

    /// Submitted form fields.
    ///
    /// Only write methods carry fields, and only when the body is
    /// form-urlencoded. Repeated fields keep the last value.
    pub fn fields(&self) -> HashMap<String, String> {
        let is_write = self.method.parse::<Method>().is_ok_and(|m| m.is_write());
        if !is_write || !self.is_form() {
            return HashMap::new();
        }

        url::form_urlencoded::parse(&self.body)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

/// Parse an HTTP request from a byte slice.
///
/// # Arguments
///
/// * `input` - A byte slice containing the HTTP request to parse
///
/// # Returns
///
/// The parsed HTTP request, or an error if the request is invalid
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    if input.is_empty() {
        return Err(Error::EmptyRequest);
    }

    // The head is text; the body stays raw bytes
    let (head, body) = split_head(input);
    let head = std::str::from_utf8(head)
        .map_err(|_| Error::NonUtf8Head)?;

    let mut lines = head.lines();
    let request_line = lines.next().ok_or(Error::EmptyRequest)?;

    let parts: Vec<&str> = request_line.split_whitespace().collect();
    let [method, target, version] = parts[..] else {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    };

    if !target.starts_with('/') {
        return Err(Error::InvalidPath(target.to_string()));
    }
    if !VERSIONS.contains(&version) {
        return Err(Error::InvalidVersion(version.to_string()));
    }

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::InvalidHeaderFormat(line.to_string()))?;
        headers.insert(name.trim().to_string(), value.trim().to_string());
    }

    let request = HttpRequest::new(method, target, version, headers);
    if version == "HTTP/1.1" && !request.has_header("Host") {
        return Err(Error::MissingHeader("Host"));
    }

    // Content-Length caps the body; a short read keeps what arrived
    let length = request
        .get_header("Content-Length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(body.len())
        .min(body.len());

    Ok(request.with_body(&body[..length]))
}

/// Split raw bytes at the blank line that ends the head.
fn split_head(input: &[u8]) -> (&[u8], &[u8]) {
    for separator in [&b"\r\n\r\n"[..], &b"\n\n"[..]] {
        if let Some(pos) = input.windows(separator.len()).position(|w| w == separator) {
            return (&input[..pos], &input[pos + separator.len()..]);
        }
    }
    (input, &[])
}
