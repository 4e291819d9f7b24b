//! Query-string style attribute parsing.
//!
//! Attributes arrive as a flat `key=value&key=value` string. Keys and values
//! are URL-decoded (`+` decodes to a space) and a key without `=` gets an
//! empty value.
//!
//! # Repeated keys
//!
//! Repeating a key does not turn it into a list. The plain key always holds
//! the most recent value, and a second key with a `[]` suffix collects every
//! value seen for it, starting with the first one. The suffixed key only
//! exists when a duplicate occurred:
//!
//! ```
//! use microroute_rs::parser::{parse_attributes, AttributeValue};
//!
//! let attributes = parse_attributes("tag=a&tag=b&page=2");
//! assert_eq!(attributes["tag"], AttributeValue::from("b"));
//! assert_eq!(attributes["tag[]"], AttributeValue::List(vec!["a".into(), "b".into()]));
//! assert!(!attributes.contains_key("page[]"));
//! ```

use std::collections::HashMap;

use serde::Serialize;

/// Suffix of the synthesized key that collects repeated values.
pub const LIST_SUFFIX: &str = "[]";

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A plain value.
    Scalar(String),
    /// Every value seen for a repeated key, in input order.
    List(Vec<String>),
}

impl AttributeValue {
    /// The value as a string, if it is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Scalar(value) => Some(value),
            AttributeValue::List(_) => None,
        }
    }

    /// The collected values, if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttributeValue::Scalar(_) => None,
            AttributeValue::List(values) => Some(values),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Scalar(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Scalar(value)
    }
}

/// Attributes by name.
pub type Attributes = HashMap<String, AttributeValue>;

/// Parse an `&`-joined attribute string.
///
/// # Arguments
///
/// * `input` - The raw attribute string, without a leading `?`
///
/// # Returns
///
/// The decoded attributes; an empty input gives an empty map
pub fn parse_attributes(input: &str) -> Attributes {
    let mut attributes = Attributes::new();
    if input.is_empty() {
        return attributes;
    }

    for (name, value) in url::form_urlencoded::parse(input.as_bytes()) {
        let name = name.into_owned();
        let value = value.into_owned();

        let previous = attributes.insert(name.clone(), AttributeValue::Scalar(value.clone()));
        let Some(AttributeValue::Scalar(previous)) = previous else {
            continue;
        };

        let list_key = format!("{name}{LIST_SUFFIX}");
        match attributes.get_mut(&list_key) {
            Some(AttributeValue::List(history)) => history.push(value),
            _ => {
                attributes.insert(list_key, AttributeValue::List(vec![previous, value]));
            }
        }
    }

    attributes
}
