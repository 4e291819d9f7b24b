//! Route definitions and the per-call context derived from them.
//!
//! A [`Route`] is built once during registration and never changes after the
//! registry is handed to the dispatcher. Every call gets its own
//! [`RouteContext`], a working copy holding the resolved parameter values,
//! the attributes and the body, so concurrent calls against the same route
//! never see each other's state.
//!
//! ```
//! use microroute_rs::router::RouteRegistry;
//!
//! let mut routes = RouteRegistry::new();
//! routes
//!     .register(r"/beneficiaries/(\d+)", "GET")
//!     .unwrap()
//!     .bind("Beneficiaries", "get")
//!     .declare_param(0, "id", None);
//!
//! let route = routes.get(r"GET:/beneficiaries/(\d+)").unwrap();
//! assert_eq!(route.param_names(), vec!["id"]);
//! ```

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use regex::Regex;
use serde_json::Value;

use crate::parser::{parse_attributes, AttributeValue, Attributes, Method};
use crate::router::error::LookupError;

/// The resource type and method a route calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerRef {
    /// Name the resource type is registered under.
    pub resource: String,
    /// Name of the method to call on it.
    pub method: String,
}

/// A named placeholder filled from a capture group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSlot {
    /// Index of the capture group, starting at 0.
    pub order: usize,
    pub name: String,
    pub value: Option<String>,
}

/// One registered binding of a method and pattern to a handler.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: String,
    method: Method,
    signature: String,
    matcher: Option<Regex>,
    handler: Option<HandlerRef>,
    params: BTreeMap<usize, ParamSlot>,
}

impl Route {
    /// Create an unbound route.
    ///
    /// The signature is compiled as an anchored regex here; a signature that
    /// does not compile still serves exact lookups.
    pub fn new(pattern: impl Into<String>, method: Method) -> Self {
        let pattern = pattern.into();
        let signature = signature(method, &pattern);

        let matcher = match Regex::new(&format!("^{signature}$")) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!("Route {signature} is not a valid pattern, only exact calls will reach it: {e}");
                None
            }
        };

        Self {
            pattern,
            method,
            signature,
            matcher,
            handler: None,
            params: BTreeMap::new(),
        }
    }

    /// Set the resource type and method that serve this route.
    ///
    /// Nothing is checked here; a bad binding surfaces on dispatch.
    pub fn bind(&mut self, resource: impl Into<String>, method: impl Into<String>) -> &mut Self {
        self.handler = Some(HandlerRef {
            resource: resource.into(),
            method: method.into(),
        });
        self
    }

    /// Declare the parameter filled by capture group `order`.
    ///
    /// A slot already declared at `order` is replaced. Names are unique: a
    /// slot elsewhere with the same name is dropped.
    pub fn declare_param(&mut self, order: usize, name: impl Into<String>, default: Option<&str>) -> &mut Self {
        let name = name.into();

        let taken = self
            .params
            .values()
            .find(|slot| slot.name == name && slot.order != order)
            .map(|slot| slot.order);
        if let Some(taken) = taken {
            debug!("Route {}: parameter {name} moves from group {taken} to {order}", self.signature);
            self.params.remove(&taken);
        }

        self.params.insert(
            order,
            ParamSlot {
                order,
                name,
                value: default.map(str::to_string),
            },
        );
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// `METHOD:pattern`, the registry key.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn handler(&self) -> Option<&HandlerRef> {
        self.handler.as_ref()
    }

    /// Declared slots in group order.
    pub fn params(&self) -> impl Iterator<Item = &ParamSlot> {
        self.params.values()
    }

    /// Names of all declared parameters, in group order.
    pub fn param_names(&self) -> Vec<&str> {
        self.params.values().map(|slot| slot.name.as_str()).collect()
    }

    /// Match `signature` against this route's pattern.
    ///
    /// Returns the capture groups in order, `None` for a group that did not
    /// take part in the match.
    pub(crate) fn captures(&self, signature: &str) -> Option<Vec<Option<String>>> {
        let captures = self.matcher.as_ref()?.captures(signature)?;
        Some(
            captures
                .iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_string()))
                .collect(),
        )
    }

    /// Start a call against this route.
    ///
    /// `body` is the raw payload; anything that is not JSON leaves the body
    /// absent.
    pub fn new_context(&self, body: &[u8]) -> RouteContext {
        let body = if body.is_empty() {
            None
        } else {
            serde_json::from_slice(body).ok()
        };

        RouteContext {
            signature: self.signature.clone(),
            method: self.method,
            handler: self.handler.clone(),
            params: self.params.clone(),
            attributes: Attributes::new(),
            body,
        }
    }
}

/// Build the signature for a method and a pattern or path.
pub fn signature(method: Method, pattern: &str) -> String {
    format!("{method}:{pattern}")
}

/// Per-call state of a resolved route.
///
/// Resources receive one through `Resource::set_route` and read parameters,
/// attributes and the body from it.
#[derive(Debug, Clone)]
pub struct RouteContext {
    signature: String,
    method: Method,
    handler: Option<HandlerRef>,
    params: BTreeMap<usize, ParamSlot>,
    attributes: Attributes,
    body: Option<Value>,
}

impl Default for RouteContext {
    fn default() -> Self {
        Self {
            signature: String::new(),
            method: Method::GET,
            handler: None,
            params: BTreeMap::new(),
            attributes: Attributes::new(),
            body: None,
        }
    }
}

impl RouteContext {
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn handler(&self) -> Option<&HandlerRef> {
        self.handler.as_ref()
    }

    /// Store capture group values into the slots with matching order.
    ///
    /// Groups without a slot are ignored; slots without a captured group
    /// keep their value.
    pub fn set_param_values(&mut self, captures: Vec<Option<String>>) -> &mut Self {
        for (order, value) in captures.into_iter().enumerate() {
            if let (Some(slot), Some(value)) = (self.params.get_mut(&order), value) {
                slot.value = Some(value);
            }
        }
        self
    }

    /// Names of all declared parameters, in group order.
    pub fn param_names(&self) -> Vec<&str> {
        self.params.values().map(|slot| slot.name.as_str()).collect()
    }

    /// Value of a parameter.
    ///
    /// # Errors
    ///
    /// [`LookupError::ParamNotFound`] when no slot has this name or the slot
    /// has no value.
    pub fn param(&self, name: &str) -> Result<&str, LookupError> {
        self.params
            .values()
            .find(|slot| slot.name == name)
            .and_then(|slot| slot.value.as_deref())
            .ok_or_else(|| LookupError::ParamNotFound {
                name: name.to_string(),
                known: self.param_names().into_iter().map(str::to_string).collect(),
            })
    }

    /// Set one attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> &mut Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Parse an attribute string and store every attribute from it.
    pub fn set_attributes_from_str(&mut self, values: &str) -> &mut Self {
        self.attributes.extend(parse_attributes(values));
        self
    }

    /// Store submitted fields as they are, without the duplicate handling of
    /// attribute strings.
    pub fn merge_fields(&mut self, fields: &HashMap<String, String>) -> &mut Self {
        for (name, value) in fields {
            self.attributes.insert(name.clone(), AttributeValue::Scalar(value.clone()));
        }
        self
    }

    /// All attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Value of a single-valued attribute.
    ///
    /// # Errors
    ///
    /// [`LookupError::AttributeNotFound`] when the attribute is missing,
    /// [`LookupError::AttributeNotScalar`] when it holds a list.
    pub fn attribute(&self, name: &str) -> Result<&str, LookupError> {
        match self.attributes.get(name) {
            Some(AttributeValue::Scalar(value)) => Ok(value),
            Some(AttributeValue::List(_)) => Err(LookupError::AttributeNotScalar(name.to_string())),
            None => {
                let mut known: Vec<String> = self.attributes.keys().cloned().collect();
                known.sort();
                Err(LookupError::AttributeNotFound {
                    name: name.to_string(),
                    known,
                })
            }
        }
    }

    /// Value of a single-valued attribute, if there is one.
    pub fn attribute_opt(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(AttributeValue::as_str)
    }

    /// Every value collected under a repeated key, e.g. `tag[]`.
    pub fn attribute_list(&self, name: &str) -> Option<&[String]> {
        self.attributes.get(name).and_then(AttributeValue::as_list)
    }

    /// The parsed JSON body, if the call had one.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}
