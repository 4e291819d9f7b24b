//! Handler types and the factory table the dispatcher builds them from.
//!
//! Routes name their handler by string. The [`ResourceRegistry`] maps those
//! names to constructors; a fresh instance is built for every call. Types
//! that should serve routes implement [`Resource`]:
//!
//! ```
//! use microroute_rs::router::{HandlerError, HandlerResult, Resource, RouteContext};
//! use microroute_rs::server::{Response, StatusCode};
//!
//! #[derive(Default)]
//! struct Beneficiaries {
//!     route: RouteContext,
//! }
//!
//! impl Resource for Beneficiaries {
//!     fn set_route(&mut self, route: RouteContext) {
//!         self.route = route;
//!     }
//!
//!     fn methods(&self) -> &[&str] {
//!         &["get"]
//!     }
//!
//!     fn invoke(&mut self, method: &str, response: &mut Response) -> HandlerResult {
//!         match method {
//!             "get" => Ok(response.send_json(&[self.route.param("id")?], StatusCode::OK)?),
//!             other => Err(HandlerError::UnknownMethod(other.to_string())),
//!         }
//!     }
//! }
//! ```

use std::any::Any;
use std::collections::HashMap;

use crate::router::error::HandlerResult;
use crate::router::route::RouteContext;
use crate::server::Response;

/// The capabilities a type needs to serve routes.
pub trait Resource: Send {
    /// Receive the context of the call about to be served.
    fn set_route(&mut self, route: RouteContext);

    /// Names of the methods routes can bind to.
    fn methods(&self) -> &[&str];

    /// Run the named method.
    fn invoke(&mut self, method: &str, response: &mut Response) -> HandlerResult;

    /// Whether the named method exists.
    fn has_method(&self, method: &str) -> bool {
        self.methods().contains(&method)
    }

    /// Single entry point for every call.
    ///
    /// Return `Some` to take over a call (for shared pre or post work around
    /// `invoke`); `None` lets the dispatcher call `invoke` directly.
    fn call(&mut self, _method: &str, _response: &mut Response) -> Option<HandlerResult> {
        None
    }

    /// Checked right after construction. A resource that reports failure
    /// aborts the call without a response.
    fn construction_failed(&self) -> bool {
        false
    }
}

type Construct = Box<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;
type IntoResource = fn(Box<dyn Any + Send>) -> Option<Box<dyn Resource>>;

struct Factory {
    construct: Construct,
    into_resource: IntoResource,
}

fn as_resource<R: Resource + 'static>(instance: Box<dyn Any + Send>) -> Option<Box<dyn Resource>> {
    instance.downcast::<R>().ok().map(|r| r as Box<dyn Resource>)
}

fn not_a_resource(_: Box<dyn Any + Send>) -> Option<Box<dyn Resource>> {
    None
}

/// A built instance that lacks the `Resource` capability.
pub(crate) struct NotAResource;

/// Constructors by type name.
#[derive(Default)]
pub struct ResourceRegistry {
    factories: HashMap<String, Factory>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource built with `Default`.
    pub fn register<R>(&mut self, name: impl Into<String>) -> &mut Self
    where
        R: Resource + Default + 'static,
    {
        self.register_with(name, R::default)
    }

    /// Register a resource built by `factory`.
    pub fn register_with<R, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        R: Resource + 'static,
        F: Fn() -> R + Send + Sync + 'static,
    {
        let construct: Construct = Box::new(move || -> Box<dyn Any + Send> { Box::new(factory()) });
        self.insert(name.into(), construct, as_resource::<R>)
    }

    /// Register a type that can be named by routes but cannot serve them.
    ///
    /// Dispatching to it fails with a wrong-type error.
    pub fn register_type<T>(&mut self, name: impl Into<String>) -> &mut Self
    where
        T: Default + Send + 'static,
    {
        let construct: Construct = Box::new(|| -> Box<dyn Any + Send> { Box::new(T::default()) });
        self.insert(name.into(), construct, not_a_resource)
    }

    fn insert(&mut self, name: String, construct: Construct, into_resource: IntoResource) -> &mut Self {
        self.factories.insert(name, Factory { construct, into_resource });
        self
    }

    /// Whether a type is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build a fresh instance of the type registered under `name`.
    ///
    /// Returns `None` when nothing is registered under `name`, and
    /// `Some(Err(NotAResource))` when the type is not a resource.
    pub(crate) fn instantiate(&self, name: &str) -> Option<Result<Box<dyn Resource>, NotAResource>> {
        let factory = self.factories.get(name)?;
        let instance = (factory.construct)();
        Some((factory.into_resource)(instance).ok_or(NotAResource))
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
