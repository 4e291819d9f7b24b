//! Resolving calls to routes and running their handlers.

use std::collections::HashMap;

use log::debug;

use crate::parser::Method;
use crate::router::error::{DispatchError, Error};
use crate::router::registry::RouteRegistry;
use crate::router::resource::ResourceRegistry;
use crate::router::route::{Route, RouteContext};
use crate::server::Response;

/// One incoming call, as handed over by the transport.
#[derive(Debug, Clone, Copy)]
pub struct Call<'a> {
    /// The method token; matched case-insensitively.
    pub method: &'a str,
    /// The path, without a query string.
    pub path: &'a str,
    /// Raw `key=value&...` attributes, usually the query string.
    pub attributes: &'a str,
    /// Submitted fields, merged over the attributes as they are.
    pub fields: Option<&'a HashMap<String, String>>,
    /// The raw payload.
    pub body: &'a [u8],
}

impl<'a> Call<'a> {
    /// A call with no attributes, fields or body.
    pub fn new(method: &'a str, path: &'a str) -> Self {
        Self {
            method,
            path,
            attributes: "",
            fields: None,
            body: &[],
        }
    }

    pub fn with_attributes(mut self, attributes: &'a str) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_fields(mut self, fields: &'a HashMap<String, String>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_body(mut self, body: &'a [u8]) -> Self {
        self.body = body;
        self
    }
}

/// How a call ended, when it did not fail.
#[derive(Debug)]
pub enum Outcome {
    /// A handler ran and wrote this response.
    Invoked(Response),
    /// No route matches the method and path.
    NotFound,
    /// The resource gave up during construction; nothing is to be sent.
    Aborted,
}

impl Outcome {
    /// The response to send: the handler's, an empty 404, or nothing.
    pub fn into_response(self) -> Option<Response> {
        match self {
            Outcome::Invoked(response) => Some(response),
            Outcome::NotFound => Some(Response::not_found()),
            Outcome::Aborted => None,
        }
    }
}

/// Serves calls against a frozen route table.
///
/// The dispatcher owns both registries, so nothing can be registered once
/// serving starts. It only needs `&self`; share it behind an `Arc`.
pub struct Dispatcher {
    routes: RouteRegistry,
    resources: ResourceRegistry,
}

impl Dispatcher {
    pub fn new(routes: RouteRegistry, resources: ResourceRegistry) -> Self {
        Self { routes, resources }
    }

    pub fn routes(&self) -> &RouteRegistry {
        &self.routes
    }

    /// Resolve a call and run the handler of its route.
    ///
    /// An exact signature match is tried first, then patterns in
    /// registration order. A miss is [`Outcome::NotFound`], not an error.
    ///
    /// # Errors
    ///
    /// [`Error::Dispatch`] when the route's handler cannot be built, lacks
    /// the bound method, or fails while running.
    pub fn dispatch(&self, call: &Call<'_>) -> Result<Outcome, Error> {
        let Some((route, context)) = self.resolve(call) else {
            debug!("No route for {} {}", call.method, call.path);
            return Ok(Outcome::NotFound);
        };
        debug!("{} {} resolved to {}", call.method, call.path, route.signature());

        self.invoke(route, context).map_err(|source| Error::Dispatch {
            signature: route.signature().to_string(),
            source,
        })
    }

    /// Find the route for a call and prepare its context.
    pub fn resolve(&self, call: &Call<'_>) -> Option<(&Route, RouteContext)> {
        let method = call.method.parse::<Method>().ok()?;

        let (route, captures) = match self.routes.find_exact(method, call.path) {
            Some(route) => (route, Vec::new()),
            None => {
                let found = self.routes.find_by_pattern(method, call.path)?;
                (found.route, found.captures)
            }
        };

        let mut context = route.new_context(call.body);
        context
            .set_param_values(captures)
            .set_attributes_from_str(call.attributes);
        if let Some(fields) = call.fields {
            context.merge_fields(fields);
        }

        Some((route, context))
    }

    fn invoke(&self, route: &Route, context: RouteContext) -> Result<Outcome, DispatchError> {
        let Some(handler) = route.handler() else {
            return Err(DispatchError::ClassNotFound(String::new()));
        };

        let mut resource = match self.resources.instantiate(&handler.resource) {
            Some(Ok(resource)) => resource,
            Some(Err(_)) => return Err(DispatchError::WrongType(handler.resource.clone())),
            None => return Err(DispatchError::ClassNotFound(handler.resource.clone())),
        };

        if resource.construction_failed() {
            debug!("Resource {} failed to construct, dropping {}", handler.resource, route.signature());
            return Ok(Outcome::Aborted);
        }

        if !resource.has_method(&handler.method) {
            return Err(DispatchError::MethodNotFound {
                resource: handler.resource.clone(),
                method: handler.method.clone(),
            });
        }

        resource.set_route(context);

        let mut response = Response::default();
        let result = match resource.call(&handler.method, &mut response) {
            Some(result) => result,
            None => resource.invoke(&handler.method, &mut response),
        };
        result.map_err(DispatchError::Handler)?;

        Ok(Outcome::Invoked(response))
    }
}
