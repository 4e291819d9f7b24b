//! The ordered route table.

use std::collections::HashMap;

use log::debug;

use crate::parser::Method;
use crate::router::error::Error;
use crate::router::route::{signature, Route};

/// A route found by pattern, with the groups its regex captured.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    /// Capture groups in order; `None` for a group that did not participate.
    pub captures: Vec<Option<String>>,
}

/// Routes keyed by signature, in registration order.
///
/// Pattern lookup walks routes in the order they were registered and takes
/// the first one that matches, so register specific patterns before general
/// ones.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: Vec<Route>,
    index: HashMap<String, usize>,
}

impl RouteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route for `pattern` and `method`.
    ///
    /// A route with the same signature is replaced in place and keeps its
    /// position in the lookup order. The returned route can be bound and
    /// given parameters fluently.
    ///
    /// # Errors
    ///
    /// [`Error::Registration`] when `method` is not GET, POST, PUT, DELETE
    /// or PATCH.
    pub fn register(&mut self, pattern: impl Into<String>, method: &str) -> Result<&mut Route, Error> {
        let pattern = pattern.into();
        let method = method
            .parse::<Method>()
            .map_err(|source| Error::Registration { pattern: pattern.clone(), source })?;

        let route = Route::new(pattern, method);
        let position = match self.index.get(route.signature()) {
            Some(&position) => {
                debug!("Replacing route {}", route.signature());
                self.routes[position] = route;
                position
            }
            None => {
                debug!("Registering route {}", route.signature());
                self.index.insert(route.signature().to_string(), self.routes.len());
                self.routes.push(route);
                self.routes.len() - 1
            }
        };

        Ok(&mut self.routes[position])
    }

    /// Look up a route by exact signature, without interpreting patterns.
    pub fn find_exact(&self, method: Method, path: &str) -> Option<&Route> {
        self.get(&signature(method, path))
    }

    /// Find the first registered route whose pattern matches.
    ///
    /// Each route's signature is matched as an anchored regex against
    /// `METHOD:path`.
    pub fn find_by_pattern(&self, method: Method, path: &str) -> Option<RouteMatch<'_>> {
        let wanted = signature(method, path);
        self.routes.iter().find_map(|route| {
            route
                .captures(&wanted)
                .map(|captures| RouteMatch { route, captures })
        })
    }

    /// Get a route by its signature.
    pub fn get(&self, signature: &str) -> Option<&Route> {
        self.index.get(signature).map(|&position| &self.routes[position])
    }

    /// Routes in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
