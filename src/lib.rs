//! A minimal regex-driven request router.
//!
//! Routes bind an HTTP method and a path pattern to a named method of a
//! named resource type. Patterns may embed regular-expression capture
//! groups, whose matches become named parameters.
//!
//! # Features
//!
//! - Ordered route table: exact signature lookup first, then patterns in
//!   registration order, first match wins
//! - Positional capture groups mapped to named parameters
//! - Query-string attributes with a `name[]` history for repeated keys
//! - Handler types resolved by name from a factory table, one fresh
//!   instance per call
//! - JSON, text and HTML responses with explicit status codes
//! - A thin tokio-based adapter serving a dispatcher over TCP
//!
//! # Examples
//!
//! ```
//! use microroute_rs::router::{
//!     Call, Dispatcher, HandlerError, HandlerResult, Outcome, Resource, ResourceRegistry, RouteContext,
//!     RouteRegistry,
//! };
//! use microroute_rs::server::{Response, StatusCode};
//! use serde_json::json;
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
//!             "get" => {
//!                 let body = json!({ "id": self.route.param("id")? });
//!                 Ok(response.send_json(&body, StatusCode::OK)?)
//!             }
//!             other => Err(HandlerError::UnknownMethod(other.to_string())),
//!         }
//!     }
//! }
//!
//! let mut routes = RouteRegistry::new();
//! routes
//!     .register(r"/beneficiaries/(\d+)", "GET")?
//!     .bind("Beneficiaries", "get")
//!     .declare_param(0, "id", None);
//!
//! let mut resources = ResourceRegistry::new();
//! resources.register::<Beneficiaries>("Beneficiaries");
//!
//! let dispatcher = Dispatcher::new(routes, resources);
//! match dispatcher.dispatch(&Call::new("GET", "/beneficiaries/12"))? {
//!     Outcome::Invoked(response) => assert_eq!(response.body, b"{\n    \"id\": \"12\"\n}"),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! # Ok::<(), microroute_rs::RouterError>(())
//! ```
//!
//! ## Serving over TCP
//!
//! ```no_run
//! use microroute_rs::router::{Dispatcher, ResourceRegistry, RouteRegistry};
//! use microroute_rs::server::{HttpServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), microroute_rs::ServerError> {
//!     let dispatcher = Dispatcher::new(RouteRegistry::new(), ResourceRegistry::new());
//!     HttpServer::new(ServerConfig::default(), dispatcher).start().await
//! }
//! ```

// Export the parser module
pub mod parser;

// Export the router module
pub mod router;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{parse_attributes, parse_request, AttributeValue, Error as ParserError, Method};
pub use router::{Call, Dispatcher, Error as RouterError, Outcome, Resource, ResourceRegistry, RouteContext, RouteRegistry};
pub use server::{Error as ServerError, HttpServer, Response, ServerConfig, StatusCode};
