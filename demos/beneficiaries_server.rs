//! A small routing server demonstrating resources, parameters and attributes.

use log::info;
use serde_json::json;

use microroute_rs::router::{HandlerError, HandlerResult, Resource, RouteContext};
use microroute_rs::{Dispatcher, HttpServer, ResourceRegistry, Response, RouteRegistry, ServerConfig, StatusCode};

#[derive(Default)]
struct Beneficiaries {
    route: RouteContext,
}

impl Resource for Beneficiaries {
    fn set_route(&mut self, route: RouteContext) {
        self.route = route;
    }

    fn methods(&self) -> &[&str] {
        &["list", "show", "create"]
    }

    fn invoke(&mut self, method: &str, response: &mut Response) -> HandlerResult {
        match method {
            "list" => {
                let page = self.route.attribute_opt("page").unwrap_or("1");
                Ok(response.send_json(&json!({ "page": page, "items": [] }), StatusCode::OK)?)
            }
            "show" => {
                let body = json!({
                    "id": self.route.param("id")?,
                    "format": self.route.param("format")?,
                });
                Ok(response.send_json(&body, StatusCode::OK)?)
            }
            "create" => {
                let name = self.route.attribute("name")?;
                response.send_text(format!("created {name}"), StatusCode::CREATED);
                Ok(())
            }
            other => Err(HandlerError::UnknownMethod(other.to_string())),
        }
    }
}

#[derive(Default)]
struct Home;

impl Resource for Home {
    fn set_route(&mut self, _route: RouteContext) {}

    fn methods(&self) -> &[&str] {
        &["index"]
    }

    fn invoke(&mut self, _method: &str, response: &mut Response) -> HandlerResult {
        response.send_html("<html><body><h1>microroute-rs</h1></body></html>", StatusCode::OK);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize the logger
    env_logger::init();

    let mut routes = RouteRegistry::new();
    routes.register("/", "GET")?.bind("Home", "index");
    routes.register("/beneficiaries", "GET")?.bind("Beneficiaries", "list");
    routes
        .register(r"/beneficiaries/(\d+)(?:\.(json|txt))?", "GET")?
        .bind("Beneficiaries", "show")
        .declare_param(0, "id", None)
        .declare_param(1, "format", Some("json"));
    routes.register("/beneficiaries", "POST")?.bind("Beneficiaries", "create");

    let mut resources = ResourceRegistry::new();
    resources.register::<Home>("Home").register::<Beneficiaries>("Beneficiaries");

    let config = ServerConfig::default().with_addr("127.0.0.1:8081".parse()?);
    info!("Starting server on http://{}", config.addr);

    let server = HttpServer::new(config, Dispatcher::new(routes, resources));
    server.start().await?;

    Ok(())
}
