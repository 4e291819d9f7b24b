//! TCP front end for a [`Dispatcher`].

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::parser::parse_request;
use crate::router::{Call, Dispatcher};
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::response::{Response, StatusCode, TEXT_CONTENT_TYPE};

/// Serves one request per connection through a shared dispatcher.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    dispatcher: Arc<Dispatcher>,
}

impl HttpServer {
    /// Create a server for a fully registered dispatcher.
    pub fn new(config: ServerConfig, dispatcher: impl Into<Arc<Dispatcher>>) -> Self {
        Self {
            config,
            dispatcher: dispatcher.into(),
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    fn log_routes(&self) {
        info!("Registered routes:");
        for route in self.dispatcher.routes().iter() {
            match route.handler() {
                Some(handler) => info!("  {} -> {}::{}", route.signature(), handler.resource, handler.method),
                None => info!("  {} (unbound)", route.signature()),
            }
        }
    }

    /// Bind the configured address and serve until Ctrl+C.
    pub async fn start(&self) -> Result<(), Error> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener until Ctrl+C.
    ///
    /// Failures on a single connection are logged and never stop the loop.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), Error> {
        self.log_routes();
        info!("Server listening on http://{addr}", addr = listener.local_addr()?);

        let semaphore = Arc::new(Semaphore::new(self.config.max_connections));
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let mut tasks = JoinSet::new();

        let ctrl_c = tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    let _ = shutdown_tx.send(()).await;
                }
                Err(e) => error!("Error setting up Ctrl+C handler: {e}"),
            }
        });

        loop {
            tokio::select! {
                Some(()) = shutdown_rx.recv() => {
                    info!("Shutting down server...");
                    break;
                }

                Some(finished) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = finished {
                        error!("Connection task failed: {e}");
                    }
                }

                accepted = listener.accept() => {
                    match accepted {
                        Ok((socket, addr)) => {
                            self.spawn_connection(socket, addr, &semaphore, &mut tasks).await;
                        }
                        Err(e) => {
                            error!("Error accepting connection: {e}");
                            if e.kind() == std::io::ErrorKind::BrokenPipe {
                                break;
                            }
                            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                        }
                    }
                }
            }
        }
        ctrl_c.abort();

        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let drained = tokio::time::timeout(self.config.shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;
        if drained.is_err() {
            warn!("Shutdown timeout reached with {len} connections open", len = tasks.len());
            tasks.abort_all();
        }

        info!("Server shutdown complete");
        Ok(())
    }

    async fn spawn_connection(
        &self,
        mut socket: TcpStream,
        addr: SocketAddr,
        semaphore: &Arc<Semaphore>,
        tasks: &mut JoinSet<()>,
    ) {
        let Ok(permit) = semaphore.clone().try_acquire_owned() else {
            warn!("Connection limit reached, rejecting connection from {addr}");
            let response = Response::new(StatusCode::SERVICE_UNAVAILABLE)
                .with_content_type(TEXT_CONTENT_TYPE)
                .with_body_string("Server is at capacity, please try again later");
            let _ = socket.write_all(&response.to_bytes()).await;
            return;
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        let read_buffer_size = self.config.read_buffer_size;

        tasks.spawn(async move {
            let _permit = permit;

            match Self::handle_connection(&mut socket, &dispatcher, read_buffer_size).await {
                Ok(()) => {}
                Err(Error::IoError(e)) => warn!("Connection from {addr} dropped: {e}"),
                Err(e) => debug!("Connection from {addr} ended with an error: {e}"),
            }
        });
    }

    /// Read one request from `socket`, dispatch it and write the response.
    ///
    /// A miss is answered with 404 and is not an error. Unparseable requests
    /// get a 400 and dispatch failures a 500; both are returned as errors
    /// after the response is written. An aborted call writes nothing.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        dispatcher: &Dispatcher,
        read_buffer_size: usize,
    ) -> Result<(), Error> {
        let mut buf = vec![0; read_buffer_size];

        let n = socket.read(&mut buf).await?;
        if n == 0 {
            return Ok(()); // Connection closed
        }

        let request = match parse_request(&buf[..n]) {
            Ok(request) => request,
            Err(e) => {
                let response = Response::new(StatusCode::BAD_REQUEST)
                    .with_content_type(TEXT_CONTENT_TYPE)
                    .with_body_string(format!("Error parsing request: {e}"));
                socket.write_all(&response.to_bytes()).await?;
                return Err(Error::ParseError(e));
            }
        };

        let fields = request.fields();
        let call = Call::new(&request.method, &request.path)
            .with_attributes(&request.query)
            .with_fields(&fields)
            .with_body(&request.body);

        let outcome = match dispatcher.dispatch(&call) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("{} {} failed: {}", request.method, request.path, e.causes().join(": "));
                let response = Response::new(StatusCode::INTERNAL_SERVER_ERROR)
                    .with_content_type(TEXT_CONTENT_TYPE)
                    .with_body_string("Internal server error");
                socket.write_all(&response.to_bytes()).await?;
                return Err(Error::Router(e));
            }
        };

        match outcome.into_response() {
            Some(response) => {
                debug!("{} {} -> {}", request.method, request.path, response.status);
                socket.write_all(&response.to_bytes()).await?;
            }
            None => debug!("{} {} aborted by its resource", request.method, request.path),
        }

        Ok(())
    }
}
