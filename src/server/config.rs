//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The maximum number of concurrent connections.
    pub max_connections: usize,
    /// The read buffer size; a request must fit in one read.
    pub read_buffer_size: usize,
    /// How long shutdown waits for open connections.
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Replace the bind address.
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            max_connections: 1024,
            read_buffer_size: 8192,
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}
