//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};

use serde::Deserialize;

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The maximum number of concurrent connections.
    pub max_connections: usize,
    /// The largest request, head and body, the server will buffer.
    pub read_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // The development-server default the fixtures' clients expect
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 5000)),
            max_connections: 1024,
            read_buffer_size: 8192,
        }
    }
}
