//! Server configuration.

use std::net::SocketAddr;

/// Validated server configuration.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    /// The address and port to listen on.
    pub listen: SocketAddr,
}
