//! Server configuration.

use sealsync_protocol::Record;
use std::net::{Ipv4Addr, SocketAddr};

/// Configuration for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Record served before the first write.
    pub initial_record: Record,
}

impl ServerConfig {
    /// Creates a configuration binding to `bind_addr`.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            initial_record: Record::new("Hello World!"),
        }
    }

    /// Sets the initial record.
    pub fn with_initial_record(mut self, record: Record) -> Self {
        self.initial_record = record;
        self
    }

    /// Sets the bind address.
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)))
    }
}
