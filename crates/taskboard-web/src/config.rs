//! Server configuration.

use std::time::Duration;

use taskboard_core::broadcast::DEFAULT_QUEUE_CAPACITY;
use taskboard_core::service::DEFAULT_STORE_TIMEOUT;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3030;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on each data-store call made by a request handler.
    pub store_timeout: Duration,
    /// Events buffered per WebSocket client before new ones are dropped.
    pub queue_capacity: usize,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}
