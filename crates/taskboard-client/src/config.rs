//! Client configuration.

use std::time::Duration;

use crate::transport::ReconnectPolicy;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3030";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, e.g. `http://127.0.0.1:3030`.
    pub base_url: String,
    pub request_timeout: Duration,
    pub reconnect: ReconnectPolicy,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// URL of an HTTP endpoint under the server root.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// WebSocket URL derived from the HTTP base URL.
    pub fn ws_url(&self) -> String {
        let ws_base = self
            .base_url
            .strip_prefix("https://")
            .map(|rest| format!("wss://{}", rest))
            .or_else(|| {
                self.base_url
                    .strip_prefix("http://")
                    .map(|rest| format!("ws://{}", rest))
            })
            .unwrap_or_else(|| self.base_url.clone());
        format!("{}/ws", ws_base)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            reconnect: ReconnectPolicy::default(),
        }
    }
}
