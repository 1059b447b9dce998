//! Configuration for the secure channel.

use std::env;
use std::time::Duration;

/// Environment variable overriding the server URL.
pub const SERVER_URL_ENV: &str = "SEALSYNC_SERVER_URL";

/// Environment variable overriding the request timeout, in milliseconds.
pub const TIMEOUT_MS_ENV: &str = "SEALSYNC_TIMEOUT_MS";

/// Configuration for a secure channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// URL of the authoritative record (`GET` and `POST` target).
    pub server_url: String,
    /// Read/write timeout for a single request.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl ChannelConfig {
    /// Creates a configuration for the given server URL.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Builds a configuration from `SEALSYNC_SERVER_URL` and
    /// `SEALSYNC_TIMEOUT_MS`, falling back to the defaults.
    ///
    /// Timeouts outside 100 ms ..= 10 min are ignored.
    pub fn from_env() -> Self {
        let mut config = match env::var(SERVER_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        };
        if let Some(ms) = env::var(TIMEOUT_MS_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| (100..=600_000).contains(v))
        {
            config.timeout = Duration::from_millis(ms);
        }
        config
    }

    /// Sets the server URL.
    #[must_use]
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
