//! Command implementations.

pub mod fetch;
pub mod reset;
pub mod send;
pub mod serve;
pub mod verify;

use sealsync_client::{ChannelConfig, LocalState, SecureChannel, UreqClient};
use sealsync_protocol::Record;
use sealsync_storage::FileBackend;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Connection settings shared by the client commands.
pub struct Session {
    config: ChannelConfig,
    state_dir: PathBuf,
}

impl Session {
    /// Resolves flags over the environment defaults.
    pub fn new(server: Option<String>, state_dir: PathBuf, timeout_ms: Option<u64>) -> Self {
        let mut config = match server {
            Some(url) => ChannelConfig::from_env().with_server_url(url),
            None => ChannelConfig::from_env(),
        };
        if let Some(ms) = timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        debug!(
            server = %config.server_url,
            state_dir = %state_dir.display(),
            timeout_ms = config.timeout.as_millis() as u64,
            "client session"
        );
        Self { config, state_dir }
    }

    /// Opens the persisted state directory.
    pub fn state(&self) -> Result<LocalState, Box<dyn std::error::Error>> {
        Ok(LocalState::new(FileBackend::open(&self.state_dir)?))
    }

    /// Returns the HTTP client for the configured server.
    pub fn client(&self) -> UreqClient {
        UreqClient::new(&self.config)
    }

    /// Returns the channel configuration.
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Opens a channel without the initial fetch.
    pub fn open(&self) -> Result<SecureChannel<UreqClient>, Box<dyn std::error::Error>> {
        Ok(SecureChannel::<_, Record>::open(
            self.config.clone(),
            self.client(),
            self.state()?,
        )?)
    }
}

/// Prints a record as JSON.
pub fn print_record(record: &Record) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}
