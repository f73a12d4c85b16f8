//! Watcher configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use txwatch_store::RefreshPolicy;
use txwatch_utils::LogFormat;

use crate::WatcherError;

/// Configuration for a watcher session.
///
/// Can be loaded from a TOML file via [`WatcherConfig::from_toml_file`] or
/// built programmatically. Every field has a default, so an empty file is
/// a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// JSON-RPC endpoint used for transaction lookups.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// WebSocket endpoint of the push channel.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// Whole-request timeout for RPC calls, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connection timeout for RPC calls, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Seconds between refreshes of pending transactions. 0 disables them.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// How a refresh handles individual lookup failures.
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,

    /// Capacity of the inbound push update queue.
    #[serde(default = "default_update_buffer")]
    pub update_buffer: usize,

    /// Stop watching once every tracked transaction is finalized.
    #[serde(default = "default_true")]
    pub exit_when_finalized: bool,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_rpc_url() -> String {
    "http://127.0.0.1:4000/api".to_string()
}

fn default_ws_url() -> String {
    "ws://127.0.0.1:4000/ws".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_refresh_interval_secs() -> u64 {
    5
}

fn default_update_buffer() -> usize {
    txwatch_websocket::DEFAULT_UPDATE_BUFFER
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl WatcherConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, WatcherError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, WatcherError> {
        let config: Self = toml::from_str(s).map_err(|e| WatcherError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, WatcherError> {
        toml::to_string_pretty(self).map_err(|e| WatcherError::Config(e.to_string()))
    }

    /// Reject endpoint URLs with the wrong scheme.
    pub fn validate(&self) -> Result<(), WatcherError> {
        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(WatcherError::Config(format!(
                "rpc_url must be an http(s) URL, got `{}`",
                self.rpc_url
            )));
        }
        if !(self.ws_url.starts_with("ws://") || self.ws_url.starts_with("wss://")) {
            return Err(WatcherError::Config(format!(
                "ws_url must be a ws(s) URL, got `{}`",
                self.ws_url
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// `None` when periodic refresh is disabled.
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            ws_url: default_ws_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
            refresh_policy: RefreshPolicy::default(),
            update_buffer: default_update_buffer(),
            exit_when_finalized: default_true(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
