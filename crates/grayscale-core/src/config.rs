//! SDK configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration passed when constructing the SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Reverse-DNS identifier; channel names are derived from it
    #[serde(default = "default_identifier")]
    pub identifier: String,

    /// Version reported by `get_version` (defaults to the package version)
    #[serde(default)]
    pub version: Option<String>,

    /// Timeout for a unary request in milliseconds (0 disables the timeout)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Number of worker threads for the blocking runtime (default: number of CPU cores)
    #[serde(default)]
    pub worker_threads: Option<usize>,

    /// Shutdown timeout in milliseconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_ms: u64,
}

fn default_identifier() -> String {
    "com.sktelecom.native.grayscale.sdk".to_string()
}

fn default_request_timeout() -> u64 {
    30_000
}

fn default_shutdown_timeout() -> u64 {
    5000
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            identifier: default_identifier(),
            version: None,
            request_timeout_ms: default_request_timeout(),
            worker_threads: None,
            shutdown_timeout_ms: default_shutdown_timeout(),
        }
    }
}

impl SdkConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Name of the channel carrying image operations
    pub fn image_channel_name(&self) -> String {
        format!("{}/image", self.identifier)
    }

    /// Name of the channel carrying log operations
    pub fn log_channel_name(&self) -> String {
        format!("{}/log", self.identifier)
    }

    /// Unary request timeout, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}
