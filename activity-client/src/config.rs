//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

/// Session client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// activity-server base URL
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Directory of the durable session files
    pub storage_dir: PathBuf,
    /// Period of the background session check
    pub recheck_interval: Duration,
    /// Tokens with less remaining lifetime are re-verified upstream
    pub refresh_threshold: Duration,
    /// Lifetime of the cached field-name mapping
    pub field_mapping_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3001".to_string(),
            timeout: Duration::from_secs(30),
            storage_dir: PathBuf::from(".activity-admin"),
            recheck_interval: Duration::from_secs(30 * 60),
            refresh_threshold: Duration::from_secs(60 * 60),
            field_mapping_ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
