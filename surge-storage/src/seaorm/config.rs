//! Storage configuration

use std::time::Duration;

/// Connection settings for the run record store
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Database URL, e.g. "sqlite://surge.db" or "sqlite::memory:"
    pub url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connect/acquire timeout
    pub connection_timeout: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://surge.db".to_string(),
            max_connections: 10,
            connection_timeout: Duration::from_secs(30),
        }
    }
}

impl StorageConfig {
    /// In-memory SQLite configuration, used by tests
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connection_timeout: Duration::from_secs(5),
        }
    }
}
