//! Domain-specific configuration modules

pub mod database;
pub mod loadtest;
pub mod logging;
pub mod server;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main Surge configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SurgeConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: server::ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: database::DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Load test orchestration configuration
    #[serde(default)]
    pub loadtest: loadtest::LoadTestConfig,
}

impl SurgeConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.logging.validate()?;
        self.loadtest.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = SurgeConfig::default();
        serde_yaml::to_string(&config).unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
