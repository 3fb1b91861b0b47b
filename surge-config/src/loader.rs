//! Configuration loading and environment variable handling

use crate::domains::SurgeConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "SURGE".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<SurgeConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: SurgeConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<SurgeConfig> {
        let mut config = SurgeConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<SurgeConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut SurgeConfig) -> ConfigResult<()> {
        if let Ok(bind) = self.get_env_var("BIND_ADDRESS") {
            config.server.bind_address = bind;
        }

        if let Ok(port) = self.get_env_var("PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid PORT: {}", e)))?;
        }

        if let Ok(url) = self.get_env_var("DATABASE_URL") {
            config.database.url = url;
        }

        if let Ok(level) = self.get_env_var("LOG_LEVEL") {
            config.logging.level = serde_yaml::from_str(&level)
                .map_err(|e| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", e)))?;
        }

        if let Ok(url) = self.get_env_var("TARGET_URL") {
            config.loadtest.default_url = url;
        }

        if let Ok(dir) = self.get_env_var("LOG_DIR") {
            config.loadtest.log_dir = dir;
        }

        if let Ok(program) = self.get_env_var("WORKLOAD_PROGRAM") {
            config.loadtest.workload.program = program;
        }

        Ok(())
    }

    /// Read a prefixed environment variable
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  port: 8080\nloadtest:\n  default_clients: 25\n"
        )
        .unwrap();

        let loader = ConfigLoader::with_prefix("SURGE_TEST_NONE");
        let config = loader.from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.loadtest.default_clients, 25);
        // Untouched domains keep their defaults
        assert_eq!(config.loadtest.default_duration_secs, 60);
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("SURGE_LOADER_TEST_PORT", "9000");
        let loader = ConfigLoader::with_prefix("SURGE_LOADER_TEST");
        let config = loader.from_env().unwrap();
        assert_eq!(config.server.port, 9000);
        std::env::remove_var("SURGE_LOADER_TEST_PORT");
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [not, a, map]").unwrap();

        let loader = ConfigLoader::new();
        assert!(loader.from_file(file.path()).is_err());
    }
}
