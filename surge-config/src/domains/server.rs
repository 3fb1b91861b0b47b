//! HTTP server configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// API path prefix
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Enable CORS middleware
    #[serde(default = "crate::domains::utils::default_true")]
    pub enable_cors: bool,

    /// Enable request tracing
    #[serde(default = "crate::domains::utils::default_true")]
    pub enable_tracing: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            api_prefix: default_api_prefix(),
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

impl ServerConfig {
    /// Combined bind address and port, suitable for a TCP listener
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.bind_address, "bind_address", self.domain_name())?;
        validate_required_string(&self.api_prefix, "api_prefix", self.domain_name())?;

        if !self.api_prefix.starts_with('/') {
            return Err(self.validation_error("api_prefix must start with '/'"));
        }

        if self.port == 0 {
            return Err(self.validation_error("port must be nonzero"));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server"
    }
}

// Default value functions
fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 4000);
        assert_eq!(config.socket_addr(), "127.0.0.1:4000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_config_validation() {
        let mut config = ServerConfig::default();
        config.api_prefix = "api".to_string();
        assert!(config.validate().is_err());

        config.api_prefix = "/api/v1".to_string();
        config.port = 0;
        assert!(config.validate().is_err());
    }
}
