//! Load test orchestration configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Load test orchestration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadTestConfig {
    /// Run length applied when the caller omits a duration
    #[serde(default = "default_duration_secs")]
    pub default_duration_secs: u32,

    /// Concurrency applied when the caller omits a client count
    #[serde(default = "default_clients")]
    pub default_clients: u32,

    /// Target URL applied when the caller omits one
    #[serde(default = "default_target_url")]
    pub default_url: String,

    /// Directory receiving one append-mode log artifact per run
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Maximum size of the output snapshot written back into the record
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,

    /// Delay between the graceful stop signal and the forceful kill
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_stop_grace_period"
    )]
    pub stop_grace_period: Duration,

    /// Default number of runs returned by a list query
    #[serde(default = "default_list_limit")]
    pub default_list_limit: u64,

    /// Hard cap on the number of runs a list query may return
    #[serde(default = "default_max_list_limit")]
    pub max_list_limit: u64,

    /// External workload launcher
    #[serde(default)]
    pub workload: WorkloadConfig,
}

/// External load generator invocation
///
/// The generator is an opaque collaborator reached through a fixed
/// command-line contract: `<program> <args...> -c <clients> -t <duration> <url>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Executable to launch
    #[serde(default = "default_workload_program")]
    pub program: String,

    /// Fixed arguments placed before the per-run parameters
    #[serde(default)]
    pub base_args: Vec<String>,
}

impl Default for LoadTestConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: default_duration_secs(),
            default_clients: default_clients(),
            default_url: default_target_url(),
            log_dir: default_log_dir(),
            max_output_bytes: default_max_output_bytes(),
            stop_grace_period: default_stop_grace_period(),
            default_list_limit: default_list_limit(),
            max_list_limit: default_max_list_limit(),
            workload: WorkloadConfig::default(),
        }
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            program: default_workload_program(),
            base_args: Vec::new(),
        }
    }
}

impl Validatable for LoadTestConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(
            self.default_duration_secs,
            "default_duration_secs",
            self.domain_name(),
        )?;
        validate_positive(self.default_clients, "default_clients", self.domain_name())?;
        validate_url(&self.default_url, "default_url", self.domain_name())?;
        validate_required_string(&self.log_dir, "log_dir", self.domain_name())?;
        validate_positive(self.max_output_bytes, "max_output_bytes", self.domain_name())?;
        validate_positive(
            self.stop_grace_period.as_secs(),
            "stop_grace_period",
            self.domain_name(),
        )?;
        validate_positive(self.default_list_limit, "default_list_limit", self.domain_name())?;

        if self.max_list_limit < self.default_list_limit {
            return Err(self.validation_error("max_list_limit must be >= default_list_limit"));
        }

        self.workload.validate()?;

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "loadtest"
    }
}

impl Validatable for WorkloadConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.program, "program", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "loadtest.workload"
    }
}

// Default value functions
fn default_duration_secs() -> u32 {
    60
}

fn default_clients() -> u32 {
    10
}

fn default_target_url() -> String {
    "http://localhost:4000/api/health".to_string()
}

fn default_log_dir() -> String {
    "/var/log/surge".to_string()
}

fn default_max_output_bytes() -> usize {
    100_000
}

fn default_stop_grace_period() -> Duration {
    Duration::from_secs(5)
}

fn default_list_limit() -> u64 {
    50
}

fn default_max_list_limit() -> u64 {
    200
}

fn default_workload_program() -> String {
    "loadtest".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loadtest_config_defaults() {
        let config = LoadTestConfig::default();
        assert_eq!(config.default_duration_secs, 60);
        assert_eq!(config.default_clients, 10);
        assert_eq!(config.max_output_bytes, 100_000);
        assert_eq!(config.stop_grace_period, Duration::from_secs(5));
        assert_eq!(config.default_list_limit, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_loadtest_config_validation() {
        let mut config = LoadTestConfig::default();
        config.default_duration_secs = 0;
        assert!(config.validate().is_err());

        let mut config = LoadTestConfig::default();
        config.default_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = LoadTestConfig::default();
        config.max_list_limit = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_workload_program_defaults_when_omitted() {
        let config: LoadTestConfig = serde_yaml::from_str("workload:\n  base_args: [\"-q\"]\n").unwrap();
        assert_eq!(config.workload.program, "loadtest");
        assert_eq!(config.workload.base_args, vec!["-q"]);
    }

    #[test]
    fn test_workload_config_validation() {
        let mut workload = WorkloadConfig::default();
        assert_eq!(workload.program, "loadtest");
        assert!(workload.validate().is_ok());

        workload.program = String::new();
        assert!(workload.validate().is_err());
    }
}
