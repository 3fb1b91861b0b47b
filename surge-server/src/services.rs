//! Service construction and dependency injection setup

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use surge_config::SurgeConfig;
use surge_execution::{CommandWorkload, ProcessSupervisor, SupervisorConfig};
use surge_interfaces::{RunLifecycle, RunRepository};
use surge_rest_api::{RunRequestDefaults, RunsContext};
use surge_storage::{DatabaseConnection, SeaOrmRunRepository, StorageConfig};

use crate::lifecycle::{LifecycleSettings, RunLifecycleService};

/// Service container holding all application services
#[derive(Clone)]
pub struct ServiceContainer {
    pub repository: Arc<dyn RunRepository>,
    pub lifecycle: Arc<dyn RunLifecycle>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations
    pub async fn new(config: &SurgeConfig) -> Result<Self> {
        let storage_config = StorageConfig {
            url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            connection_timeout: config.database.connection_timeout,
        };

        let connection = DatabaseConnection::new(storage_config)
            .await
            .context("Failed to connect to database")?;
        connection
            .migrate()
            .await
            .context("Failed to apply database migrations")?;

        let repository: Arc<dyn RunRepository> = Arc::new(SeaOrmRunRepository::new(connection));

        // Log artifacts accumulate here, one file per run
        tokio::fs::create_dir_all(&config.loadtest.log_dir)
            .await
            .with_context(|| format!("Failed to create log directory {}", config.loadtest.log_dir))?;
        debug!(log_dir = %config.loadtest.log_dir, "Log directory ready");

        let supervisor = Arc::new(ProcessSupervisor::new(SupervisorConfig {
            grace_period: config.loadtest.stop_grace_period,
            ..SupervisorConfig::default()
        }));

        let workload = Arc::new(CommandWorkload::new(
            config.loadtest.workload.program.clone(),
            config.loadtest.workload.base_args.clone(),
        ));

        let lifecycle: Arc<dyn RunLifecycle> = Arc::new(RunLifecycleService::new(
            repository.clone(),
            supervisor,
            workload,
            LifecycleSettings {
                log_dir: config.loadtest.log_dir.clone().into(),
                max_output_bytes: config.loadtest.max_output_bytes,
            },
        ));

        info!(
            workload = %config.loadtest.workload.program,
            database = %config.database.url,
            "Services initialized"
        );

        Ok(Self {
            repository,
            lifecycle,
        })
    }

    /// Create the REST API context from this container
    pub fn rest_context(&self, config: &SurgeConfig) -> RunsContext {
        RunsContext::new(
            self.lifecycle.clone(),
            self.repository.clone(),
            RunRequestDefaults {
                duration_secs: config.loadtest.default_duration_secs,
                clients: config.loadtest.default_clients,
                url: config.loadtest.default_url.clone(),
                list_limit: config.loadtest.default_list_limit,
                max_list_limit: config.loadtest.max_list_limit,
            },
        )
    }
}

/// Initialize the tracing subscriber from the logging configuration
///
/// `RUST_LOG` wins over the configured level when set. An optional file
/// layer appends to the configured path without ANSI escapes.
pub fn init_logging(config: &SurgeConfig) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_filter_str()));

    let console_layer = fmt::layer()
        .with_file(config.logging.include_location)
        .with_line_number(config.logging.include_location);

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer);

    if let Some(path) = &config.logging.file_path {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path))?;
        registry
            .with(fmt::layer().with_ansi(false).with_writer(file))
            .init();
    } else {
        registry.init();
    }

    Ok(())
}
