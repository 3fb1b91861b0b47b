//! Database connection management

use super::config::StorageConfig;
use super::migrations::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection as SeaConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Database connection wrapper with configuration
#[derive(Clone)]
pub struct DatabaseConnection {
    connection: SeaConnection,
    config: StorageConfig,
}

/// Connection-level errors
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Database error: {0}")]
    DbError(#[from] DbErr),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DatabaseConnection {
    /// Create a new database connection with configuration
    pub async fn new(config: StorageConfig) -> Result<Self, ConnectionError> {
        info!("Connecting to database: {}", config.url);

        Self::ensure_sqlite_file_exists(&config.url)?;

        let mut opts = ConnectOptions::new(&config.url);
        opts.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(config.connection_timeout)
            .acquire_timeout(config.connection_timeout)
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false);

        let connection = Database::connect(opts).await?;

        debug!(
            "Database connection established with {} max connections",
            config.max_connections
        );

        Ok(Self { connection, config })
    }

    /// Run all pending schema migrations
    pub async fn migrate(&self) -> Result<(), ConnectionError> {
        Migrator::up(&self.connection, None)
            .await
            .map_err(|e| ConnectionError::MigrationError(e.to_string()))?;
        debug!("Database migrations applied");
        Ok(())
    }

    /// Access the underlying SeaORM connection
    pub fn get_connection(&self) -> &SeaConnection {
        &self.connection
    }

    /// The configuration this connection was created with
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Close the connection pool
    pub async fn close(self) -> Result<(), ConnectionError> {
        self.connection.close().await?;
        Ok(())
    }

    /// Ensure the SQLite database file's parent directory exists
    fn ensure_sqlite_file_exists(database_url: &str) -> Result<(), ConnectionError> {
        if !database_url.starts_with("sqlite:") || database_url.contains(":memory:") {
            return Ok(());
        }

        let file_path = database_url
            .strip_prefix("sqlite://")
            .or_else(|| database_url.strip_prefix("sqlite:"))
            .ok_or_else(|| {
                ConnectionError::ConfigError(format!("Invalid SQLite URL format: {}", database_url))
            })?;
        // Strip query parameters like ?mode=rwc
        let file_path = file_path.split('?').next().unwrap_or(file_path);

        if let Some(parent) = std::path::Path::new(file_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ConnectionError::ConfigError(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        if !std::path::Path::new(file_path).exists() {
            std::fs::File::create(file_path).map_err(|e| {
                ConnectionError::ConfigError(format!(
                    "Failed to create database file {}: {}",
                    file_path, e
                ))
            })?;
        }

        Ok(())
    }
}
