//! Test utilities for storage-dependent code
//!
//! Spins up migrated in-memory SQLite databases so repository and lifecycle
//! tests never touch the filesystem.

use crate::seaorm::config::StorageConfig;
use crate::seaorm::connection::DatabaseConnection;
use crate::seaorm::repositories::SeaOrmRunRepository;

/// Create a migrated in-memory database connection
///
/// Panics on failure; intended for tests only.
pub async fn in_memory_database() -> DatabaseConnection {
    let db = DatabaseConnection::new(StorageConfig::in_memory())
        .await
        .unwrap_or_else(|e| panic!("failed to open in-memory database: {}", e));
    db.migrate()
        .await
        .unwrap_or_else(|e| panic!("failed to migrate in-memory database: {}", e));
    db
}

/// Create a run repository over a fresh in-memory database
pub async fn in_memory_repository() -> SeaOrmRunRepository {
    SeaOrmRunRepository::new(in_memory_database().await)
}
