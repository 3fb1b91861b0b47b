//! Repository interfaces for the run record store
//!
//! These traits define the persistence contract without tying callers to a
//! concrete database, which keeps handler and lifecycle tests runnable
//! against in-memory implementations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::{RunStatus, UnifiedRun};

/// Common database error type
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Constraint violation: {message}")]
    Constraint { message: String },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Internal database error: {message}")]
    Internal { message: String },
}

impl DatabaseError {
    pub fn internal(message: impl Into<String>) -> Self {
        DatabaseError::Internal {
            message: message.into(),
        }
    }
}

/// Repository for load test run records
///
/// The record store is the single source of truth across orchestrator
/// restarts. Only the lifecycle controller writes `status`, and every
/// terminal transition goes through [`RunRepository::finalize`].
#[async_trait]
pub trait RunRepository: Send + Sync {
    /// Check that the repository can serve requests
    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Persist a new run record
    async fn create(&self, run: UnifiedRun) -> Result<UnifiedRun, DatabaseError>;

    /// Find a run by its public identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UnifiedRun>, DatabaseError>;

    /// Most recent runs first, bounded by `limit`
    async fn find_recent(&self, limit: u64) -> Result<Vec<UnifiedRun>, DatabaseError>;

    /// Record the pid of the freshly spawned subprocess
    async fn record_pid(&self, id: Uuid, pid: i32) -> Result<(), DatabaseError>;

    /// Atomically transition a run out of `Running`
    ///
    /// Sets `status`, clears `pid` and, when `output` is given, stores the
    /// bounded output snapshot — but only if the record is still `Running`.
    /// Returns `true` when a row transitioned, `false` when the run was
    /// already terminal (or unknown). Both finalization paths (natural exit
    /// and explicit stop) use this, so a terminal record is never
    /// overwritten.
    async fn finalize(
        &self,
        id: Uuid,
        status: RunStatus,
        output: Option<String>,
    ) -> Result<bool, DatabaseError>;
}
