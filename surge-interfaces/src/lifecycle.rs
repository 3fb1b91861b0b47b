//! Run lifecycle interface
//!
//! The lifecycle controller is the orchestrator's public API surface: it is
//! the only component allowed to write run status, and it coordinates the
//! record store with the process supervisor. The REST layer depends on this
//! trait, not on the concrete service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::DatabaseError;
use crate::types::UnifiedRun;

/// Validated parameters for starting a run
///
/// Defaulting of absent or non-numeric caller input happens at the transport
/// boundary; by the time a request reaches the lifecycle these values are
/// positive integers and a concrete target URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRunRequest {
    pub duration_secs: u32,
    pub clients: u32,
    pub url: String,
}

/// Outcome of a stop request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// A live handle was signalled and the record marked stopped
    Signalled,
    /// No live handle existed; the persisted record was reconciled to stopped
    Reconciled,
    /// The run had already reached a terminal state; nothing changed
    AlreadyFinished,
}

/// Errors surfaced by lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Invalid run parameters: {0}")]
    Validation(String),

    #[error("Run not found: {0}")]
    NotFound(Uuid),

    #[error("Failed to launch workload: {0}")]
    Spawn(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Public operations of the load test orchestrator
#[async_trait]
pub trait RunLifecycle: Send + Sync {
    /// Create a run record, spawn the workload and return immediately
    ///
    /// Fire-and-forget: only record creation and the spawn itself are
    /// awaited. Completion is observable by polling the record.
    async fn start_run(&self, request: StartRunRequest) -> Result<UnifiedRun, LifecycleError>;

    /// Request termination of a run
    ///
    /// Signals the tracked process if one exists, marks the record stopped
    /// either way, and schedules forceful escalation. Idempotent for runs
    /// that already finished.
    async fn stop_run(&self, id: Uuid) -> Result<StopOutcome, LifecycleError>;

    /// Most recent runs first, bounded
    async fn list_runs(&self, limit: u64) -> Result<Vec<UnifiedRun>, LifecycleError>;

    /// Fetch a single run record
    async fn get_run(&self, id: Uuid) -> Result<UnifiedRun, LifecycleError>;

    /// Raw contents of the run's captured output artifact
    ///
    /// Returns partial output for a still-running test; `NotFound` when the
    /// run or its artifact is missing.
    async fn get_run_log(&self, id: Uuid) -> Result<String, LifecycleError>;
}
