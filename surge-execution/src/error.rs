//! Error types for process supervision

use thiserror::Error;

/// Result alias for execution operations
pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Process supervision errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to spawn workload: {0}")]
    SpawnFailed(String),

    #[error("Run {0} already has a live process")]
    AlreadyTracked(uuid::Uuid),

    #[error("Workload exited before a pid could be observed")]
    NoPid,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
