//! Unified API types shared by storage, orchestration and the REST surface

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a load test run
///
/// `Running` is the only non-terminal state. Terminal states are absorbing:
/// no transition ever leaves `Completed`, `Failed` or `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
    Stopped,
}

impl RunStatus {
    /// Whether this status can still transition
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Running)
    }

    /// Terminal status for a natural process exit
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => RunStatus::Completed,
            // Nonzero exit or killed by signal
            _ => RunStatus::Failed,
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// A load test run and its persisted outcome
///
/// The record store owns everything in here; the live process handle is held
/// separately by the supervisor. `pid` is observability only and is cleared
/// on finalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedRun {
    /// Unique identifier, assigned at creation, immutable
    pub id: Uuid,
    /// When the run was created
    pub start_time: DateTime<Utc>,
    /// Requested run length in seconds
    pub duration_secs: u32,
    /// Requested concurrency level
    pub clients: u32,
    /// Target endpoint for the workload
    pub url: String,
    /// Current lifecycle status
    pub status: RunStatus,
    /// OS pid of the live subprocess while running, `None` otherwise
    pub pid: Option<i32>,
    /// Path of the artifact accumulating captured output; set before spawn
    pub log_file: String,
    /// Bounded snapshot of captured output, written at finalization
    pub output: String,
}

impl UnifiedRun {
    /// Create a new run record in `Running` state with no pid yet
    pub fn new(duration_secs: u32, clients: u32, url: String, log_file: String) -> Self {
        Self::with_id(Uuid::new_v4(), duration_secs, clients, url, log_file)
    }

    /// Like [`UnifiedRun::new`], with a caller-assigned id
    ///
    /// For callers that derive the log artifact path from the id and so
    /// need it before the record exists.
    pub fn with_id(
        id: Uuid,
        duration_secs: u32,
        clients: u32,
        url: String,
        log_file: String,
    ) -> Self {
        Self {
            id,
            start_time: Utc::now(),
            duration_secs,
            clients,
            url,
            status: RunStatus::Running,
            pid: None,
            log_file,
            output: String::new(),
        }
    }
}
