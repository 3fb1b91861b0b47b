//! Process supervisor
//!
//! Owns the mapping from run id to live OS process. The map is scoped to the
//! lifetime of the orchestrator process; after a restart it is empty and the
//! persisted record store is the only authority (the lifecycle controller
//! reconciles stop requests for untracked runs).

use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::capture::OutputCapture;
use crate::error::ExecutionError;
use crate::workload::{Workload, WorkloadSpec};

/// Supervisor tuning knobs
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Delay between SIGTERM and the SIGKILL escalation
    pub grace_period: Duration,
    /// How long to wait for output streams to reach EOF after process exit
    ///
    /// Forked worker processes inherit the pipe write-ends; the drain must
    /// not wait for them after the direct child is gone.
    pub drain_timeout: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_secs(5),
            drain_timeout: Duration::from_secs(2),
        }
    }
}

/// Outcome of a supervised process, reported exactly once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Terminating signal, when there was one
    pub signal: Option<i32>,
}

impl ExitOutcome {
    /// Whether the workload finished successfully
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Receives the exit outcome of a supervised process
///
/// Invoked from the supervisor's watcher task after output capture has
/// drained. The tracking entry is removed after the observer returns, no
/// matter what the observer did.
#[async_trait]
pub trait ExitObserver: Send + Sync {
    async fn on_exit(&self, run_id: Uuid, outcome: ExitOutcome);
}

#[derive(Debug, Clone, Copy)]
struct RunHandle {
    pid: i32,
}

/// Supervises one OS process per in-flight run
pub struct ProcessSupervisor {
    config: SupervisorConfig,
    handles: Arc<Mutex<HashMap<Uuid, RunHandle>>>,
}

impl ProcessSupervisor {
    /// Create a new supervisor
    pub fn new(config: SupervisorConfig) -> Self {
        Self {
            config,
            handles: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a supervisor with default configuration
    pub fn with_defaults() -> Self {
        Self::new(SupervisorConfig::default())
    }

    /// Launch the workload for `run_id`, wiring output into `log_path`
    ///
    /// Returns the child pid. A watcher task waits for process exit, drains
    /// the capture streams (bounded by the drain timeout), invokes
    /// `observer` exactly once and then drops the tracking entry — always,
    /// so a failing observer can never leak a handle.
    pub async fn spawn(
        &self,
        run_id: Uuid,
        workload: &dyn Workload,
        spec: &WorkloadSpec,
        log_path: &Path,
        observer: Arc<dyn ExitObserver>,
    ) -> Result<i32, ExecutionError> {
        {
            let handles = self.handles.lock().await;
            if handles.contains_key(&run_id) {
                return Err(ExecutionError::AlreadyTracked(run_id));
            }
        }

        let mut command = workload.command(spec);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Own process group, so termination signals reach forked worker
            // processes and not just the direct child.
            .process_group(0);

        let mut child = command
            .spawn()
            .map_err(|e| ExecutionError::SpawnFailed(format!("{}: {}", workload.describe(), e)))?;

        let pid = child.id().ok_or(ExecutionError::NoPid)? as i32;
        info!(%run_id, pid, workload = %workload.describe(), "Spawned workload process");

        let capture = OutputCapture::start(log_path, child.stdout.take(), child.stderr.take()).await?;

        self.handles.lock().await.insert(run_id, RunHandle { pid });

        let handles = Arc::clone(&self.handles);
        let drain_timeout = self.config.drain_timeout;
        tokio::spawn(async move {
            let outcome = match child.wait().await {
                Ok(status) => ExitOutcome {
                    exit_code: status.code(),
                    signal: status.signal(),
                },
                Err(e) => {
                    warn!(%run_id, "Failed to await workload process: {}", e);
                    ExitOutcome {
                        exit_code: None,
                        signal: None,
                    }
                }
            };

            // Drain remaining output before anyone snapshots the artifact.
            // Bounded: forked children of the workload hold the pipe open
            // past the direct child's exit.
            capture.finish_within(drain_timeout).await;

            debug!(%run_id, ?outcome, "Workload process exited");
            observer.on_exit(run_id, outcome).await;

            // Removal is unconditional: supervisor state must not outlive
            // the process even when finalization failed upstream.
            handles.lock().await.remove(&run_id);
        });

        Ok(pid)
    }

    /// Request termination of a tracked run
    ///
    /// Sends SIGTERM to the workload's process group immediately, drops the
    /// tracking entry, and schedules a group SIGKILL after the grace period.
    /// Group delivery covers worker processes the workload forked. Signal
    /// failures are ignored: an already-dead process is the desired end
    /// state. Returns `false` when the run has no live handle (already
    /// exited, or lost across a restart).
    pub async fn terminate(&self, run_id: Uuid) -> bool {
        let handle = self.handles.lock().await.remove(&run_id);
        let Some(handle) = handle else {
            debug!(%run_id, "Terminate requested for untracked run");
            return false;
        };

        // Negative pid addresses the process group created at spawn
        let group = Pid::from_raw(-handle.pid);
        info!(%run_id, pid = handle.pid, "Sending SIGTERM to workload process group");
        if let Err(e) = kill(group, Signal::SIGTERM) {
            debug!(%run_id, "SIGTERM delivery failed (process likely gone): {}", e);
        }

        let grace = self.config.grace_period;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            // Escalate; if the group exited within the grace window this
            // fails and that failure is the success case.
            if kill(group, Signal::SIGKILL).is_ok() {
                warn!(%run_id, pid = -group.as_raw(), "Workload ignored SIGTERM, sent SIGKILL");
            }
        });

        true
    }

    /// Pid of the live process for `run_id`, if tracked
    pub async fn tracked_pid(&self, run_id: Uuid) -> Option<i32> {
        self.handles.lock().await.get(&run_id).map(|h| h.pid)
    }

    /// Number of currently tracked runs
    pub async fn tracked_count(&self) -> usize {
        self.handles.lock().await.len()
    }
}
