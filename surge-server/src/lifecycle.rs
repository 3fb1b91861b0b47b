//! Run lifecycle controller
//!
//! Implements [`RunLifecycle`] by coordinating the record store with the
//! process supervisor. Status writes funnel through the repository's
//! conditional finalize, so the stop path and the natural-exit path can race
//! freely without ever overwriting a terminal record.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use surge_execution::{
    read_bounded, ExitObserver, ExitOutcome, ProcessSupervisor, Workload, WorkloadSpec,
};
use surge_interfaces::{
    LifecycleError, RunLifecycle, RunRepository, RunStatus, StartRunRequest, StopOutcome,
    UnifiedRun,
};

/// Tuning for the lifecycle controller
#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    /// Directory receiving one log artifact per run
    pub log_dir: PathBuf,
    /// Cap on the output snapshot written back into the record
    pub max_output_bytes: usize,
}

/// Finalizes run records when their workload process exits
///
/// Registered as the supervisor's exit observer. Reads a bounded snapshot of
/// the log artifact and attempts the conditional terminal transition; a
/// `false` result means a stop request won the race, which is fine.
pub struct RunFinalizer {
    repository: Arc<dyn RunRepository>,
    max_output_bytes: usize,
}

impl RunFinalizer {
    pub fn new(repository: Arc<dyn RunRepository>, max_output_bytes: usize) -> Self {
        Self {
            repository,
            max_output_bytes,
        }
    }
}

#[async_trait]
impl ExitObserver for RunFinalizer {
    async fn on_exit(&self, run_id: Uuid, outcome: ExitOutcome) {
        let status = RunStatus::from_exit_code(outcome.exit_code);

        let output = match self.repository.find_by_id(run_id).await {
            Ok(Some(run)) => {
                match read_bounded(Path::new(&run.log_file), self.max_output_bytes).await {
                    Ok(snapshot) => Some(snapshot),
                    Err(e) => {
                        warn!(%run_id, "Could not snapshot log artifact: {}", e);
                        None
                    }
                }
            }
            Ok(None) => {
                warn!(%run_id, "Exited run has no record");
                return;
            }
            Err(e) => {
                error!(%run_id, "Failed to load run record at exit: {}", e);
                None
            }
        };

        match self.repository.finalize(run_id, status, output).await {
            Ok(true) => {
                info!(%run_id, %status, exit_code = ?outcome.exit_code, signal = ?outcome.signal, "Run finalized")
            }
            Ok(false) => debug!(%run_id, "Run already terminal at process exit"),
            Err(e) => error!(%run_id, "Failed to finalize run: {}", e),
        }
    }
}

/// Production implementation of [`RunLifecycle`]
pub struct RunLifecycleService {
    repository: Arc<dyn RunRepository>,
    supervisor: Arc<ProcessSupervisor>,
    workload: Arc<dyn Workload>,
    finalizer: Arc<RunFinalizer>,
    settings: LifecycleSettings,
}

impl RunLifecycleService {
    pub fn new(
        repository: Arc<dyn RunRepository>,
        supervisor: Arc<ProcessSupervisor>,
        workload: Arc<dyn Workload>,
        settings: LifecycleSettings,
    ) -> Self {
        let finalizer = Arc::new(RunFinalizer::new(
            repository.clone(),
            settings.max_output_bytes,
        ));
        Self {
            repository,
            supervisor,
            workload,
            finalizer,
            settings,
        }
    }

    fn validate(request: &StartRunRequest) -> Result<(), LifecycleError> {
        if request.duration_secs == 0 {
            return Err(LifecycleError::Validation(
                "duration must be positive".to_string(),
            ));
        }
        if request.clients == 0 {
            return Err(LifecycleError::Validation(
                "clients must be positive".to_string(),
            ));
        }
        if request.url.trim().is_empty() {
            return Err(LifecycleError::Validation(
                "url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RunLifecycle for RunLifecycleService {
    async fn start_run(&self, request: StartRunRequest) -> Result<UnifiedRun, LifecycleError> {
        Self::validate(&request)?;

        let id = Uuid::new_v4();
        let log_file = self
            .settings
            .log_dir
            .join(format!("run-{}.log", id))
            .to_string_lossy()
            .into_owned();
        let run = UnifiedRun::with_id(
            id,
            request.duration_secs,
            request.clients,
            request.url.clone(),
            log_file,
        );

        // Persist first: the record must exist before the process does, so
        // the exit observer always finds it.
        let mut run = self.repository.create(run).await?;

        let spec = WorkloadSpec {
            duration_secs: request.duration_secs,
            clients: request.clients,
            url: request.url,
        };

        let observer: Arc<dyn ExitObserver> = self.finalizer.clone();
        let pid = match self
            .supervisor
            .spawn(
                run.id,
                self.workload.as_ref(),
                &spec,
                Path::new(&run.log_file),
                observer,
            )
            .await
        {
            Ok(pid) => pid,
            Err(e) => {
                error!(run_id = %run.id, "Workload launch failed: {}", e);
                let message = format!("Failed to launch workload: {}", e);
                if let Err(db_err) = self
                    .repository
                    .finalize(run.id, RunStatus::Failed, Some(message.clone()))
                    .await
                {
                    error!(run_id = %run.id, "Could not mark failed launch: {}", db_err);
                }
                return Err(LifecycleError::Spawn(message));
            }
        };

        // Best effort: the run is already live, a lost pid only degrades
        // observability.
        if let Err(e) = self.repository.record_pid(run.id, pid).await {
            warn!(run_id = %run.id, pid, "Failed to record workload pid: {}", e);
        } else {
            run.pid = Some(pid);
        }

        info!(run_id = %run.id, pid, clients = run.clients, duration_secs = run.duration_secs, "Run started");
        Ok(run)
    }

    async fn stop_run(&self, id: Uuid) -> Result<StopOutcome, LifecycleError> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(LifecycleError::NotFound(id))?;

        if self.supervisor.terminate(id).await {
            // The watcher task will also race to finalize with the natural
            // exit status; whoever loses sees `false` and backs off.
            let changed = self
                .repository
                .finalize(id, RunStatus::Stopped, None)
                .await?;
            return Ok(if changed {
                StopOutcome::Signalled
            } else {
                StopOutcome::AlreadyFinished
            });
        }

        if record.status.is_terminal() {
            return Ok(StopOutcome::AlreadyFinished);
        }

        // Running on record but no live handle: left over from a previous
        // orchestrator process. Reconcile the record.
        let changed = self
            .repository
            .finalize(id, RunStatus::Stopped, None)
            .await?;
        Ok(if changed {
            StopOutcome::Reconciled
        } else {
            StopOutcome::AlreadyFinished
        })
    }

    async fn list_runs(&self, limit: u64) -> Result<Vec<UnifiedRun>, LifecycleError> {
        Ok(self.repository.find_recent(limit).await?)
    }

    async fn get_run(&self, id: Uuid) -> Result<UnifiedRun, LifecycleError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(LifecycleError::NotFound(id))
    }

    async fn get_run_log(&self, id: Uuid) -> Result<String, LifecycleError> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(LifecycleError::NotFound(id))?;

        // The artifact is opaque workload bytes; invalid UTF-8 is replaced,
        // not rejected.
        match tokio::fs::read(&record.log_file).await {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LifecycleError::NotFound(id))
            }
            Err(e) => Err(LifecycleError::Io(e)),
        }
    }
}
