//! End-to-end orchestration tests
//!
//! Exercise the lifecycle controller against a real supervisor, a migrated
//! in-memory database and small shell workloads.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use uuid::Uuid;

use surge_execution::{ProcessSupervisor, SupervisorConfig, Workload, WorkloadSpec};
use surge_interfaces::{
    LifecycleError, RunLifecycle, RunRepository, RunStatus, StartRunRequest, StopOutcome,
    UnifiedRun,
};
use surge_server::lifecycle::{LifecycleSettings, RunLifecycleService};
use surge_storage::testing::in_memory_repository;

struct ShellWorkload {
    script: String,
}

impl Workload for ShellWorkload {
    fn command(&self, _spec: &WorkloadSpec) -> Command {
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg(&self.script);
        cmd
    }

    fn describe(&self) -> String {
        "sh".to_string()
    }
}

struct Harness {
    lifecycle: RunLifecycleService,
    repository: Arc<dyn RunRepository>,
    log_dir: tempfile::TempDir,
}

async fn harness(script: &str) -> Harness {
    let repository: Arc<dyn RunRepository> = Arc::new(in_memory_repository().await);
    let log_dir = tempfile::tempdir().unwrap();
    let lifecycle = RunLifecycleService::new(
        repository.clone(),
        Arc::new(ProcessSupervisor::new(SupervisorConfig {
            grace_period: Duration::from_secs(2),
            ..SupervisorConfig::default()
        })),
        Arc::new(ShellWorkload {
            script: script.to_string(),
        }),
        LifecycleSettings {
            log_dir: PathBuf::from(log_dir.path()),
            max_output_bytes: 1000,
        },
    );
    Harness {
        lifecycle,
        repository,
        log_dir,
    }
}

fn request() -> StartRunRequest {
    StartRunRequest {
        duration_secs: 5,
        clients: 2,
        url: "http://localhost/".to_string(),
    }
}

async fn wait_terminal(lifecycle: &dyn RunLifecycle, id: Uuid) -> UnifiedRun {
    for _ in 0..100 {
        let run = lifecycle.get_run(id).await.unwrap();
        if run.status.is_terminal() {
            return run;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("run {} never reached a terminal state", id);
}

#[tokio::test]
async fn test_successful_run_completes_with_output() {
    let h = harness("echo requests: 1200; echo errors: 0 >&2").await;

    let run = h.lifecycle.start_run(request()).await.unwrap();
    assert_eq!(run.status, RunStatus::Running);
    assert!(run.pid.is_some());
    assert!(run.log_file.starts_with(h.log_dir.path().to_str().unwrap()));
    assert!(run.log_file.contains(&run.id.to_string()));

    let finished = wait_terminal(&h.lifecycle, run.id).await;
    assert_eq!(finished.status, RunStatus::Completed);
    assert!(finished.pid.is_none());
    assert!(finished.output.contains("requests: 1200"));
    assert!(finished.output.contains("errors: 0"));

    let log = h.lifecycle.get_run_log(run.id).await.unwrap();
    assert!(log.contains("requests: 1200"));
}

#[tokio::test]
async fn test_nonzero_exit_marks_run_failed() {
    let h = harness("echo connection refused; exit 2").await;

    let run = h.lifecycle.start_run(request()).await.unwrap();
    let finished = wait_terminal(&h.lifecycle, run.id).await;
    assert_eq!(finished.status, RunStatus::Failed);
    assert!(finished.output.contains("connection refused"));
}

#[tokio::test]
async fn test_spawn_failure_finalizes_record() {
    let repository: Arc<dyn RunRepository> = Arc::new(in_memory_repository().await);
    let log_dir = tempfile::tempdir().unwrap();
    let lifecycle = RunLifecycleService::new(
        repository.clone(),
        Arc::new(ProcessSupervisor::with_defaults()),
        Arc::new(surge_execution::CommandWorkload::new(
            "/nonexistent/load-generator",
            vec![],
        )),
        LifecycleSettings {
            log_dir: PathBuf::from(log_dir.path()),
            max_output_bytes: 1000,
        },
    );

    let result = lifecycle.start_run(request()).await;
    assert!(matches!(result, Err(LifecycleError::Spawn(_))));

    // The one record that exists was marked failed
    let runs = repository.find_recent(10).await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, RunStatus::Failed);
}

#[tokio::test]
async fn test_stop_signals_live_run() {
    let h = harness("sleep 30").await;

    let run = h.lifecycle.start_run(request()).await.unwrap();
    let outcome = h.lifecycle.stop_run(run.id).await.unwrap();
    assert_eq!(outcome, StopOutcome::Signalled);

    let stopped = h.lifecycle.get_run(run.id).await.unwrap();
    assert_eq!(stopped.status, RunStatus::Stopped);
    assert!(stopped.pid.is_none());

    // The watcher observes the SIGTERM death afterwards; it must not
    // overwrite the stopped record with failed.
    tokio::time::sleep(Duration::from_millis(500)).await;
    let still = h.lifecycle.get_run(run.id).await.unwrap();
    assert_eq!(still.status, RunStatus::Stopped);
}

#[tokio::test]
async fn test_stop_is_idempotent_after_completion() {
    let h = harness("true").await;

    let run = h.lifecycle.start_run(request()).await.unwrap();
    wait_terminal(&h.lifecycle, run.id).await;

    let outcome = h.lifecycle.stop_run(run.id).await.unwrap();
    assert_eq!(outcome, StopOutcome::AlreadyFinished);

    let record = h.lifecycle.get_run(run.id).await.unwrap();
    assert_eq!(record.status, RunStatus::Completed);
}

#[tokio::test]
async fn test_stop_unknown_run_is_not_found() {
    let h = harness("true").await;
    let result = h.lifecycle.stop_run(Uuid::new_v4()).await;
    assert!(matches!(result, Err(LifecycleError::NotFound(_))));
}

#[tokio::test]
async fn test_stop_reconciles_record_without_live_handle() {
    let h = harness("true").await;

    // A record left running by a previous orchestrator process
    let orphan = UnifiedRun::new(60, 10, "http://localhost/".into(), "/tmp/orphan.log".into());
    let orphan = h.repository.create(orphan).await.unwrap();

    let outcome = h.lifecycle.stop_run(orphan.id).await.unwrap();
    assert_eq!(outcome, StopOutcome::Reconciled);

    let record = h.lifecycle.get_run(orphan.id).await.unwrap();
    assert_eq!(record.status, RunStatus::Stopped);
}

#[tokio::test]
async fn test_get_run_log_missing_artifact() {
    let h = harness("true").await;

    let run = UnifiedRun::new(60, 10, "http://localhost/".into(), "/nonexistent/run.log".into());
    let run = h.repository.create(run).await.unwrap();

    let result = h.lifecycle.get_run_log(run.id).await;
    assert!(matches!(result, Err(LifecycleError::NotFound(_))));
}

#[tokio::test]
async fn test_get_run_log_tolerates_binary_output() {
    let h = harness("true").await;

    let path = h.log_dir.path().join("binary.log");
    tokio::fs::write(&path, b"requests: 7\n\xff\xfe\x00raw")
        .await
        .unwrap();

    let run = UnifiedRun::new(
        60,
        10,
        "http://localhost/".into(),
        path.to_string_lossy().into_owned(),
    );
    let run = h.repository.create(run).await.unwrap();

    let log = h.lifecycle.get_run_log(run.id).await.unwrap();
    assert!(log.contains("requests: 7"));
    assert!(log.contains('\u{FFFD}'));
}

#[tokio::test]
async fn test_output_snapshot_is_bounded() {
    // 5000 bytes of output against a 1000 byte cap
    let h = harness("i=0; while [ $i -lt 100 ]; do printf '%049d\\n' $i; i=$((i+1)); done").await;

    let run = h.lifecycle.start_run(request()).await.unwrap();
    let finished = wait_terminal(&h.lifecycle, run.id).await;

    assert_eq!(finished.status, RunStatus::Completed);
    assert!(finished.output.len() <= 1000);

    // Full artifact is still intact on disk
    let log = h.lifecycle.get_run_log(run.id).await.unwrap();
    assert_eq!(log.len(), 5000);
}

#[tokio::test]
async fn test_list_runs_most_recent_first() {
    let h = harness("true").await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let run = h.lifecycle.start_run(request()).await.unwrap();
        ids.push(run.id);
        // Records order by start time; keep the clock moving between runs
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let listed = h.lifecycle.list_runs(2).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, ids[2]);
    assert_eq!(listed[1].id, ids[1]);
}
