//! Full-stack tests through the HTTP surface
//!
//! Build the real application router over real services, with the workload
//! program swapped for a small shell script.

use std::os::unix::fs::PermissionsExt;
use std::time::Duration;

use axum_test::TestServer;
use serde_json::{json, Value};

use surge_config::SurgeConfig;
use surge_server::Server;

async fn test_config(dir: &tempfile::TempDir, script: &str) -> SurgeConfig {
    let program = dir.path().join("workload.sh");
    tokio::fs::write(&program, format!("#!/bin/sh\n{}\n", script))
        .await
        .unwrap();
    let mut perms = tokio::fs::metadata(&program).await.unwrap().permissions();
    perms.set_mode(0o755);
    tokio::fs::set_permissions(&program, perms).await.unwrap();

    let mut config = SurgeConfig::default();
    config.database.url = "sqlite::memory:".to_string();
    // Pooled in-memory SQLite connections each get their own database
    config.database.max_connections = 1;
    config.loadtest.log_dir = dir.path().join("logs").to_string_lossy().into_owned();
    config.loadtest.workload.program = program.to_string_lossy().into_owned();
    config
}

async fn test_server(config: SurgeConfig) -> TestServer {
    let server = Server::new(config).await.unwrap();
    TestServer::new(server.build_app()).unwrap()
}

async fn wait_for_status(server: &TestServer, id: &str, expected: &str) -> Value {
    for _ in 0..100 {
        let response = server.get(&format!("/api/v1/runs/{}", id)).await;
        let body: Value = response.json();
        if body["data"]["status"] == expected {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("run {} never reached status {}", id, expected);
}

#[tokio::test]
async fn test_create_poll_and_fetch_log() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir, "echo requests: 42").await;
    let server = test_server(config).await;

    let response = server
        .post("/api/v1/runs")
        .json(&json!({"duration": 1, "clients": 1, "url": "http://localhost/"}))
        .await;
    response.assert_status(http::StatusCode::CREATED);
    let body: Value = response.json();
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "running");

    let finished = wait_for_status(&server, &id, "completed").await;
    assert!(finished["data"]["output"]
        .as_str()
        .unwrap()
        .contains("requests: 42"));

    let log = server.get(&format!("/api/v1/runs/{}/log", id)).await;
    log.assert_status_ok();
    assert!(log.text().contains("requests: 42"));
}

#[tokio::test]
async fn test_stop_flow_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir, "sleep 30").await;
    let server = test_server(config).await;

    let response = server.post("/api/v1/runs").json(&json!({})).await;
    let body: Value = response.json();
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let stop = server.post(&format!("/api/v1/runs/{}/stop", id)).await;
    stop.assert_status_ok();

    wait_for_status(&server, &id, "stopped").await;
}

#[tokio::test]
async fn test_list_runs_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir, "true").await;
    let server = test_server(config).await;

    for _ in 0..2 {
        server
            .post("/api/v1/runs")
            .json(&json!({"duration": 1, "clients": 1, "url": "http://localhost/"}))
            .await
            .assert_status(http::StatusCode::CREATED);
    }

    let response = server.get("/api/v1/runs").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_root_endpoint_describes_service() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir, "true").await;
    let server = test_server(config).await;

    let response = server.get("/").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "running");
}
