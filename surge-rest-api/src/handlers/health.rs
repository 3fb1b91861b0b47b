//! Health and readiness endpoints

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::context::RunsContext;
use crate::errors::{RestError, RestResult};

/// Liveness probe; answers as long as the process is serving requests
pub async fn live() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness probe; verifies the record store is reachable
pub async fn ready(State(ctx): State<RunsContext>) -> RestResult<Json<Value>> {
    ctx.repository
        .health_check()
        .await
        .map_err(|e| RestError::ServiceUnavailable(format!("Database not ready: {}", e)))?;
    Ok(Json(json!({ "status": "ready" })))
}
