//! Run orchestration endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use surge_interfaces::{StartRunRequest, StopOutcome, UnifiedRun};

use crate::context::RunsContext;
use crate::errors::{RestError, RestResult};
use crate::models::{ApiResponse, CreateRunRequest, ListRunsQuery, StopRunResponse};

fn parse_run_id(raw: &str) -> RestResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| RestError::BadRequest(format!("Invalid run ID '{}', expected a UUID", raw)))
}

/// Start a new load test run
#[instrument(skip(ctx, body))]
pub async fn create_run(
    State(ctx): State<RunsContext>,
    Json(body): Json<CreateRunRequest>,
) -> RestResult<(StatusCode, Json<ApiResponse<UnifiedRun>>)> {
    let defaults = &ctx.defaults;
    let request = StartRunRequest {
        duration_secs: body.duration.filter(|d| *d > 0).unwrap_or(defaults.duration_secs),
        clients: body.clients.filter(|c| *c > 0).unwrap_or(defaults.clients),
        url: body
            .url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| defaults.url.clone()),
    };

    info!(
        duration_secs = request.duration_secs,
        clients = request.clients,
        url = %request.url,
        "Starting load test run"
    );

    let run = ctx.lifecycle.start_run(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(run))))
}

/// List recent runs, most recent first
#[instrument(skip(ctx))]
pub async fn list_runs(
    State(ctx): State<RunsContext>,
    Query(query): Query<ListRunsQuery>,
) -> RestResult<Json<ApiResponse<Vec<UnifiedRun>>>> {
    let limit = query
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(ctx.defaults.list_limit)
        .min(ctx.defaults.max_list_limit);

    let runs = ctx.lifecycle.list_runs(limit).await?;
    let count = runs.len();
    Ok(Json(ApiResponse::with_list_meta(runs, count, limit)))
}

/// Fetch a single run record
#[instrument(skip(ctx))]
pub async fn get_run(
    State(ctx): State<RunsContext>,
    Path(id): Path<String>,
) -> RestResult<Json<ApiResponse<UnifiedRun>>> {
    let id = parse_run_id(&id)?;
    let run = ctx.lifecycle.get_run(id).await?;
    Ok(Json(ApiResponse::new(run)))
}

/// Request termination of a run
#[instrument(skip(ctx))]
pub async fn stop_run(
    State(ctx): State<RunsContext>,
    Path(id): Path<String>,
) -> RestResult<Json<ApiResponse<StopRunResponse>>> {
    let id = parse_run_id(&id)?;
    let outcome = ctx.lifecycle.stop_run(id).await?;

    let message = match outcome {
        StopOutcome::Signalled => "Load test stopping".to_string(),
        StopOutcome::Reconciled => "Load test marked as stopped".to_string(),
        StopOutcome::AlreadyFinished => "Load test already finished".to_string(),
    };
    info!(%id, ?outcome, "Stop request processed");
    Ok(Json(ApiResponse::new(StopRunResponse { message })))
}

/// Raw captured output of a run, served as plain text
#[instrument(skip(ctx))]
pub async fn get_run_log(
    State(ctx): State<RunsContext>,
    Path(id): Path<String>,
) -> RestResult<Response> {
    let id = parse_run_id(&id)?;
    let content = ctx.lifecycle.get_run_log(id).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        content,
    )
        .into_response())
}
