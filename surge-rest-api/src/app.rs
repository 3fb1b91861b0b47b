//! Application builder for the REST API

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::context::RunsContext;
use crate::handlers::{health, runs};

/// Configuration for the REST application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub enable_cors: bool,
    pub enable_tracing: bool,
    pub api_prefix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_tracing: true,
            api_prefix: "/api/v1".to_string(),
        }
    }
}

/// Build the REST router mounted under `config.api_prefix`
pub fn create_rest_app(ctx: RunsContext, config: AppConfig) -> Router {
    let api = Router::new()
        .route("/runs", post(runs::create_run).get(runs::list_runs))
        .route("/runs/{id}", get(runs::get_run))
        .route("/runs/{id}/stop", post(runs::stop_run))
        .route("/runs/{id}/log", get(runs::get_run_log))
        .route("/health", get(health::live))
        .route("/health/ready", get(health::ready))
        .with_state(ctx);

    let mut app = Router::new().nest(&config.api_prefix, api);

    if config.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }
    if config.enable_tracing {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}
