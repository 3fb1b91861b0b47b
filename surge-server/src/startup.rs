//! Server startup and shutdown logic

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tracing::info;

use surge_config::SurgeConfig;
use surge_rest_api::{app::AppConfig as RestAppConfig, create_rest_app};

use crate::services::ServiceContainer;

/// Server application struct
pub struct Server {
    config: SurgeConfig,
    services: ServiceContainer,
}

impl Server {
    /// Create a new server instance
    pub async fn new(config: SurgeConfig) -> Result<Self> {
        let services = ServiceContainer::new(&config).await?;
        Ok(Self { config, services })
    }

    /// Build the complete application router
    pub fn build_app(&self) -> Router {
        let rest_config = RestAppConfig {
            api_prefix: self.config.server.api_prefix.clone(),
            enable_cors: self.config.server.enable_cors,
            enable_tracing: self.config.server.enable_tracing,
        };

        let rest_app = create_rest_app(self.services.rest_context(&self.config), rest_config);

        Router::new().merge(rest_app).route("/", get(root_handler))
    }

    /// Start the server and block until shutdown
    pub async fn start(self) -> Result<()> {
        let app = self.build_app();
        let addr = self.config.server.socket_addr();

        self.log_config_summary();

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        info!("Server shutdown complete");
        Ok(())
    }

    fn log_config_summary(&self) {
        info!("Bind address: {}", self.config.server.socket_addr());
        info!("API prefix: {}", self.config.server.api_prefix);
        info!("Database: {}", self.config.database.url);
        info!("Workload: {}", self.config.loadtest.workload.program);
        info!("Log directory: {}", self.config.loadtest.log_dir);
        info!(
            "CORS: {}",
            if self.config.server.enable_cors {
                "enabled"
            } else {
                "disabled"
            }
        );
    }
}

/// Root handler describing the service
async fn root_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "service": "Surge Load Test Orchestrator",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "rest_api": "/api/v1",
            "health": "/api/v1/health"
        }
    }))
}

/// Resolves when SIGINT or SIGTERM arrives
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
