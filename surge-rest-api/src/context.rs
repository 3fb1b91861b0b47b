//! Context types for dependency injection in REST API handlers

use std::sync::Arc;

use surge_interfaces::{RunLifecycle, RunRepository};

/// Defaults applied to absent or unusable caller input
///
/// Mirrors the configured loadtest domain; wired by the server at startup.
#[derive(Debug, Clone)]
pub struct RunRequestDefaults {
    /// Run length when the caller supplies none
    pub duration_secs: u32,
    /// Concurrency when the caller supplies none
    pub clients: u32,
    /// Target URL when the caller supplies none
    pub url: String,
    /// List size when the caller supplies none
    pub list_limit: u64,
    /// Hard cap on list size
    pub max_list_limit: u64,
}

/// Context for run-related endpoints
#[derive(Clone)]
pub struct RunsContext {
    /// Orchestrator operations
    pub lifecycle: Arc<dyn RunLifecycle>,
    /// Record store, used by the readiness probe
    pub repository: Arc<dyn RunRepository>,
    /// Input defaulting policy
    pub defaults: RunRequestDefaults,
}

impl RunsContext {
    pub fn new(
        lifecycle: Arc<dyn RunLifecycle>,
        repository: Arc<dyn RunRepository>,
        defaults: RunRequestDefaults,
    ) -> Self {
        Self {
            lifecycle,
            repository,
            defaults,
        }
    }
}
