//! REST API for the Surge load test orchestrator
//!
//! Transport binding over the [`surge_interfaces::RunLifecycle`] trait: the
//! handlers here never touch the database or the supervisor directly, which
//! keeps them testable against in-memory lifecycle stubs.

pub mod app;
pub mod context;
pub mod errors;
pub mod handlers;
pub mod models;

pub use app::{create_rest_app, AppConfig};
pub use context::{RunRequestDefaults, RunsContext};
pub use errors::{RestError, RestResult};
