//! Request and response models for the REST API

pub mod common;
pub mod runs;

pub use common::ApiResponse;
pub use runs::{CreateRunRequest, ListRunsQuery, StopRunResponse};
