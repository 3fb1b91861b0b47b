//! REST API specific error types and conversions

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use surge_interfaces::LifecycleError;

/// REST API specific error type
#[derive(Error, Debug)]
pub enum RestError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

impl RestError {
    fn status(&self) -> StatusCode {
        match self {
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
            RestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RestError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            RestError::NotFound(_) => "NOT_FOUND",
            RestError::BadRequest(_) => "BAD_REQUEST",
            RestError::InternalError(_) => "INTERNAL_ERROR",
            RestError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Common constructor for missing resources
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        RestError::NotFound(format!("{} with ID '{}' not found", resource, id))
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_response = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "status": status.as_u16()
            }
        });
        (status, Json(error_response)).into_response()
    }
}

impl From<LifecycleError> for RestError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Validation(msg) => RestError::BadRequest(msg),
            LifecycleError::NotFound(id) => RestError::not_found("Run", id),
            // Internal details stay in the logs, not in the payload
            LifecycleError::Spawn(_) => {
                RestError::InternalError("Failed to launch load test workload".to_string())
            }
            LifecycleError::Database(_) => RestError::InternalError("Database error".to_string()),
            LifecycleError::Io(_) => RestError::InternalError("I/O error".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_error_mapping() {
        let err: RestError = LifecycleError::Validation("bad duration".into()).into();
        assert!(matches!(err, RestError::BadRequest(_)));

        let id = uuid::Uuid::new_v4();
        let err: RestError = LifecycleError::NotFound(id).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_internal_errors_are_sanitized() {
        let err: RestError = LifecycleError::Spawn("/usr/bin/loadtest: ENOENT".into()).into();
        assert!(!err.to_string().contains("ENOENT"));
    }
}
