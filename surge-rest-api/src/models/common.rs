//! Shared response envelope types

use serde::Serialize;

/// Standard wrapper for successful API responses
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

/// Collection metadata attached to list responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub count: usize,
    pub limit: u64,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data, meta: None }
    }

    pub fn with_list_meta(data: T, count: usize, limit: u64) -> Self {
        Self {
            data,
            meta: Some(ResponseMeta { count, limit }),
        }
    }
}
