//! API error types and conversions

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::MonitorError;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Invalid request payload or parameters
    InvalidRequest(String),

    /// Resource not found
    NotFound(String),

    /// Internal server error
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<MonitorError> for ApiError {
    fn from(err: MonitorError) -> Self {
        match err {
            MonitorError::NotFound(_) => ApiError::NotFound("Event not found".to_string()),
            MonitorError::InvalidPayload(_) => ApiError::InvalidRequest(err.to_string()),
            MonitorError::InvalidRange { .. } | MonitorError::ActorUnavailable => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}
