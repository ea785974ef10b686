// src/error.rs

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    // 500 Internal Server Error
    #[error("internal server error: {0}")]
    InternalServerError(String),

    // 400 Bad Request (missing or malformed input)
    #[error("validation failed: {0}")]
    BadRequest(String),

    // 404 Not Found
    #[error("not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Machine-readable category sent in the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InternalServerError(_) => "INTERNAL_ERROR",
            AppError::BadRequest(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
        }
    }
}

/// Converts the error into the JSON failure envelope with the matching status code.
/// Internal details are logged, never returned.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        let body = Json(json!({
            "success": false,
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Allows using `?` on store calls.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}
