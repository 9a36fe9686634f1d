// ABOUTME: Shared API response envelope and error-to-status mapping
// ABOUTME: Provides consistent response format across all API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use serde::Serialize;

use notewise_ai::AiError;
use notewise_storage::StorageError;

/// Standard API response wrapper.
///
/// On success `data` carries the payload; on failure `error` carries a stable
/// code string clients branch on and `message` the human-readable text.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(code.into()),
            message: Some(message.into()),
        }
    }
}

/// Stable error code for an AI failure.
pub fn ai_error_code(error: &AiError) -> &'static str {
    match error {
        AiError::Configuration => "CONFIG_ERROR",
        AiError::UserNotFound => "USER_NOT_FOUND",
        AiError::QuotaExceeded => "AI_LIMIT_EXCEEDED",
        AiError::RateLimited => "RATE_LIMIT_EXCEEDED",
        AiError::IncompleteResponse | AiError::Upstream(_) => "AI_ERROR",
        AiError::Storage(_) => "INTERNAL_ERROR",
    }
}

/// Convert AI core errors to HTTP responses
pub fn ai_error_response(error: AiError) -> axum::response::Response {
    let status = match &error {
        AiError::QuotaExceeded | AiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        AiError::UserNotFound => StatusCode::NOT_FOUND,
        AiError::Configuration
        | AiError::IncompleteResponse
        | AiError::Upstream(_)
        | AiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    // Storage detail stays in the logs, not in the response body
    let message = match &error {
        AiError::Storage(_) => "Internal server error".to_string(),
        other => other.to_string(),
    };

    let body = ApiResponse::<()>::error(ai_error_code(&error), message);

    (status, ResponseJson(body)).into_response()
}

/// Convert storage errors to HTTP responses
pub fn storage_error_response(error: StorageError) -> axum::response::Response {
    let (status, code, message) = match &error {
        StorageError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", "Record not found"),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error",
        ),
    };

    let body = ApiResponse::<()>::error(code, message);
    (status, ResponseJson(body)).into_response()
}
