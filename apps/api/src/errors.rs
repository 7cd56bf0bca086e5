use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::interview::profile::ValidationError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            AppError::Llm(e) => {
                // Upstream failures are reported, never papered over with partial text.
                tracing::error!("LLM error: {e}");
                let code = match e {
                    LlmError::Unauthorized(_) => "LLM_AUTH_ERROR",
                    LlmError::Http(_) => "LLM_UNREACHABLE",
                    _ => "LLM_ERROR",
                };
                (StatusCode::BAD_GATEWAY, code, e.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
