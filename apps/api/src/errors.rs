use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::GatewayError;
use crate::session::Phase;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// `Validation`, `InvalidState` and `SessionBusy` are raised before any session
/// mutation. `Gateway` never leaves a half-committed turn behind.
/// `FeedbackFailed` is terminal: the session needs a restart.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cannot {action} while the session is in phase '{phase}'")]
    InvalidState { phase: Phase, action: &'static str },

    #[error("A model call is already in flight for this session")]
    SessionBusy,

    #[error("Model gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Feedback generation failed: {0}")]
    FeedbackFailed(GatewayError),
}

impl AppError {
    /// Whether the same request may succeed if the user sends it again.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Gateway(e) => !e.is_fatal(),
            AppError::SessionBusy => true,
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retryable = self.is_retryable();
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidState { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATE", self.to_string())
            }
            AppError::SessionBusy => (StatusCode::CONFLICT, "SESSION_BUSY", self.to_string()),
            AppError::Gateway(e) if e.is_fatal() => {
                tracing::error!("Model gateway error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GATEWAY_ERROR",
                    "The language model rejected the request".to_string(),
                )
            }
            AppError::Gateway(e) => {
                tracing::warn!("Model gateway unavailable: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "GATEWAY_UNAVAILABLE",
                    "The language model is unavailable, please try again".to_string(),
                )
            }
            AppError::FeedbackFailed(e) => {
                tracing::error!("Feedback generation failed: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "FEEDBACK_FAILED",
                    "Feedback could not be generated. Restart to run a new interview".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "retryable": retryable
            }
        }));

        (status, body).into_response()
    }
}
