use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::interview::error::{GenerationError, InterviewError};
use crate::interview::profile::ValidationError;
use crate::interview::session::SessionBusy;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error(transparent)]
    Busy(#[from] SessionBusy),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<InterviewError> for AppError {
    fn from(err: InterviewError) -> Self {
        match err {
            InterviewError::Validation(e) => AppError::Validation(e),
            e @ InterviewError::InvalidTransition { .. } => {
                AppError::InvalidTransition(e.to_string())
            }
            InterviewError::Generation(e) => AppError::Generation(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationError::single("body", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(ValidationError::single("path", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                e.to_string(),
                Some(json!(e.violations)),
            ),
            AppError::InvalidTransition(msg) => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", msg.clone(), None)
            }
            AppError::Busy(e) => (StatusCode::CONFLICT, "SESSION_BUSY", e.to_string(), None),
            AppError::Generation(e) => {
                tracing::error!("Generation error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    e.to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let (Some(details), Value::Object(map)) = (details, &mut error) {
            map.insert("details".to_string(), details);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
