use axum::extract::rejection::JsonRejection;
use thiserror::Error;

use crate::api::validators::ValidationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid or missing API key")]
    AuthFailed,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed")]
    InvalidFields(Vec<ValidationError>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Request was throttled. Expected available in {retry_after_secs} seconds.")]
    TooManyRequests { retry_after_secs: u64 },
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::{header, StatusCode};
        use axum::Json;
        use serde_json::json;

        let status = match &self {
            AppError::AuthFailed => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidFields(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.to_string();
        match self {
            AppError::InvalidFields(errors) => (
                status,
                Json(json!({ "error": "Validation failed", "errors": errors })),
            )
                .into_response(),
            AppError::TooManyRequests { retry_after_secs } => (
                status,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                Json(json!({ "error": message })),
            )
                .into_response(),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (status, Json(json!({ "error": "Internal server error" }))).into_response()
            }
            AppError::Internal(_) => {
                tracing::error!("{}", message);
                (status, Json(json!({ "error": "Internal server error" }))).into_response()
            }
            _ => (status, Json(json!({ "error": message }))).into_response(),
        }
    }
}

/// Map a unique-constraint violation on insert to `Conflict`, everything else to `Database`.
pub fn conflict_on_unique(err: sqlx::Error, message: impl Into<String>) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(message.into()),
        _ => AppError::Database(err),
    }
}

pub type AppResult<T> = Result<T, AppError>;
