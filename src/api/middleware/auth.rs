use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;
use crate::error::AppError;
use crate::api::AppState;

/// Axum extractor that checks the shared API key in the `Authorization` header.
/// Put it before any body extractor so a bad key is reported before payload errors.
pub struct ApiKey;

impl FromRequestParts<Arc<AppState>> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(header::AUTHORIZATION)
            .map(|v| v.as_bytes());

        if crate::auth::api_key::verify(presented, state.expected_authorization.as_bytes()) {
            return Ok(ApiKey);
        }

        state.metrics.inc_auth_failed();
        tracing::debug!(path = %parts.uri.path(), "Rejected request with invalid or missing API key");
        Err(AppError::AuthFailed)
    }
}
