use axum::{extract::State, http::Uri, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use crate::api::AppState;

/// Liveness plus store connectivity. Always 200; a broken store shows up as `degraded`.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let (status, database, sqlite_version) = match crate::db::ping(&state.db).await {
        Ok(version) => ("ok", "healthy".to_string(), Some(version)),
        Err(e) => {
            tracing::warn!("Health check: database unreachable: {}", e);
            ("degraded", format!("unhealthy: {}", e), None)
        }
    };

    Json(json!({
        "status": status,
        "database": database,
        "service_version": env!("CARGO_PKG_VERSION"),
        "sqlite_version": sqlite_version,
        "rust_version": env!("LEAD_INTAKE_RUSTC_VERSION"),
    }))
}

pub async fn debug_path(uri: Uri) -> Json<Value> {
    Json(json!({ "path": uri.path() }))
}
