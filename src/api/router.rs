use axum::{routing::{get, patch}, Router};
use std::sync::Arc;
use super::AppState;
use super::handlers;

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Health & debug (public)
        .route("/backend/health/", get(handlers::health::health_check))
        .route("/backend/debug/", get(handlers::health::debug_path))
        .route("/backend/metrics", get(handlers::metrics::prometheus_metrics))
        // Leads (API key)
        .route("/backend/api/v1/leads/", get(handlers::leads::list).post(handlers::leads::create))
        // Newsletter (API key)
        .route("/backend/api/v1/newsletter/", get(handlers::newsletter::list).post(handlers::newsletter::create))
        // Unversioned aliases, kept for older form deployments
        .route("/backend/api/leads/", get(handlers::leads::list).post(handlers::leads::create))
        .route("/backend/api/newsletter/", get(handlers::newsletter::list).post(handlers::newsletter::create))
        // Admin (API key)
        .route("/backend/admin/choices/", get(handlers::admin::choices))
        .route("/backend/admin/leads/", get(handlers::admin::list_leads))
        .route(
            "/backend/admin/leads/{id}/",
            get(handlers::admin::get_lead)
                .patch(handlers::admin::update_lead)
                .delete(handlers::admin::delete_lead),
        )
        .route("/backend/admin/clients/", get(handlers::admin::list_clients).post(handlers::admin::create_client))
        .route("/backend/admin/newsletter/", get(handlers::admin::list_subscribers))
        .route("/backend/admin/newsletter/{id}/", patch(handlers::admin::update_subscriber))
        .with_state(state)
}
