use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{query_value, QueryMap};
use crate::api::middleware::auth::ApiKey;
use crate::api::middleware::throttle::LeadCreateThrottle;
use crate::api::validators::{CreateLeadRequest, LeadValidator};
use crate::api::AppState;
use crate::db::models::{Lead, LeadFilter, LeadOrder, LeadRepository, LeadStatus};
use crate::error::{AppError, AppResult};

/// GET /api/v1/leads/?status=<status>
///
/// An unknown status yields an empty list rather than a 400.
pub async fn list(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Query(query): Query<QueryMap>,
) -> AppResult<Json<Value>> {
    let status = match query_value(&query, "status") {
        None => None,
        Some(raw) => match LeadStatus::parse(raw) {
            Some(status) => Some(status),
            None => return Ok(Json(json!({ "data": [], "total": 0 }))),
        },
    };

    let filter = LeadFilter {
        status,
        ..Default::default()
    };
    let leads = LeadRepository::list(&state.db, &filter, LeadOrder::Id).await?;
    let total = leads.len();
    Ok(Json(json!({ "data": leads, "total": total })))
}

/// POST /api/v1/leads/
pub async fn create(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    _throttle: LeadCreateThrottle,
    body: Result<Json<CreateLeadRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Lead>)> {
    let new_lead = body
        .map_err(AppError::from)
        .and_then(|Json(req)| LeadValidator::new().validate(&req))
        .inspect_err(|_| state.metrics.inc_lead_rejected())?;

    let lead = LeadRepository::insert(&state.db, &new_lead).await?;
    state.metrics.inc_lead_created();
    tracing::info!(lead_id = lead.id, source = %lead.source, category = %lead.category, "Lead created");

    Ok((StatusCode::CREATED, Json(lead)))
}
