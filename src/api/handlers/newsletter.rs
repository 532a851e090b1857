use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{query_value, QueryMap};
use crate::api::middleware::auth::ApiKey;
use crate::api::validators::{CreateSubscriberRequest, NewsletterValidator};
use crate::api::AppState;
use crate::db::models::{NewsletterFilter, NewsletterRepository, Subscriber};
use crate::db::search;
use crate::error::{conflict_on_unique, AppError, AppResult};

/// `?search=` and `?is_subscribed=` as accepted by both subscriber listings.
pub fn subscriber_filter(query: &QueryMap) -> NewsletterFilter {
    NewsletterFilter {
        // Present but blank still filters, to unsubscribed.
        is_subscribed: NewsletterFilter::parse_is_subscribed(query.get("is_subscribed").map(String::as_str)),
        search: query_value(query, "search").map(search::terms).unwrap_or_default(),
    }
}

/// GET /api/v1/newsletter/?search=<text>&is_subscribed=<bool>
pub async fn list(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Query(query): Query<QueryMap>,
) -> AppResult<Json<Value>> {
    let subscribers = NewsletterRepository::list(&state.db, &subscriber_filter(&query)).await?;
    let total = subscribers.len();
    Ok(Json(json!({ "data": subscribers, "total": total })))
}

/// POST /api/v1/newsletter/
///
/// A second submission of the same address is a conflict, never an update.
pub async fn create(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    body: Result<Json<CreateSubscriberRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Subscriber>)> {
    let new_sub = body
        .map_err(AppError::from)
        .and_then(|Json(req)| NewsletterValidator::new().validate(&req))
        .inspect_err(|_| state.metrics.inc_subscriber_rejected())?;

    let subscriber = NewsletterRepository::insert(&state.db, &new_sub)
        .await
        .map_err(|e| conflict_on_unique(e, "A newsletter subscriber with this email already exists."))
        .inspect_err(|_| state.metrics.inc_subscriber_rejected())?;

    state.metrics.inc_subscriber_created();
    tracing::info!(subscriber_id = subscriber.id, "Newsletter subscriber created");

    Ok((StatusCode::CREATED, Json(subscriber)))
}
