//! JSON admin surface: search/filter listings, lead status changes, client records.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::newsletter::subscriber_filter;
use super::{query_value, QueryMap};
use crate::api::middleware::auth::ApiKey;
use crate::api::validators::{ClientValidator, CreateClientRequest, LeadValidator, UpdateLeadRequest};
use crate::api::AppState;
use crate::db::models::{
    Category, Client, ClientFilter, ClientRepository, Lead, LeadFilter, LeadOrder, LeadRepository,
    LeadSource, LeadStatus, NewsletterRepository, Subscriber,
};
use crate::db::search;
use crate::error::{conflict_on_unique, AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct UpdateSubscriberRequest {
    pub is_subscribed: bool,
}

/// Admin filters reject unknown values instead of silently matching nothing.
fn parse_filter<T>(
    field: &str,
    query: &QueryMap,
    parse: fn(&str) -> Option<T>,
    choices: fn() -> String,
) -> AppResult<Option<T>> {
    match query_value(query, field) {
        None => Ok(None),
        Some(value) => parse(value).map(Some).ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid {} filter '{}'. Must be one of: {}",
                field,
                value,
                choices()
            ))
        }),
    }
}

fn choice_list<T>(all: &[T], value: fn(&T) -> &'static str, label: fn(&T) -> &'static str) -> Value {
    Value::Array(
        all.iter()
            .map(|c| json!({ "value": value(c), "label": label(c) }))
            .collect(),
    )
}

/// GET /admin/choices/: enumerations with display labels, for filter widgets.
pub async fn choices(_auth: ApiKey) -> Json<Value> {
    Json(json!({
        "source": choice_list(LeadSource::ALL, LeadSource::as_str, LeadSource::label),
        "status": choice_list(LeadStatus::ALL, LeadStatus::as_str, LeadStatus::label),
        "category": choice_list(Category::ALL, Category::as_str, Category::label),
    }))
}

/// GET /admin/leads/?search=&source=&status=&category=
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Query(query): Query<QueryMap>,
) -> AppResult<Json<Value>> {
    let filter = LeadFilter {
        status: parse_filter("status", &query, LeadStatus::parse, LeadStatus::choices)?,
        source: parse_filter("source", &query, LeadSource::parse, LeadSource::choices)?,
        category: parse_filter("category", &query, Category::parse, Category::choices)?,
        search: query_value(&query, "search").map(search::terms).unwrap_or_default(),
    };

    let leads = LeadRepository::list(&state.db, &filter, LeadOrder::NewestFirst).await?;
    let total = leads.len();
    Ok(Json(json!({ "data": leads, "total": total })))
}

/// GET /admin/leads/{id}/: the lead and its client record, if converted.
pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let lead = LeadRepository::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lead {} not found", id)))?;
    let client = ClientRepository::for_lead(&state.db, id).await?;

    Ok(Json(json!({ "lead": lead, "client": client })))
}

/// PATCH /admin/leads/{id}/: status, source, category and notes.
pub async fn update_lead(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i64>,
    body: Result<Json<UpdateLeadRequest>, JsonRejection>,
) -> AppResult<Json<Lead>> {
    let Json(req) = body?;
    let changes = LeadValidator::new().validate_update(&req)?;

    let lead = LeadRepository::update(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lead {} not found", id)))?;

    if let Some(status) = changes.status {
        tracing::info!(lead_id = id, status = %status, "Lead status changed");
    }
    Ok(Json(lead))
}

/// DELETE /admin/leads/{id}/: the client record cascades.
pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !LeadRepository::delete(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Lead {} not found", id)));
    }
    tracing::info!(lead_id = id, "Lead deleted");
    Ok(Json(json!({ "success": true })))
}

/// GET /admin/clients/?search=&category=
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Query(query): Query<QueryMap>,
) -> AppResult<Json<Value>> {
    let filter = ClientFilter {
        category: parse_filter("category", &query, Category::parse, Category::choices)?,
        search: query_value(&query, "search").map(search::terms).unwrap_or_default(),
    };
    let clients = ClientRepository::list(&state.db, &filter).await?;
    let total = clients.len();
    Ok(Json(json!({ "data": clients, "total": total })))
}

/// POST /admin/clients/
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    body: Result<Json<CreateClientRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let Json(req) = body?;
    let new_client = ClientValidator::new().validate(&req)?;

    if let Some(lead_id) = new_client.lead_id {
        if LeadRepository::get(&state.db, lead_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Lead {} not found", lead_id)));
        }
    }

    let client = ClientRepository::insert(&state.db, &new_client)
        .await
        .map_err(|e| conflict_on_unique(e, "This lead already has a client record."))?;

    tracing::info!(client_id = client.id, lead_id = ?client.lead_id, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /admin/newsletter/?search=&is_subscribed=
pub async fn list_subscribers(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Query(query): Query<QueryMap>,
) -> AppResult<Json<Value>> {
    let subscribers = NewsletterRepository::list(&state.db, &subscriber_filter(&query)).await?;
    let total = subscribers.len();
    Ok(Json(json!({ "data": subscribers, "total": total })))
}

/// PATCH /admin/newsletter/{id}/: opt a subscriber in or out.
pub async fn update_subscriber(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i64>,
    body: Result<Json<UpdateSubscriberRequest>, JsonRejection>,
) -> AppResult<Json<Subscriber>> {
    let Json(req) = body?;
    let subscriber = NewsletterRepository::set_subscribed(&state.db, id, req.is_subscribed)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Subscriber {} not found", id)))?;
    Ok(Json(subscriber))
}
