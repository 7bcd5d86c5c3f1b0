use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::models::{Event, EventFilter};
use crate::query::QueryParams;
use crate::state::SharedState;
use crate::validation::{self, parse_event_id};

pub const INVALID_JSON_BODY: &str = "Invalid JSON body";
pub const EVENT_NOT_FOUND: &str = "Event not found";
pub const NO_FIELDS_TO_UPDATE: &str = "No fields to update";
pub const FAILED_TO_CREATE: &str = "Failed to create event";

#[derive(Debug, Default)]
pub struct ListQuery {
    pub campus: Option<String>,
    pub category: Option<String>,
    pub published: Option<String>,
    pub sort: Option<String>,
}

impl ListQuery {
    pub fn from_query(mut query: QueryParams) -> Self {
        Self {
            campus: query.take("campus"),
            category: query.take("category"),
            published: query.take("published"),
            sort: query.take("sort"),
        }
    }

    fn filter(self) -> EventFilter {
        EventFilter {
            campus: self.campus.filter(|v| !v.is_empty()),
            category: self.category.filter(|v| !v.is_empty()),
            published: match self.published.as_deref() {
                Some("true") => Some(true),
                Some("false") => Some(false),
                _ => None,
            },
        }
    }
}

fn parse_json(body: &Bytes) -> Result<Value, AppError> {
    serde_json::from_slice(body).map_err(|_| AppError::BadRequest(INVALID_JSON_BODY.to_string()))
}

fn not_found() -> AppError {
    AppError::NotFound(EVENT_NOT_FOUND.to_string())
}

pub async fn list(
    State(state): State<SharedState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<Event>>, AppError> {
    let query = ListQuery::from_query(QueryParams::parse(raw.as_deref()));
    if let Some(sort) = &query.sort {
        // listing order is always ascending by start time
        tracing::debug!(sort = %sort, "Ignoring sort parameter");
    }
    let events = state.store.list(&query.filter()).await?;
    Ok(Json(events))
}

pub async fn create(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let payload = parse_json(&body)?;
    let new_event = validation::validate_create(&payload)?;

    let event = state
        .store
        .insert(&new_event)
        .await?
        .ok_or_else(|| AppError::StorageInconsistency(FAILED_TO_CREATE.to_string()))?;

    tracing::info!(event_id = %event.id, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError> {
    let id = parse_event_id(&id)?;
    let event = state.store.find(id).await?.ok_or_else(not_found)?;
    Ok(Json(event))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Event>, AppError> {
    let id = parse_event_id(&id)?;
    let payload = parse_json(&body)?;
    let changes = validation::validate_update(&payload)?;

    if changes.is_empty() {
        return Err(AppError::BadRequest(NO_FIELDS_TO_UPDATE.to_string()));
    }

    let event = state.store.update(id, &changes).await?.ok_or_else(not_found)?;

    tracing::info!(event_id = %event.id, "Event updated");
    Ok(Json(event))
}

pub async fn delete(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_event_id(&id)?;

    if !state.store.delete(id).await? {
        return Err(not_found());
    }

    tracing::info!(event_id = %id, "Event deleted");
    Ok(Json(json!({ "ok": true })))
}
