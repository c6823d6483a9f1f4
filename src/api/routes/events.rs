//! Event CRUD endpoints
//!
//! Bodies are taken as raw JSON values: a body must be an object, but
//! unknown or malformed fields are skipped rather than rejected. Bodies that
//! are not JSON at all get the usual `{"error": ...}` response.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;
use tracing::debug;

use crate::{
    api::{error::ApiResult, state::ApiState, types::DeleteResponse},
    events::{Event, EventPatch, NewEvent},
};

/// GET /api/events
pub async fn list_events(State(state): State<ApiState>) -> ApiResult<Json<Vec<Event>>> {
    Ok(Json(state.monitor.list_events().await?))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<ApiState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    let Json(body) = body?;
    let new_event = NewEvent::from_json(&body)?;
    let event = state.monitor.create_event(new_event).await?;
    debug!("event {} created via API", event.id);

    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/events/:id
pub async fn get_event(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Event>> {
    Ok(Json(state.monitor.get_event(id).await?))
}

/// PUT /api/events/:id
pub async fn update_event(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Event>> {
    let Json(body) = body?;
    let patch = EventPatch::from_json(&body)?;
    Ok(Json(state.monitor.update_event(id, patch).await?))
}

/// DELETE /api/events/:id
///
/// Succeeds whether or not the event existed
pub async fn delete_event(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    state.monitor.delete_event(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
