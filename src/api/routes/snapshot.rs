//! Snapshot endpoints

use axum::{Json, extract::State};

use crate::{
    Snapshot,
    api::{error::ApiResult, state::ApiState},
};

/// GET /api/current-data
///
/// Runs a fresh sampling pass. Every alert it raises lands in the alert
/// history and the event store.
pub async fn current_data(State(state): State<ApiState>) -> ApiResult<Json<Snapshot>> {
    Ok(Json(state.monitor.generate_snapshot().await?))
}

/// GET /api/current-data/latest
///
/// The last generated snapshot without sampling again
pub async fn latest_data(State(state): State<ApiState>) -> ApiResult<Json<Snapshot>> {
    Ok(Json(state.monitor.current_snapshot().await?))
}
