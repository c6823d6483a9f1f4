//! Alert history endpoint

use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    alerts::Alert,
    api::{error::ApiResult, state::ApiState, types::AlertQuery},
};

/// GET /api/alerts?limit=n
///
/// Most recent alerts first
pub async fn list_alerts(
    State(state): State<ApiState>,
    Query(query): Query<AlertQuery>,
) -> ApiResult<Json<Vec<Alert>>> {
    Ok(Json(state.monitor.list_alerts(query.limit).await?))
}
