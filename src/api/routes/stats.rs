//! Pipeline statistics endpoint

use axum::{Json, extract::State};

use crate::api::{error::ApiResult, state::ApiState, types::StatsResponse};

/// GET /api/stats
///
/// Alert, event, host and subscriber counts
pub async fn get_stats(State(state): State<ApiState>) -> ApiResult<Json<StatsResponse>> {
    let stats = state.monitor.stats().await?;

    Ok(Json(StatsResponse {
        timestamp: chrono::Utc::now().to_rfc3339(),
        stats,
    }))
}
