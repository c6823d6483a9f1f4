//! Grafana JSON datasource endpoints
//!
//! All of them read the current snapshot; none of them sample.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;

use crate::{
    api::{error::ApiResult, state::ApiState},
    grafana::{self, Annotation, MetricReading, QueryRequest, TimeSeries},
};

/// POST /grafana/search
pub async fn search() -> Json<Vec<&'static str>> {
    Json(grafana::searchable_targets())
}

/// POST /grafana/query
pub async fn query(
    State(state): State<ApiState>,
    request: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<TimeSeries>>> {
    let Json(request) = request?;
    let snapshot = state.monitor.current_snapshot().await?;
    let stats = state.monitor.stats().await?;

    Ok(Json(grafana::query(
        &request.targets,
        &snapshot,
        &stats,
        Utc::now(),
    )))
}

/// POST /grafana/annotations
pub async fn annotations(State(state): State<ApiState>) -> ApiResult<Json<Vec<Annotation>>> {
    let alerts = state
        .monitor
        .list_alerts(Some(grafana::ANNOTATION_LIMIT))
        .await?;

    Ok(Json(grafana::annotations(&alerts)))
}

/// GET /grafana/metrics
pub async fn metrics(State(state): State<ApiState>) -> ApiResult<Json<Vec<MetricReading>>> {
    let snapshot = state.monitor.current_snapshot().await?;
    let stats = state.monitor.stats().await?;

    Ok(Json(grafana::metric_listing(&snapshot, &stats, Utc::now())))
}
