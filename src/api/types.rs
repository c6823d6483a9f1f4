//! Shared API request and response types

use serde::{Deserialize, Serialize};

use crate::actors::messages::MonitorStats;

// ============================================================================
// API Response Types - Proper typed responses instead of Json<Value>
// ============================================================================

/// Response for GET /api/health and GET /grafana/health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Response for GET /api/stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub timestamp: String,
    #[serde(flatten)]
    pub stats: MonitorStats,
}

/// Response for DELETE /api/events/:id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for GET /api/alerts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertQuery {
    /// Max results (default: the whole history)
    pub limit: Option<usize>,
}
