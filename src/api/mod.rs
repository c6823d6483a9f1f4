//! REST API and WebSocket server for the monitoring hub
//!
//! ## Architecture
//!
//! - **Axum** web framework with tower-http tracing and CORS layers
//! - **Monitor handle** shared by every handler; all state lives in the actor
//! - **WebSocket** push of snapshots and event lifecycle signals
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Health check
//! - `GET /api/stats` - Alert and event counters
//! - `GET /api/current-data` - Fresh sampling pass
//! - `GET /api/current-data/latest` - Last snapshot, no sampling
//! - `GET /api/alerts` - Recent alert history
//! - `GET|POST /api/events`, `GET|PUT|DELETE /api/events/:id` - Event CRUD
//! - `WS /ws` - Real-time signal stream
//! - `/grafana/*` - JSON datasource protocol

#[cfg(feature = "api")]
pub mod error;
#[cfg(feature = "api")]
pub mod routes;
#[cfg(feature = "api")]
pub mod state;
#[cfg(feature = "api")]
pub mod types;
#[cfg(feature = "api")]
pub mod websocket;

#[cfg(feature = "api")]
pub use error::{ApiError, ApiResult};
#[cfg(feature = "api")]
pub use state::ApiState;
#[cfg(feature = "api")]
pub use types::{AlertQuery, DeleteResponse, HealthResponse, StatsResponse};

#[cfg(feature = "api")]
use axum::{
    Router,
    routing::{get, post},
};
use std::net::{Ipv4Addr, SocketAddr};
#[cfg(feature = "api")]
use tracing::info;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:5000")
    pub bind_addr: SocketAddr,

    /// Enable CORS for dashboards served from other origins
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 5000)),
            enable_cors: true,
        }
    }
}

/// Build the router with every route and layer
#[cfg(feature = "api")]
pub fn router(state: ApiState, enable_cors: bool) -> Router {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    let mut app = Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/stats", get(routes::stats::get_stats))
        .route("/api/current-data", get(routes::snapshot::current_data))
        .route(
            "/api/current-data/latest",
            get(routes::snapshot::latest_data),
        )
        .route("/api/alerts", get(routes::alerts::list_alerts))
        .route(
            "/api/events",
            get(routes::events::list_events).post(routes::events::create_event),
        )
        .route(
            "/api/events/:id",
            get(routes::events::get_event)
                .put(routes::events::update_event)
                .delete(routes::events::delete_event),
        )
        .route("/ws", get(websocket::websocket_handler))
        .route("/grafana/health", get(routes::health::health_check))
        .route("/grafana/search", post(routes::grafana::search))
        .route("/grafana/query", post(routes::grafana::query))
        .route("/grafana/annotations", post(routes::grafana::annotations))
        .route("/grafana/metrics", get(routes::grafana::metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Spawn the API server
///
/// This starts an Axum HTTP server in a background task.
/// Returns the server's local address.
#[cfg(feature = "api")]
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    info!("starting API server on {}", config.bind_addr);

    let app = router(state, config.enable_cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(addr)
}
