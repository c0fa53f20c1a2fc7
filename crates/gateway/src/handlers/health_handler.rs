//! Health check handlers.

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,
    pub store: StoreHealth,
    pub uptime_seconds: u64,
    pub version: String,
    pub pid: u32,
    pub environment: String,
}

/// Document store status.
#[derive(Debug, Serialize, ToSchema)]
pub struct StoreHealth {
    /// `connected` or `disconnected`
    pub status: String,
    /// `postgres` or `memory`
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Health check endpoint - pings the document store.
///
/// Always answers 200; an unreachable store is reported as `degraded`.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service status", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = &state.catalog.store;

    let ping = store.ping().await;
    let healthy = ping.is_ok();
    if let Err(e) = &ping {
        tracing::warn!(error = %e, "Store health check failed");
    }

    let store_health = StoreHealth {
        status: if healthy { "connected" } else { "disconnected" }.to_string(),
        backend: store.backend().as_str().to_string(),
        // Connection details stay inside the process in production
        error: ping
            .err()
            .filter(|_| !state.config.environment.is_production())
            .map(|e| e.to_string()),
    };

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        store: store_health,
        uptime_seconds: state.started_at.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        pid: std::process::id(),
        environment: state.config.environment.as_str().to_string(),
    })
}
