//! Health check endpoint handlers.
//!
//! A degraded service is still a healthy service: the whole point of the
//! fallback store is to keep serving when the remote store is down, so the
//! health check reports the storage mode instead of failing.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// "remote" when the remote store answers, "local_fallback" otherwise.
    pub storage_mode: String,
    pub remote_store: RemoteStoreHealth,
}

/// Remote store health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RemoteStoreHealth {
    pub provisioned: bool,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Full health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (provisioned, connected, latency_ms) = match &state.pool {
        Some(pool) => {
            let start = std::time::Instant::now();
            let ok = sqlx::query("SELECT 1").execute(pool).await.is_ok();
            let latency = start.elapsed().as_millis() as u64;
            (true, ok, ok.then_some(latency))
        }
        None => (false, false, None),
    };

    let response = HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage_mode: if connected { "remote" } else { "local_fallback" }.to_string(),
        remote_store: RemoteStoreHealth {
            provisioned,
            connected,
            latency_ms,
        },
    };

    Json(response)
}

/// Readiness probe. The service is ready as soon as it can serve, which in
/// degraded mode it can.
pub async fn ready() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ready".to_string(),
    })
}

/// Liveness probe.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}
