//! Stub upstream service for local runs and demos.
//!
//! Serves `/api/data` with 100-200ms of simulated work, `/health`, and a
//! `/prestop` hook that holds the request while the pod is taken out of rotation.

use axum::{routing::get, Json, Router};
use rand::Rng;
use serde::Serialize;
use std::time::Duration;

/// How long `/prestop` waits before reporting the instance drained.
pub const PRESTOP_DRAIN: Duration = Duration::from_secs(5);
/// Upper bound on graceful shutdown after a termination signal.
pub const DRAIN_LIMIT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct DataResponse {
    source: &'static str,
    message: &'static str,
    latency_ms: u64,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
}

async fn data() -> Json<DataResponse> {
    let latency_ms: u64 = rand::thread_rng().gen_range(100..=200);
    tokio::time::sleep(Duration::from_millis(latency_ms)).await;
    Json(DataResponse {
        source: "stub-upstream",
        message: "Hello from the stub upstream service",
        latency_ms,
        timestamp: chrono::Local::now().to_rfc3339(),
    })
}

async fn health() -> Json<StatusResponse> {
    Json(StatusResponse { status: "healthy" })
}

async fn prestop() -> Json<StatusResponse> {
    tracing::info!("preStop hook called, starting drain");
    tokio::time::sleep(PRESTOP_DRAIN).await;
    tracing::info!("preStop hook complete, ready for SIGTERM");
    Json(StatusResponse { status: "drained" })
}

pub fn router() -> Router {
    Router::new()
        .route("/api/data", get(data))
        .route("/health", get(health))
        .route("/prestop", get(prestop))
}
