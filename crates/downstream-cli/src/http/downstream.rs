//! Forwarding server routes.
//!
//! `GET /` forwards to the upstream and always answers 200; the outcome
//! (including failures) is carried in the JSON body.

use axum::{extract::State, routing::get, Json, Router};
use downstream_core::response::{ForwardResponse, HealthResponse};
use downstream_core::Forwarder;
use std::sync::Arc;

pub struct AppState {
    forwarder: Forwarder,
    source: String,
}

impl AppState {
    pub fn new(forwarder: Forwarder, source: String) -> Self {
        Self { forwarder, source }
    }
}

async fn forward(State(state): State<Arc<AppState>>) -> Json<ForwardResponse> {
    let call = state.forwarder.forward().await;
    Json(ForwardResponse::from_call(
        &state.source,
        call,
        state.forwarder.policy().attempt_timeout,
    ))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(forward))
        .route("/health", get(health))
        .with_state(state)
}
