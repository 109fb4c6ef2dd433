//! Health check endpoint

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use super::ApiState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub services: ServiceChecks,
}

/// Per-client availability
#[derive(Serialize)]
pub struct ServiceChecks {
    pub orchestrator: &'static str,
    pub speech_to_text: &'static str,
    pub text_to_speech: &'static str,
}

const fn availability(present: bool) -> &'static str {
    if present { "available" } else { "unavailable" }
}

/// Liveness probe with per-service availability
async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        services: ServiceChecks {
            orchestrator: availability(state.orchestrator.is_some()),
            speech_to_text: availability(state.stt.is_some()),
            text_to_speech: availability(state.tts.is_some()),
        },
    })
}

/// Build health router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}
