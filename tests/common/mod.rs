//! Shared test helpers

use std::sync::Arc;

use solace_backend::AudioStore;
use solace_backend::api::{ApiState, build_router};
use tempfile::TempDir;

/// Build an API router backed by a temporary audio directory
///
/// No external clients are configured, so handlers that need one report it
/// as unavailable. The `TempDir` must be kept alive for the router's
/// lifetime.
pub fn test_router() -> (axum::Router, TempDir) {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let store = AudioStore::new(tmp.path()).expect("create audio store");

    let state = Arc::new(ApiState {
        orchestrator: None,
        stt: None,
        tts: None,
        store,
    });

    (build_router(state), tmp)
}
