//! HTTP API server for the solace backend

pub mod audio;
pub mod chat;
pub mod health;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::clients::{MurfTts, OrchestratorClient, SpeechToText};
use crate::store::AudioStore;
use crate::{Config, Result};

/// Shared state for API handlers
///
/// The three clients are read-only after startup; a client whose
/// configuration was missing stays `None` and its endpoints report it as
/// unavailable.
#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Option<Arc<OrchestratorClient>>,
    pub stt: Option<Arc<SpeechToText>>,
    pub tts: Option<Arc<MurfTts>>,
    pub store: AudioStore,
}

impl ApiState {
    /// Build API state from configuration, initializing each client that has
    /// its keys
    ///
    /// # Errors
    ///
    /// Returns error if the audio directory cannot be created
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = AudioStore::new(&config.audio_dir)?;

        let orchestrator = match &config.orchestrator_url {
            Some(url) => match OrchestratorClient::new(url.clone()) {
                Ok(client) => {
                    tracing::info!(url = %url, "orchestrator client initialized");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    tracing::error!(error = %e, "orchestrator initialization failed");
                    None
                }
            },
            None => {
                tracing::warn!("ORCHESTRATOR_URL not set, chat replies unavailable");
                None
            }
        };

        let stt = match &config.api_keys.deepgram {
            Some(key) => {
                match SpeechToText::new(key.clone(), config.voice.stt_model.clone()) {
                    Ok(client) => {
                        tracing::info!(model = %config.voice.stt_model, "STT client initialized");
                        Some(Arc::new(client))
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "STT initialization failed");
                        None
                    }
                }
            }
            None => {
                tracing::warn!("DEEPGRAM_API_KEY not set, transcription unavailable");
                None
            }
        };

        let tts = match &config.api_keys.murf {
            Some(key) => match MurfTts::new(key.clone(), config.voice.clone()) {
                Ok(client) => {
                    tracing::info!(voice = %config.voice.tts_voice, "TTS client initialized");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    tracing::error!(error = %e, "TTS initialization failed");
                    None
                }
            },
            None => {
                tracing::warn!("MURF_API_KEY not set, speech synthesis unavailable");
                None
            }
        };

        Ok(Self {
            orchestrator,
            stt,
            tts,
            store,
        })
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
    static_dir: Option<PathBuf>,
}

impl ApiServer {
    /// Create an API server
    #[must_use]
    pub fn new(state: Arc<ApiState>, port: u16, static_dir: Option<PathBuf>) -> Self {
        Self {
            state,
            port,
            static_dir,
        }
    }

    /// Build the router with all routes
    #[must_use]
    pub fn router(&self) -> Router {
        let mut router = build_router(self.state.clone());

        // Serve the web UI if configured; any unmatched route falls back to
        // the app page so client-side routing keeps working.
        if let Some(static_dir) = &self.static_dir {
            let index_file = static_dir.join("index.html");
            let serve_dir = ServeDir::new(static_dir).not_found_service(ServeFile::new(&index_file));

            router = router.fallback_service(serve_dir);
            tracing::info!(path = %static_dir.display(), "serving static files");
        }

        // CORS layer for cross-origin requests from the frontend
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}

/// Build the API routes without static file or middleware layers
///
/// Split out so integration tests can drive the handlers directly.
#[must_use]
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(health::router(state.clone()))
        .merge(chat::router(state.clone()))
        .merge(audio::router(state))
}
