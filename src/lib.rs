//! Solace - conversational therapy backend with voice support
//!
//! This library provides the core functionality for the solace backend:
//! - HTTP API (chat, audio upload, audio serving, health)
//! - External service clients (orchestrator, STT, TTS)
//! - Local audio store for generated and uploaded files
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   Web frontend                       │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                Solace backend                        │
//! │   Chat pipeline  │  Audio store  │  Health          │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │            External services (HTTP)                  │
//! │   Orchestrator  │  STT (Deepgram)  │  TTS (Murf)    │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod store;

pub use clients::{MurfTts, OrchestratorClient, SpeechToText};
pub use config::{Config, VoiceConfig};
pub use error::{Error, Result};
pub use store::AudioStore;
