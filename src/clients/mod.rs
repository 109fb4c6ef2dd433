//! External service clients
//!
//! All substantive work is delegated to external HTTP services: the
//! orchestrator produces conversational replies, Deepgram transcribes
//! speech, and Murf synthesizes it. Each client is constructed once at
//! startup and shared read-only.

pub mod orchestrator;
pub mod stt;
pub mod tts;

pub use orchestrator::OrchestratorClient;
pub use stt::SpeechToText;
pub use tts::MurfTts;
