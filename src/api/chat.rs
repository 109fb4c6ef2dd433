//! Chat endpoint
//!
//! One request runs the whole pipeline: validate, transcribe when the turn
//! arrived as audio, send the growing conversation to the orchestrator, and
//! synthesize a spoken reply. Each stage failure is translated into an HTTP
//! error; there is no retry.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::Error;

/// Build chat router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .with_state(state)
}

/// A single turn of the client-held conversation history
#[derive(Debug, Deserialize)]
pub struct HistoryMessage {
    #[serde(default)]
    pub role: Option<String>,
    /// Defaulted so a malformed history entry cannot turn a validation
    /// failure into a 422 body rejection
    #[serde(default)]
    pub content: String,
}

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Typed text, or the stored audio path when `dtype` is `audio`
    pub user_message: Option<String>,
    /// Turn kind: `audio` or `message`
    pub dtype: Option<String>,
    /// Conversation so far, oldest first
    #[serde(default)]
    pub messages: Vec<HistoryMessage>,
}

/// Chat response for a spoken turn
#[derive(Debug, Serialize)]
pub struct AudioTurnResponse {
    pub content: String,
    pub audio_filepath: String,
    pub transcribed_text: String,
    pub r#type: &'static str,
}

/// Chat response for a typed turn
#[derive(Debug, Serialize)]
pub struct TextTurnResponse {
    pub content: String,
    pub r#type: &'static str,
}

/// Canned reply returned when the orchestrator fails on a typed turn
const FALLBACK_REPLY: &str =
    "I'm having trouble connecting right now. Let's try again in a moment.";

/// Handle one chat turn
async fn chat(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ChatError> {
    let dtype = request.dtype.as_deref().unwrap_or_default();
    if dtype != "audio" && dtype != "message" {
        return Err(ChatError::BadRequest(
            "Invalid dtype, must be 'audio' or 'message'".to_string(),
        ));
    }

    let user_message = request
        .user_message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ChatError::BadRequest("Missing or empty user_message".to_string()))?;

    tracing::info!(
        dtype = %dtype,
        history_len = request.messages.len(),
        "chat turn received"
    );

    let conversation: Vec<String> = request
        .messages
        .iter()
        .map(|m| m.content.clone())
        .collect();

    if dtype == "audio" {
        let turn = audio_turn(&state, user_message, conversation).await?;
        return Ok(Json(turn).into_response());
    }

    // Typed turn: the client already appended the latest message to the
    // history it sent, so the conversation is used as-is.
    match generate_reply(&state, &conversation).await {
        Ok(content) => Ok(Json(TextTurnResponse {
            content,
            r#type: "message",
        })
        .into_response()),
        Err(ChatError::NotConfigured(msg)) => Err(ChatError::NotConfigured(msg)),
        Err(e) => {
            tracing::error!(error = %e, "reply generation failed, returning fallback");
            Ok(Json(TextTurnResponse {
                content: FALLBACK_REPLY.to_string(),
                r#type: "message",
            })
            .into_response())
        }
    }
}

/// Run the spoken-turn pipeline: transcribe, converse, synthesize
async fn audio_turn(
    state: &ApiState,
    audio_path: &str,
    mut conversation: Vec<String>,
) -> Result<AudioTurnResponse, ChatError> {
    let transcribed_text = transcribe(state, audio_path).await?;
    tracing::info!(transcript = %transcribed_text, "audio turn transcribed");

    conversation.push(transcribed_text.clone());
    let content = generate_reply(state, &conversation).await?;

    let audio_filepath = synthesize_reply(state, &content).await?;
    tracing::info!(path = %audio_filepath, "spoken reply saved");

    Ok(AudioTurnResponse {
        content,
        audio_filepath,
        transcribed_text,
        r#type: "audio",
    })
}

/// Transcribe a previously uploaded audio file
async fn transcribe(state: &ApiState, audio_path: &str) -> Result<String, ChatError> {
    let stt = state
        .stt
        .as_ref()
        .ok_or(ChatError::NotConfigured("speech-to-text client"))?;

    let audio = state.store.read(audio_path).await.map_err(|e| match e {
        Error::Io(ref io) if io.kind() == std::io::ErrorKind::NotFound => {
            ChatError::AudioNotFound(format!("Audio file not found: {audio_path}"))
        }
        Error::Store(msg) => ChatError::AudioNotFound(msg),
        other => ChatError::TranscriptionFailed(other.to_string()),
    })?;

    stt.transcribe(audio)
        .await
        .map_err(|e| ChatError::TranscriptionFailed(e.to_string()))
}

/// Ask the orchestrator for the next reply
async fn generate_reply(state: &ApiState, conversation: &[String]) -> Result<String, ChatError> {
    let orchestrator = state
        .orchestrator
        .as_ref()
        .ok_or(ChatError::NotConfigured("orchestrator client"))?;

    orchestrator
        .start_session(conversation)
        .await
        .map_err(|e| ChatError::GenerationFailed(e.to_string()))
}

/// Synthesize the reply and persist it under a unique filename
async fn synthesize_reply(state: &ApiState, content: &str) -> Result<String, ChatError> {
    let tts = state
        .tts
        .as_ref()
        .ok_or(ChatError::NotConfigured("text-to-speech client"))?;

    let audio = tts
        .synthesize(content)
        .await
        .map_err(|e| ChatError::SynthesisFailed(e.to_string()))?;

    state
        .store
        .save(&audio, "mp3")
        .await
        .map_err(|e| ChatError::SynthesisFailed(e.to_string()))
}

/// Chat pipeline errors
#[derive(Debug)]
pub enum ChatError {
    BadRequest(String),
    AudioNotFound(String),
    NotConfigured(&'static str),
    TranscriptionFailed(String),
    GenerationFailed(String),
    SynthesisFailed(String),
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(msg) | Self::AudioNotFound(msg) => write!(f, "{msg}"),
            Self::NotConfigured(what) => write!(f, "{what} not initialized"),
            Self::TranscriptionFailed(msg) => write!(f, "Audio transcription failed: {msg}"),
            Self::GenerationFailed(msg) => write!(f, "AI response generation failed: {msg}"),
            Self::SynthesisFailed(msg) => write!(f, "Audio generation failed: {msg}"),
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
        }

        let (status, code) = match &self {
            Self::BadRequest(_) | Self::AudioNotFound(_) => {
                (StatusCode::BAD_REQUEST, "bad_request")
            }
            Self::NotConfigured(_) => (StatusCode::INTERNAL_SERVER_ERROR, "not_configured"),
            Self::TranscriptionFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "transcription_failed")
            }
            Self::GenerationFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "generation_failed"),
            Self::SynthesisFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "synthesis_failed"),
        };

        let message = self.to_string();
        (
            status,
            Json(ErrorResponse {
                error: ErrorBody { code, message },
            }),
        )
            .into_response()
    }
}
