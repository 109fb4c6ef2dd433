//! Audio upload and serving endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;

use super::ApiState;

/// Build audio router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/upload-audio", post(upload_audio))
        .route("/audios/{filename}", get(serve_audio))
        .with_state(state)
}

/// Upload response carrying the stored path for a later chat turn
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub audio_filepath: String,
}

/// Accept a recorded audio file and persist it before any transcription
async fn upload_audio(
    State(state): State<Arc<ApiState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AudioError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AudioError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("audio") {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AudioError::BadRequest(e.to_string()))?;

        if data.is_empty() {
            return Err(AudioError::BadRequest("Empty audio file".to_string()));
        }

        let audio_filepath = state
            .store
            .save(&data, "mp3")
            .await
            .map_err(|e| AudioError::SaveFailed(e.to_string()))?;

        tracing::info!(path = %audio_filepath, bytes = data.len(), "audio uploaded");
        return Ok(Json(UploadResponse { audio_filepath }));
    }

    Err(AudioError::BadRequest("No audio file provided".to_string()))
}

/// Serve a stored audio file
async fn serve_audio(
    State(state): State<Arc<ApiState>>,
    Path(filename): Path<String>,
) -> Result<Response, AudioError> {
    let path = state
        .store
        .resolve(&filename)
        .map_err(|e| AudioError::BadRequest(e.to_string()))?;

    let audio = tokio::fs::read(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AudioError::NotFound(filename.clone())
        } else {
            AudioError::SaveFailed(e.to_string())
        }
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type(&filename))],
        audio,
    )
        .into_response())
}

/// Content type from the stored file extension
fn content_type(filename: &str) -> &'static str {
    match std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some("wav") => "audio/wav",
        Some("webm") => "audio/webm",
        _ => "audio/mpeg",
    }
}

/// Audio endpoint errors
#[derive(Debug)]
pub enum AudioError {
    BadRequest(String),
    NotFound(String),
    SaveFailed(String),
}

impl IntoResponse for AudioError {
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

        let (status, code, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::NotFound(name) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("audio file not found: {name}"),
            ),
            Self::SaveFailed(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_failed", msg),
        };

        (
            status,
            Json(ErrorResponse {
                error: ErrorBody { code, message },
            }),
        )
            .into_response()
    }
}
