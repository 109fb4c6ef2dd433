//! API endpoint integration tests

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

mod common;
use common::test_router;

/// POST a JSON body to a path
fn json_request(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body as JSON
async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Build a multipart request with a single field
fn multipart_request(path: &str, field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let boundary = "solace-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{filename}\"\r\nContent-Type: audio/mpeg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(path)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn health_reports_service_availability() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
    assert!(json["timestamp"].is_string());
    assert_eq!(json["services"]["orchestrator"], "unavailable");
    assert_eq!(json["services"]["speech_to_text"], "unavailable");
    assert_eq!(json["services"]["text_to_speech"], "unavailable");
}

#[tokio::test]
async fn chat_rejects_invalid_dtype() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(json_request(
            "/chat",
            r#"{"user_message": "hello", "dtype": "video"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn chat_rejects_missing_dtype() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(json_request("/chat", r#"{"user_message": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_rejects_empty_user_message() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(json_request(
            "/chat",
            r#"{"user_message": "   ", "dtype": "message"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn chat_rejects_malformed_json() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(json_request("/chat", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_without_orchestrator_is_not_configured() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(json_request(
            "/chat",
            r#"{"user_message": "hello", "dtype": "message", "messages": [{"role": "user", "content": "hello"}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "not_configured");
}

#[tokio::test]
async fn chat_audio_without_stt_is_not_configured() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(json_request(
            "/chat",
            r#"{"user_message": "audios/turn.mp3", "dtype": "audio"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "not_configured");
}

/// Router with an orchestrator client pointing at an unroutable endpoint
fn router_with_orchestrator() -> (axum::Router, tempfile::TempDir) {
    use std::sync::Arc;

    use solace_backend::api::{ApiState, build_router};
    use solace_backend::{AudioStore, OrchestratorClient};

    let tmp = tempfile::tempdir().unwrap();
    let store = AudioStore::new(tmp.path()).unwrap();
    let orchestrator = OrchestratorClient::new("http://127.0.0.1:1".to_string()).unwrap();

    let state = Arc::new(ApiState {
        orchestrator: Some(Arc::new(orchestrator)),
        stt: None,
        tts: None,
        store,
    });

    (build_router(state), tmp)
}

#[tokio::test]
async fn typed_turn_falls_back_when_orchestrator_fails() {
    let (app, _tmp) = router_with_orchestrator();

    let response = app
        .oneshot(json_request(
            "/chat",
            r#"{"user_message": "hello", "dtype": "message", "messages": [{"role": "user", "content": "hello"}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json["content"],
        "I'm having trouble connecting right now. Let's try again in a moment."
    );
    assert_eq!(json["type"], "message");
}

#[tokio::test]
async fn history_entry_without_content_still_validates() {
    let (app, _tmp) = test_router();

    // A history entry missing `content` must not bounce the whole body as a
    // 422; it parses as an empty turn and the request proceeds to the usual
    // pipeline checks.
    let response = app
        .oneshot(json_request(
            "/chat",
            r#"{"user_message": "hello", "dtype": "message", "messages": [{"role": "user"}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "not_configured");
}

/// Router with an STT client pointing at an unroutable endpoint
fn router_with_stt() -> (axum::Router, tempfile::TempDir) {
    use std::sync::Arc;

    use solace_backend::api::{ApiState, build_router};
    use solace_backend::{AudioStore, SpeechToText};

    let tmp = tempfile::tempdir().unwrap();
    let store = AudioStore::new(tmp.path()).unwrap();
    let stt = SpeechToText::with_base_url(
        "test-key".to_string(),
        "nova-2".to_string(),
        "http://127.0.0.1:1".to_string(),
    )
    .unwrap();

    let state = Arc::new(ApiState {
        orchestrator: None,
        stt: Some(Arc::new(stt)),
        tts: None,
        store,
    });

    (build_router(state), tmp)
}

#[tokio::test]
async fn chat_audio_with_missing_file_is_400() {
    let (app, _tmp) = router_with_stt();

    let response = app
        .oneshot(json_request(
            "/chat",
            r#"{"user_message": "no-such-turn.mp3", "dtype": "audio"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "bad_request");
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("not found")
    );
}

#[tokio::test]
async fn chat_audio_with_unreachable_stt_is_transcription_failed() {
    let (app, tmp) = router_with_stt();

    let audio_path = tmp.path().join("turn.mp3");
    tokio::fs::write(&audio_path, b"fake mp3 bytes").await.unwrap();

    let body = serde_json::json!({
        "user_message": audio_path.display().to_string(),
        "dtype": "audio",
    });
    let response = app
        .oneshot(json_request("/chat", &body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "transcription_failed");
}

#[tokio::test]
async fn upload_requires_audio_field() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(multipart_request(
            "/upload-audio",
            "document",
            "notes.txt",
            b"not audio",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "No audio file provided");
}

#[tokio::test]
async fn upload_rejects_empty_file() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(multipart_request("/upload-audio", "audio", "clip.mp3", b""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn uploaded_audio_is_saved_and_served() {
    let (app, _tmp) = test_router();

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/upload-audio",
            "audio",
            "clip.mp3",
            b"fake mp3 bytes",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let filepath = json["audio_filepath"].as_str().unwrap().to_string();
    let filename = std::path::Path::new(&filepath)
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(filename.ends_with(".mp3"));

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/audios/{filename}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "audio/mpeg"
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"fake mp3 bytes");
}

#[tokio::test]
async fn uploads_get_unique_filenames() {
    let (app, _tmp) = test_router();

    let mut seen = std::collections::HashSet::new();
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(multipart_request(
                "/upload-audio",
                "audio",
                "clip.mp3",
                b"same bytes every time",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let filepath = json["audio_filepath"].as_str().unwrap().to_string();
        assert!(seen.insert(filepath), "duplicate audio_filepath returned");
    }
}

#[tokio::test]
async fn missing_audio_file_is_404() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/audios/no-such-file.mp3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn traversal_filenames_are_rejected() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/audios/..%2F..%2Fetc%2Fpasswd")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
