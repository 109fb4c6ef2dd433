//! Text-to-speech (TTS) client for the Murf speech generation API

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::config::VoiceConfig;
use crate::{Error, Result};

/// Synthesizes speech from text via Murf
pub struct MurfTts {
    client: reqwest::Client,
    api_key: String,
    voice: VoiceConfig,
    base_url: String,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechRequest<'a> {
    voice_id: &'a str,
    text: &'a str,
    style: &'a str,
    rate: f64,
    pitch: f64,
    variation: u8,
    sample_rate: u32,
    format: &'a str,
    channel_type: &'a str,
    encode_as_base64: bool,
}

/// Response from the Murf speech generation API
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpeechResponse {
    #[serde(default)]
    encoded_audio: Option<String>,
    #[serde(default)]
    audio_length_in_seconds: Option<f64>,
}

impl MurfTts {
    /// Create a new TTS client
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: String, voice: VoiceConfig) -> Result<Self> {
        Self::with_base_url(api_key, voice, "https://api.murf.ai".to_string())
    }

    /// Create a new TTS client against a custom base URL
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn with_base_url(api_key: String, voice: VoiceConfig, base_url: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("Murf API key required for TTS".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice,
            base_url,
        })
    }

    /// Synthesize text to speech
    ///
    /// # Returns
    ///
    /// Audio bytes (MP3, mono, at the configured sample rate)
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails or the response carries no audio
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let request = SpeechRequest {
            voice_id: &self.voice.tts_voice,
            text,
            style: &self.voice.tts_style,
            rate: self.voice.tts_rate,
            pitch: self.voice.tts_pitch,
            variation: self.voice.tts_variation,
            sample_rate: self.voice.sample_rate,
            format: "MP3",
            channel_type: "MONO",
            encode_as_base64: true,
        };

        let url = format!("{}/v1/speech/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Murf API error");
            return Err(Error::Tts(format!("Murf API error {status}: {body}")));
        }

        let result: SpeechResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse Murf response");
            e
        })?;

        let encoded = result
            .encoded_audio
            .filter(|a| !a.is_empty())
            .ok_or_else(|| Error::Tts("speech generation returned no audio".to_string()))?;

        let audio = BASE64
            .decode(encoded)
            .map_err(|e| Error::Tts(format!("invalid base64 audio payload: {e}")))?;

        tracing::info!(
            audio_bytes = audio.len(),
            length_secs = result.audio_length_in_seconds,
            "synthesis complete"
        );
        Ok(audio)
    }
}
