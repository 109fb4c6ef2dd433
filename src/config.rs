//! Configuration management for the solace backend

use std::path::PathBuf;

/// Solace backend configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for generated and uploaded audio files
    pub audio_dir: PathBuf,

    /// Path to static files directory (web UI)
    pub static_dir: Option<PathBuf>,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,

    /// Orchestrator base URL (from `ORCHESTRATOR_URL`)
    pub orchestrator_url: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// STT model for Deepgram (e.g. "nova-2")
    pub stt_model: String,

    /// Murf voice identifier
    pub tts_voice: String,

    /// Murf speaking style
    pub tts_style: String,

    /// Speaking rate adjustment (-50 to 50)
    pub tts_rate: f64,

    /// Pitch adjustment (-50 to 50)
    pub tts_pitch: f64,

    /// Pronunciation variation (0 to 5)
    pub tts_variation: u8,

    /// Output sample rate in Hz
    pub sample_rate: u32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            stt_model: "nova-2".to_string(),
            tts_voice: "en-US-natalie".to_string(),
            tts_style: "empathetic".to_string(),
            tts_rate: -6.0,
            tts_pitch: -5.0,
            tts_variation: 4,
            sample_rate: 44_100,
        }
    }
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `Deepgram` API key (STT)
    pub deepgram: Option<String>,

    /// `Murf` API key (TTS)
    pub murf: Option<String>,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Missing API keys or a missing orchestrator URL do not fail the load;
    /// the corresponding client stays unconfigured and `/health` reports it
    /// as unavailable.
    #[must_use]
    pub fn load(audio_dir: PathBuf, static_dir: Option<PathBuf>) -> Self {
        let api_keys = ApiKeys {
            deepgram: env_non_empty("DEEPGRAM_API_KEY"),
            murf: env_non_empty("MURF_API_KEY"),
        };

        let voice = VoiceConfig {
            stt_model: std::env::var("STT_MODEL")
                .unwrap_or_else(|_| VoiceConfig::default().stt_model),
            tts_voice: std::env::var("TTS_VOICE")
                .unwrap_or_else(|_| VoiceConfig::default().tts_voice),
            ..VoiceConfig::default()
        };

        Self {
            audio_dir,
            static_dir,
            voice,
            api_keys,
            orchestrator_url: env_non_empty("ORCHESTRATOR_URL"),
        }
    }
}

/// Read an environment variable, treating empty values as unset
fn env_non_empty(key: &str) -> Option<String> {
    non_empty(std::env::var(key).ok())
}

/// Treat empty or whitespace-only values as unset
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_defaults_match_murf_profile() {
        let voice = VoiceConfig::default();
        assert_eq!(voice.tts_voice, "en-US-natalie");
        assert_eq!(voice.tts_style, "empathetic");
        assert_eq!(voice.sample_rate, 44_100);
    }

    #[test]
    fn empty_values_are_unset() {
        assert!(non_empty(None).is_none());
        assert!(non_empty(Some(String::new())).is_none());
        assert!(non_empty(Some("  ".to_string())).is_none());
        assert_eq!(non_empty(Some("key".to_string())).as_deref(), Some("key"));
    }
}
