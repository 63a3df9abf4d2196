//! Speech stage configuration.

/// Default ElevenLabs voice (Rachel).
pub const DEFAULT_ELEVENLABS_VOICE: &str = "21m00Tcm4TlvDq8ikWAM";
/// Default OpenAI TTS model.
pub const DEFAULT_OPENAI_TTS_MODEL: &str = "tts-1-hd";
/// Default OpenAI TTS voice.
pub const DEFAULT_OPENAI_TTS_VOICE: &str = "onyx";
/// Default espeak-ng voice.
pub const DEFAULT_ESPEAK_VOICE: &str = "en";
/// Default synthesis timeout in seconds.
pub const DEFAULT_TTS_TIMEOUT_SECS: u64 = 300;

/// Configuration for the speech provider factory.
///
/// Providers missing their credentials are skipped at construction;
/// the local espeak-ng fallback needs none.
#[derive(Clone)]
pub struct SpeechConfig {
    /// ElevenLabs API key; provider skipped when absent
    pub elevenlabs_api_key: Option<String>,
    /// ElevenLabs voice id
    pub elevenlabs_voice_id: String,
    /// ElevenLabs API base URL (overridable for tests)
    pub elevenlabs_base_url: String,
    /// OpenAI API key; provider skipped when absent
    pub openai_api_key: Option<String>,
    /// OpenAI TTS model
    pub openai_model: String,
    /// OpenAI TTS voice
    pub openai_voice: String,
    /// OpenAI API base URL (overridable for tests)
    pub openai_base_url: String,
    /// espeak-ng voice
    pub espeak_voice: String,
    /// Per-provider synthesis timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            elevenlabs_api_key: None,
            elevenlabs_voice_id: DEFAULT_ELEVENLABS_VOICE.to_string(),
            elevenlabs_base_url: "https://api.elevenlabs.io".to_string(),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_TTS_MODEL.to_string(),
            openai_voice: DEFAULT_OPENAI_TTS_VOICE.to_string(),
            openai_base_url: "https://api.openai.com".to_string(),
            espeak_voice: DEFAULT_ESPEAK_VOICE.to_string(),
            timeout_secs: DEFAULT_TTS_TIMEOUT_SECS,
        }
    }
}

impl SpeechConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            elevenlabs_api_key: std::env::var("ELEVENLABS_API_KEY").ok().filter(|k| !k.is_empty()),
            elevenlabs_voice_id: std::env::var("ELEVENLABS_VOICE_ID")
                .unwrap_or(defaults.elevenlabs_voice_id),
            elevenlabs_base_url: std::env::var("ELEVENLABS_BASE_URL")
                .unwrap_or(defaults.elevenlabs_base_url),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_model: std::env::var("OPENAI_TTS_MODEL").unwrap_or(defaults.openai_model),
            openai_voice: std::env::var("OPENAI_TTS_VOICE").unwrap_or(defaults.openai_voice),
            openai_base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            espeak_voice: std::env::var("ESPEAK_VOICE").unwrap_or(defaults.espeak_voice),
            timeout_secs: std::env::var("TTS_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

// API keys never reach logs
impl std::fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("elevenlabs_api_key", &self.elevenlabs_api_key.as_ref().map(|_| "<redacted>"))
            .field("elevenlabs_voice_id", &self.elevenlabs_voice_id)
            .field("elevenlabs_base_url", &self.elevenlabs_base_url)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("openai_model", &self.openai_model)
            .field("openai_voice", &self.openai_voice)
            .field("openai_base_url", &self.openai_base_url)
            .field("espeak_voice", &self.espeak_voice)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpeechConfig::default();
        assert!(config.elevenlabs_api_key.is_none());
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.elevenlabs_voice_id, DEFAULT_ELEVENLABS_VOICE);
        assert_eq!(config.openai_model, "tts-1-hd");
        assert_eq!(config.timeout_secs, 300);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = SpeechConfig {
            elevenlabs_api_key: Some("secret-key".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
