//! Speech provider factory.
//!
//! Builds the ordered, closed provider set from configuration once per
//! run. Provider selection never lives in process-wide state; callers
//! receive the list and pass it on explicitly.

use tracing::debug;

use crate::config::SpeechConfig;
use crate::elevenlabs::ElevenLabsProvider;
use crate::espeak::EspeakProvider;
use crate::openai::OpenAiTtsProvider;
use crate::provider::SpeechProvider;

/// Build the provider chain in preference order.
///
/// Remote providers are included only when their credentials are
/// configured; the local espeak-ng fallback is always last.
pub fn build_providers(config: &SpeechConfig) -> Vec<Box<dyn SpeechProvider>> {
    let mut providers: Vec<Box<dyn SpeechProvider>> = Vec::new();

    match &config.elevenlabs_api_key {
        Some(key) => providers.push(Box::new(ElevenLabsProvider::new(
            key.clone(),
            config.elevenlabs_voice_id.clone(),
            config.elevenlabs_base_url.clone(),
            config.timeout_secs,
        ))),
        None => debug!("Skipping elevenlabs (no API key)"),
    }

    match &config.openai_api_key {
        Some(key) => providers.push(Box::new(OpenAiTtsProvider::new(
            key.clone(),
            config.openai_model.clone(),
            config.openai_voice.clone(),
            config.openai_base_url.clone(),
            config.timeout_secs,
        ))),
        None => debug!("Skipping openai-tts (no API key)"),
    }

    providers.push(Box::new(EspeakProvider::new(
        config.espeak_voice.clone(),
        config.timeout_secs,
    )));

    providers
}
