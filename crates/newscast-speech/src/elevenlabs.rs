//! ElevenLabs text-to-speech provider.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::error::{SpeechError, SpeechResult};
use crate::provider::SpeechProvider;

/// TTS model requested from ElevenLabs.
const ELEVENLABS_MODEL: &str = "eleven_multilingual_v2";

/// ElevenLabs HTTP provider.
pub struct ElevenLabsProvider {
    client: reqwest::Client,
    api_key: String,
    voice_id: String,
    base_url: String,
}

impl ElevenLabsProvider {
    pub fn new(
        api_key: impl Into<String>,
        voice_id: impl Into<String>,
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
            voice_id: voice_id.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsProvider {
    fn name(&self) -> &'static str {
        "elevenlabs"
    }

    async fn synthesize(&self, text: &str, out_path: &Path) -> SpeechResult<()> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyScript);
        }

        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.base_url.trim_end_matches('/'),
            self.voice_id
        );

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&json!({
                "text": text,
                "model_id": ELEVENLABS_MODEL,
            }))
            .send()
            .await
            .map_err(|source| SpeechError::Request {
                provider: "elevenlabs",
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Http {
                provider: "elevenlabs",
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| SpeechError::Request {
                provider: "elevenlabs",
                source,
            })?;

        tokio::fs::write(out_path, &bytes).await?;
        info!(
            voice = %self.voice_id,
            bytes = bytes.len(),
            out = %out_path.display(),
            "ElevenLabs synthesis complete"
        );
        Ok(())
    }
}
