//! OpenAI text-to-speech provider.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::error::{SpeechError, SpeechResult};
use crate::provider::SpeechProvider;

/// OpenAI TTS HTTP provider.
pub struct OpenAiTtsProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    voice: String,
    base_url: String,
}

impl OpenAiTtsProvider {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
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
            model: model.into(),
            voice: voice.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SpeechProvider for OpenAiTtsProvider {
    fn name(&self) -> &'static str {
        "openai-tts"
    }

    async fn synthesize(&self, text: &str, out_path: &Path) -> SpeechResult<()> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyScript);
        }

        let url = format!("{}/v1/audio/speech", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "voice": self.voice,
                "input": text,
            }))
            .send()
            .await
            .map_err(|source| SpeechError::Request {
                provider: "openai-tts",
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Http {
                provider: "openai-tts",
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| SpeechError::Request {
                provider: "openai-tts",
                source,
            })?;

        tokio::fs::write(out_path, &bytes).await?;
        info!(
            model = %self.model,
            voice = %self.voice,
            bytes = bytes.len(),
            out = %out_path.display(),
            "OpenAI TTS synthesis complete"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_synthesize_writes_audio_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/speech"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"opus".to_vec()))
            .mount(&server)
            .await;

        let provider = OpenAiTtsProvider::new("key", "tts-1-hd", "onyx", server.uri(), 30);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("episode_audio.mp3");

        provider.synthesize("Top stories.", &out).await.unwrap();
        assert_eq!(tokio::fs::read(&out).await.unwrap(), b"opus");
    }

    #[tokio::test]
    async fn test_rate_limit_error_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let provider = OpenAiTtsProvider::new("key", "tts-1-hd", "onyx", server.uri(), 30);
        let dir = tempfile::tempdir().unwrap();

        let err = provider
            .synthesize("Text.", &dir.path().join("out.mp3"))
            .await
            .unwrap_err();
        match err {
            SpeechError::Http { status, body, .. } => {
                assert_eq!(status, 429);
                assert!(body.contains("rate limited"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
