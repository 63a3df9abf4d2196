//! Local espeak-ng provider.
//!
//! Always-available fallback: no credentials, no network. Output
//! quality is robotic but the pipeline still produces an episode when
//! every remote provider is down.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::error::{SpeechError, SpeechResult};
use crate::provider::SpeechProvider;

/// espeak-ng subprocess provider.
pub struct EspeakProvider {
    voice: String,
    timeout_secs: u64,
}

impl EspeakProvider {
    pub fn new(voice: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            voice: voice.into(),
            timeout_secs,
        }
    }
}

#[async_trait]
impl SpeechProvider for EspeakProvider {
    fn name(&self) -> &'static str {
        "espeak-ng"
    }

    async fn synthesize(&self, text: &str, out_path: &Path) -> SpeechResult<()> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyScript);
        }

        which::which("espeak-ng").map_err(|_| SpeechError::ToolNotFound("espeak-ng"))?;

        let output_future = Command::new("espeak-ng")
            .arg("-v")
            .arg(&self.voice)
            .arg("-w")
            .arg(out_path)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output();

        let output = tokio::time::timeout(
            std::time::Duration::from_secs(self.timeout_secs),
            output_future,
        )
        .await
        .map_err(|_| SpeechError::Timeout(self.timeout_secs))??;

        if !output.status.success() {
            // Do not leave a partial wav behind
            let _ = tokio::fs::remove_file(out_path).await;
            return Err(SpeechError::ToolFailed {
                tool: "espeak-ng",
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                exit_code: output.status.code(),
            });
        }

        info!(voice = %self.voice, out = %out_path.display(), "espeak-ng synthesis complete");
        Ok(())
    }
}
