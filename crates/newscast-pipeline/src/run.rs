//! Sequential stage driver.

use std::path::PathBuf;

use anyhow::{bail, Context};
use newscast_media::compose::{compose, ComposeOptions};
use newscast_models::RenderResult;
use newscast_speech::{build_providers, synthesize_with_fallback};
use tracing::info;

use crate::config::PipelineConfig;

/// Run the pipeline: script → narration audio → composed episode.
///
/// Returns the composer's result on success. Any stage failure aborts
/// the run with context describing which stage failed.
pub async fn run(config: &PipelineConfig) -> anyhow::Result<RenderResult> {
    let script_text = tokio::fs::read_to_string(&config.script_path)
        .await
        .with_context(|| format!("Script not found: {}", config.script_path.display()))?;
    info!(
        script = %config.script_path.display(),
        chars = script_text.len(),
        "Loaded episode script"
    );

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Cannot create output dir {}", config.output_dir.display()))?;

    let audio_path = match &config.audio_path {
        Some(path) => {
            if !path.exists() {
                bail!("Pre-rendered audio not found: {}", path.display());
            }
            info!(audio = %path.display(), "Using pre-rendered narration audio");
            path.clone()
        }
        None => synthesize_narration(config, &script_text).await?,
    };

    let options = ComposeOptions {
        render: config.render_config(),
        probe_timeout_secs: config.probe_timeout_secs,
        encode_timeout_secs: config.encode_timeout_secs,
        cancel_rx: None,
    };

    let output_path = config.output_dir.join("episode_video.mp4");
    let result = compose(&audio_path, &script_text, &output_path, options)
        .await
        .context("Video composition failed")?;

    Ok(result)
}

/// Speech stage: provider chain with ordered fallback.
async fn synthesize_narration(
    config: &PipelineConfig,
    script_text: &str,
) -> anyhow::Result<PathBuf> {
    let providers = build_providers(&config.speech);
    let audio_path = config.output_dir.join("episode_audio.mp3");

    let provider = synthesize_with_fallback(&providers, script_text, &audio_path)
        .await
        .context("Narration synthesis failed")?;

    info!(provider, audio = %audio_path.display(), "Narration audio ready");
    Ok(audio_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_script_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            output_dir: dir.path().join("output"),
            script_path: dir.path().join("missing_script.txt"),
            ..Default::default()
        };

        let err = run(&config).await.unwrap_err();
        assert!(err.to_string().contains("Script not found"));
        // The failed run creates no artifacts
        assert!(!config.output_dir.exists());
    }

    #[tokio::test]
    async fn test_missing_prerendered_audio_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("episode_script.txt");
        tokio::fs::write(&script, "Today in AI.").await.unwrap();

        let config = PipelineConfig {
            output_dir: dir.path().join("output"),
            script_path: script,
            audio_path: Some(dir.path().join("missing_audio.mp3")),
            ..Default::default()
        };

        let err = run(&config).await.unwrap_err();
        assert!(err.to_string().contains("Pre-rendered audio not found"));
    }
}
