//! Pipeline configuration.

use std::path::PathBuf;

use newscast_media::compose::{DEFAULT_ENCODE_TIMEOUT_SECS, DEFAULT_PROBE_TIMEOUT_SECS};
use newscast_models::render::{Resolution, DEFAULT_BRAND_NAME};
use newscast_models::{EncodingConfig, RenderConfig};
use newscast_speech::SpeechConfig;

/// Configuration for one pipeline run.
///
/// Everything is env-derived with hard defaults so a bare invocation
/// in CI works with no configuration at all.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory receiving all artifacts
    pub output_dir: PathBuf,
    /// Narration script text file
    pub script_path: PathBuf,
    /// Pre-rendered narration audio; set to skip the speech stage
    pub audio_path: Option<PathBuf>,
    /// Output resolution
    pub resolution: Resolution,
    /// Output frame rate
    pub fps: u32,
    /// Encoder preset
    pub preset: String,
    /// Encoder quality factor
    pub crf: u8,
    /// Brand name for watermark and fallback cue
    pub brand: String,
    /// Logo asset; overlaid only if the file exists
    pub logo_path: PathBuf,
    /// Bound on the duration probe
    pub probe_timeout_secs: u64,
    /// Bound on the encoder invocation
    pub encode_timeout_secs: u64,
    /// Speech stage configuration
    pub speech: SpeechConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let defaults = RenderConfig::default();
        Self {
            output_dir: PathBuf::from("output"),
            script_path: PathBuf::from("output/episode_script.txt"),
            audio_path: None,
            resolution: defaults.resolution,
            fps: defaults.fps,
            preset: defaults.encoding.preset,
            crf: defaults.encoding.crf,
            brand: DEFAULT_BRAND_NAME.to_string(),
            logo_path: PathBuf::from("assets/logo.png"),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            encode_timeout_secs: DEFAULT_ENCODE_TIMEOUT_SECS,
            speech: SpeechConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            output_dir: std::env::var("NEWSCAST_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            script_path: std::env::var("NEWSCAST_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(defaults.script_path),
            audio_path: std::env::var("NEWSCAST_AUDIO").ok().map(PathBuf::from),
            resolution: std::env::var("VIDEO_RESOLUTION")
                .ok()
                .and_then(|s| Resolution::parse(&s))
                .unwrap_or(defaults.resolution),
            fps: std::env::var("VIDEO_FPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.fps),
            preset: std::env::var("VIDEO_PRESET").unwrap_or(defaults.preset),
            crf: std::env::var("VIDEO_CRF")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.crf),
            brand: std::env::var("NEWSCAST_BRAND").unwrap_or(defaults.brand),
            logo_path: std::env::var("NEWSCAST_LOGO")
                .map(PathBuf::from)
                .unwrap_or(defaults.logo_path),
            probe_timeout_secs: std::env::var("PROBE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.probe_timeout_secs),
            encode_timeout_secs: std::env::var("ENCODE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.encode_timeout_secs),
            speech: SpeechConfig::from_env(),
        }
    }

    /// Assemble the composer's render configuration.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            resolution: self.resolution,
            fps: self.fps,
            brand_name: self.brand.clone(),
            logo_path: Some(self.logo_path.clone()),
            encoding: EncodingConfig::default()
                .with_preset(self.preset.clone())
                .with_crf(self.crf),
            ..RenderConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.resolution, Resolution::new(1920, 1080));
        assert_eq!(config.fps, 30);
        assert_eq!(config.preset, "medium");
        assert_eq!(config.crf, 19);
        assert!(config.audio_path.is_none());
    }

    #[test]
    fn test_render_config_assembly() {
        let config = PipelineConfig {
            resolution: Resolution::new(1280, 720),
            fps: 25,
            preset: "fast".to_string(),
            crf: 23,
            brand: "NIGHTLY AI".to_string(),
            ..Default::default()
        };

        let render = config.render_config();
        assert_eq!(render.resolution, Resolution::new(1280, 720));
        assert_eq!(render.fps, 25);
        assert_eq!(render.encoding.preset, "fast");
        assert_eq!(render.encoding.crf, 23);
        assert_eq!(render.brand_name, "NIGHTLY AI");
        assert_eq!(render.logo_path, Some(PathBuf::from("assets/logo.png")));
    }
}
