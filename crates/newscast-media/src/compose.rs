//! Episode video composition.
//!
//! The composer turns a narrated audio track plus its source script
//! into a finished episode video in six strictly ordered steps:
//! probe duration, generate subtitle cues, write the SRT, build the
//! layer graph, run the encoder, emit run metadata. Any step's failure
//! is terminal for the run; re-running the composer is cheap and
//! side-effect-free apart from overwriting the output file.
//!
//! All intermediates live in a run-scoped temp directory and the
//! finished video is renamed into place only after the encoder
//! succeeds, so no partial output is ever visible at the final path.

use std::path::{Path, PathBuf};

use chrono::Utc;
use newscast_models::{RenderConfig, RenderResult, RunMetadata};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::fs_utils::move_file;
use crate::layers::{background_input_spec, ticker_excerpt, CompositionGraph, Layer};
use crate::probe::probe_audio_with_timeout;
use crate::subtitles::{build_subtitle_track, write_srt, TRAILING_PAD_SECS};

/// Default bound on the duration probe, in seconds.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;
/// Default bound on the encoder invocation, in seconds.
pub const DEFAULT_ENCODE_TIMEOUT_SECS: u64 = 1800;
/// Logo overlay width in pixels (height keeps aspect).
const LOGO_SCALE_WIDTH: u32 = 180;

/// Options for one composer invocation.
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    /// Visual and encoder configuration
    pub render: RenderConfig,
    /// Timeout for the ffprobe call
    pub probe_timeout_secs: u64,
    /// Timeout for the ffmpeg render
    pub encode_timeout_secs: u64,
    /// Optional cancellation signal; the in-flight encoder is killed
    /// and no output is left behind
    pub cancel_rx: Option<watch::Receiver<bool>>,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            encode_timeout_secs: DEFAULT_ENCODE_TIMEOUT_SECS,
            cancel_rx: None,
        }
    }
}

impl ComposeOptions {
    pub fn new(render: RenderConfig) -> Self {
        Self {
            render,
            ..Default::default()
        }
    }

    /// Set the cancellation signal.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }
}

/// Compose the episode video.
///
/// `audio_path` must reference an existing, probe-able audio file.
/// `script_text` may be empty; the fallback-cue policy guarantees the
/// output is never caption-less. On success the rendered video sits at
/// `output_path` with the subtitle file and metadata record beside it.
pub async fn compose(
    audio_path: impl AsRef<Path>,
    script_text: &str,
    output_path: impl AsRef<Path>,
    options: ComposeOptions,
) -> MediaResult<RenderResult> {
    let audio_path = audio_path.as_ref();
    let output_path = output_path.as_ref();
    let config = &options.render;

    // Step 1: probe the audio duration. Everything downstream is
    // duration-derived, so failure here halts the run.
    let audio = probe_audio_with_timeout(audio_path, Some(options.probe_timeout_secs)).await?;
    info!(
        audio = %audio_path.display(),
        duration_secs = format!("{:.1}", audio.duration),
        "Probed narration audio"
    );

    // Steps 2-3: subtitle cues, written into the run temp dir.
    let track = build_subtitle_track(script_text, audio.duration, &config.brand_name);
    track.validate(TRAILING_PAD_SECS)?;

    let workdir = tempfile::tempdir()?;
    let srt_tmp = workdir.path().join("episode_subtitles.srt");
    write_srt(&track, &srt_tmp).await?;
    info!(cues = track.cues.len(), "Generated subtitle track");

    // Step 4: layer graph.
    let logo = config.available_logo().map(Path::to_path_buf);
    let graph = build_layer_graph(config, logo.as_deref(), &srt_tmp, script_text);
    let serialized = graph.serialize()?;
    debug!(filter = %serialized.filter_complex, "Built composition graph");

    // Step 5: single encoder invocation into the temp dir.
    let video_tmp = workdir.path().join("episode_video.mp4");
    let cmd = build_render_command(
        config,
        audio_path,
        logo.as_deref(),
        &serialized.filter_complex,
        &serialized.final_label,
        &video_tmp,
    );

    let mut runner = FfmpegRunner::new().with_timeout(options.encode_timeout_secs);
    if let Some(cancel_rx) = options.cancel_rx.clone() {
        runner = runner.with_cancel(cancel_rx);
    }

    let total_duration = audio.duration;
    runner
        .run_with_progress(&cmd, move |p| {
            debug!(
                percent = format!("{:.0}", p.percentage(total_duration)),
                speed = p.speed,
                "Render progress"
            );
        })
        .await?;

    // Step 6: move outputs into place, then emit metadata. The video
    // moves first so a failed subtitle move never leaves captions
    // beside a missing video; metadata is only ever written after a
    // fully successful render.
    move_file(&video_tmp, output_path).await?;
    let subtitle_path = output_path.with_extension("srt");
    move_file(&srt_tmp, &subtitle_path).await?;

    let metadata = RunMetadata {
        output_file: output_path.to_path_buf(),
        duration_seconds: audio.duration,
        brand: config.brand_name.clone(),
        resolution: config.resolution,
        fps: config.fps,
        generated_at: Utc::now(),
    };
    let metadata_path = sibling_metadata_path(output_path);
    tokio::fs::write(&metadata_path, serde_json::to_vec_pretty(&metadata)?).await?;

    info!(
        output = %output_path.display(),
        metadata = %metadata_path.display(),
        "Episode video rendered"
    );

    Ok(RenderResult {
        output_path: output_path.to_path_buf(),
        subtitle_path,
        metadata_path,
        metadata,
    })
}

/// Assemble the ordered layer chain for one run.
///
/// Input indices mirror the encoder invocation: 0 is the synthetic
/// background, 1 the audio, 2 the logo when present.
fn build_layer_graph(
    config: &RenderConfig,
    logo: Option<&Path>,
    subtitle_path: &Path,
    script_text: &str,
) -> CompositionGraph {
    let mut graph = CompositionGraph::new();
    graph.push(Layer::Background { input_index: 0 });

    if let Some(logo_path) = logo {
        debug!(logo = %logo_path.display(), "Including logo overlay");
        graph.push(Layer::LogoOverlay {
            input_index: 2,
            scale_width: LOGO_SCALE_WIDTH,
        });
    }

    graph.push(Layer::SubtitleBurnIn {
        path: subtitle_path.to_path_buf(),
    });
    graph.push(Layer::BrandText {
        text: config.brand_name.clone(),
        font_file: config.font_file.clone(),
    });

    let ticker = ticker_excerpt(script_text);
    if !ticker.is_empty() {
        graph.push(Layer::Ticker {
            text: ticker,
            font_file: config.font_file.clone(),
        });
    }

    graph
}

/// Build the single ffmpeg invocation for the render.
fn build_render_command(
    config: &RenderConfig,
    audio_path: &Path,
    logo: Option<&Path>,
    filter_complex: &str,
    final_label: &str,
    output: &Path,
) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new(output)
        .input_lavfi(background_input_spec(
            &config.background_color,
            config.resolution,
            config.fps,
        ))
        .input_file(audio_path);

    if let Some(logo_path) = logo {
        cmd = cmd.input_file(logo_path);
    }

    cmd.filter_complex(filter_complex)
        .map(format!("[{final_label}]"))
        .map("1:a")
        .output_args(config.encoding.to_ffmpeg_args())
        .shortest()
}

/// Metadata record path next to the rendered video.
fn sibling_metadata_path(output_path: &Path) -> PathBuf {
    output_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("video_metadata.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;
    use newscast_models::render::Resolution;

    #[tokio::test]
    async fn test_missing_audio_is_fatal_before_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("episode_video.mp4");

        let err = compose(
            dir.path().join("missing.mp3"),
            "Some script.",
            &output,
            ComposeOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MediaError::FileNotFound(_)));
        // Nothing was written: no video, no subtitles, no metadata
        assert!(!output.exists());
        assert!(!output.with_extension("srt").exists());
        assert!(!dir.path().join("video_metadata.json").exists());
    }

    #[test]
    fn test_render_command_without_logo() {
        let config = RenderConfig::default();
        let cmd = build_render_command(
            &config,
            Path::new("audio.mp3"),
            None,
            "[0:v]format=yuv420p[bg]",
            "bg",
            Path::new("out.mp4"),
        );
        let args = cmd.build_args();

        assert_eq!(args.iter().filter(|a| *a == "-i").count(), 2);
        assert!(args.contains(&"[bg]".to_string()));
        assert!(args.contains(&"1:a".to_string()));
        assert!(args.contains(&"-shortest".to_string()));
        assert!(args.contains(&"libx264".to_string()));
        assert!(args.contains(&"aac".to_string()));
    }

    #[test]
    fn test_render_command_with_logo() {
        let config = RenderConfig::default();
        let cmd = build_render_command(
            &config,
            Path::new("audio.mp3"),
            Some(Path::new("logo.png")),
            "[0:v]format=yuv420p[bg]",
            "bg",
            Path::new("out.mp4"),
        );
        let args = cmd.build_args();

        assert_eq!(args.iter().filter(|a| *a == "-i").count(), 3);
        let logo_pos = args.iter().position(|a| a == "logo.png").unwrap();
        let audio_pos = args.iter().position(|a| a == "audio.mp3").unwrap();
        assert!(audio_pos < logo_pos, "logo must be the third input");
    }

    #[test]
    fn test_layer_graph_shape() {
        let config = RenderConfig::default();
        let graph = build_layer_graph(
            &config,
            None,
            Path::new("subs.srt"),
            "Today in AI news.",
        );

        let layers = graph.layers();
        assert!(matches!(layers[0], Layer::Background { input_index: 0 }));
        assert!(matches!(layers[1], Layer::SubtitleBurnIn { .. }));
        assert!(matches!(layers[2], Layer::BrandText { .. }));
        assert!(matches!(layers[3], Layer::Ticker { .. }));
    }

    #[test]
    fn test_layer_graph_empty_script_has_no_ticker() {
        let config = RenderConfig::default();
        let graph = build_layer_graph(&config, None, Path::new("subs.srt"), "");
        assert!(!graph
            .layers()
            .iter()
            .any(|l| matches!(l, Layer::Ticker { .. })));
    }

    #[test]
    fn test_layer_graph_with_logo_uses_input_two() {
        let config = RenderConfig::default();
        let graph = build_layer_graph(
            &config,
            Some(Path::new("logo.png")),
            Path::new("subs.srt"),
            "News.",
        );
        assert!(graph.layers().iter().any(|l| matches!(
            l,
            Layer::LogoOverlay {
                input_index: 2,
                ..
            }
        )));
    }

    #[test]
    fn test_sibling_metadata_path() {
        assert_eq!(
            sibling_metadata_path(Path::new("output/episode_video.mp4")),
            PathBuf::from("output/video_metadata.json")
        );
        assert_eq!(
            sibling_metadata_path(Path::new("episode_video.mp4")),
            PathBuf::from("video_metadata.json")
        );
    }

    #[test]
    fn test_compose_options_defaults() {
        let opts = ComposeOptions::default();
        assert_eq!(opts.probe_timeout_secs, DEFAULT_PROBE_TIMEOUT_SECS);
        assert_eq!(opts.encode_timeout_secs, DEFAULT_ENCODE_TIMEOUT_SECS);
        assert_eq!(opts.render.resolution, Resolution::new(1920, 1080));
        assert!(opts.cancel_rx.is_none());
    }
}
