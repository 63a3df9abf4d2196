#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for episode video composition.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with timeout and cancellation
//! - Audio duration probing via ffprobe
//! - Script-to-subtitle segmentation and SRT writing
//! - A typed composition-layer graph serialized to a filter complex
//! - The six-step `compose` entry point with atomic output placement

pub mod command;
pub mod compose;
pub mod error;
pub mod fs_utils;
pub mod layers;
pub mod probe;
pub mod progress;
pub mod subtitles;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use compose::{compose, ComposeOptions};
pub use error::{MediaError, MediaResult};
pub use layers::{CompositionGraph, Layer};
pub use probe::{probe_audio, AudioInfo};
pub use progress::{FfmpegProgress, ProgressCallback};
pub use subtitles::{build_subtitle_track, split_script, write_srt, TRAILING_PAD_SECS};
