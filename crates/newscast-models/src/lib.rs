//! Shared data models for the newscast episode pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Subtitle cues and tracks (SRT)
//! - SRT timestamp formatting
//! - Encoding configuration
//! - Render (visual composition) configuration
//! - Run metadata emitted after a successful render

pub mod encoding;
pub mod metadata;
pub mod render;
pub mod subtitle;
pub mod timestamp;

// Re-export common types
pub use encoding::EncodingConfig;
pub use metadata::{RenderResult, RunMetadata};
pub use render::{RenderConfig, Resolution};
pub use subtitle::{SubtitleCue, SubtitleTrack};
pub use timestamp::{format_srt_timestamp, parse_srt_timestamp};
