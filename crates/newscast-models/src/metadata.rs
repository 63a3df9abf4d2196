//! Run metadata emitted after a successful render.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::render::Resolution;

/// Small record describing one composer invocation.
///
/// Written next to the rendered video; downstream stages (e.g., upload)
/// may read it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RunMetadata {
    /// Path to the rendered video
    pub output_file: PathBuf,
    /// Audio/video duration in seconds
    pub duration_seconds: f64,
    /// Brand name burned into the video
    pub brand: String,
    /// Output resolution
    pub resolution: Resolution,
    /// Output frame rate
    pub fps: u32,
    /// Generation timestamp (UTC)
    pub generated_at: DateTime<Utc>,
}

/// Result of a successful composer run.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Path to the rendered video
    pub output_path: PathBuf,
    /// Path to the subtitle file written alongside
    pub subtitle_path: PathBuf,
    /// Path to the metadata record
    pub metadata_path: PathBuf,
    /// The emitted metadata
    pub metadata: RunMetadata,
}
