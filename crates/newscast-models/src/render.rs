//! Visual composition configuration.

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::encoding::EncodingConfig;

/// Default output resolution.
pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;
/// Default frame rate.
pub const DEFAULT_FPS: u32 = 30;
/// Default background color (dark navy, hex RGB).
pub const DEFAULT_BACKGROUND_COLOR: &str = "0x050816";
/// Default on-screen brand name.
pub const DEFAULT_BRAND_NAME: &str = "AI DAILY NEWSCAST";
/// Ticker text is truncated to this many characters before doubling.
pub const TICKER_MAX_CHARS: usize = 400;
/// Horizontal ticker scroll speed in pixels per second.
pub const TICKER_SCROLL_PX_PER_SEC: u32 = 140;
/// Default font for drawn text layers.
pub const DEFAULT_FONT_FILE: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

/// Output resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Parse a `WIDTHxHEIGHT` string (e.g., "1920x1080").
    pub fn parse(s: &str) -> Option<Self> {
        let (w, h) = s.split_once('x')?;
        let width = w.trim().parse().ok()?;
        let height = h.trim().parse().ok()?;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Configuration for one composer run.
///
/// All fields have hard defaults so composition succeeds with zero
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RenderConfig {
    /// Output resolution
    #[serde(default)]
    pub resolution: Resolution,

    /// Output frame rate
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Synthetic background color (FFmpeg color syntax)
    #[serde(default = "default_background_color")]
    pub background_color: String,

    /// Brand name drawn bottom-right
    #[serde(default = "default_brand_name")]
    pub brand_name: String,

    /// Optional logo image overlaid top-left; only used if the file exists
    #[serde(default)]
    pub logo_path: Option<PathBuf>,

    /// Font file for drawn text layers
    #[serde(default = "default_font_file")]
    pub font_file: String,

    /// Encoder settings
    #[serde(default)]
    pub encoding: EncodingConfig,
}

fn default_fps() -> u32 {
    DEFAULT_FPS
}
fn default_background_color() -> String {
    DEFAULT_BACKGROUND_COLOR.to_string()
}
fn default_brand_name() -> String {
    DEFAULT_BRAND_NAME.to_string()
}
fn default_font_file() -> String {
    DEFAULT_FONT_FILE.to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            fps: DEFAULT_FPS,
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            brand_name: DEFAULT_BRAND_NAME.to_string(),
            logo_path: None,
            font_file: DEFAULT_FONT_FILE.to_string(),
            encoding: EncodingConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Set the logo asset path.
    pub fn with_logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo_path = Some(path.into());
        self
    }

    /// Set the brand name.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand_name = brand.into();
        self
    }

    /// Resolve the logo path, returning it only if the asset exists on disk.
    pub fn available_logo(&self) -> Option<&Path> {
        self.logo_path
            .as_deref()
            .filter(|p| p.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_parse() {
        assert_eq!(Resolution::parse("1920x1080"), Some(Resolution::new(1920, 1080)));
        assert_eq!(Resolution::parse("1280x720"), Some(Resolution::new(1280, 720)));
        assert_eq!(Resolution::parse("bogus"), None);
        assert_eq!(Resolution::parse("0x1080"), None);
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(Resolution::new(1920, 1080).to_string(), "1920x1080");
    }

    #[test]
    fn test_default_render_config() {
        let config = RenderConfig::default();
        assert_eq!(config.resolution, Resolution::new(1920, 1080));
        assert_eq!(config.fps, 30);
        assert_eq!(config.background_color, "0x050816");
        assert!(config.logo_path.is_none());
    }

    #[test]
    fn test_available_logo_missing_file() {
        let config = RenderConfig::default().with_logo("/nonexistent/logo.png");
        assert!(config.available_logo().is_none());
    }
}
