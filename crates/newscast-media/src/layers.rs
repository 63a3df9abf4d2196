//! Typed composition-layer graph.
//!
//! The visual composition is described as an ordered list of layer
//! descriptors and serialized to an FFmpeg filter complex in one place,
//! threading each layer's output label into the next. All text reaching
//! a drawtext payload passes through a single escaping function;
//! unescaped quotes, colons, or backslashes would corrupt the whole
//! filter chain and crash the encoder invocation.

use std::path::PathBuf;

use newscast_models::render::{Resolution, TICKER_MAX_CHARS, TICKER_SCROLL_PX_PER_SEC};

use crate::error::{MediaError, MediaResult};

/// Accent color for the ticker text.
const TICKER_TEXT_COLOR: &str = "#14F4FF";
/// Background color for the ticker bar and brand text box.
const PANEL_COLOR: &str = "0x020617";

/// One visual layer in the composition.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    /// Synthetic background with blur, vignette and contrast styling.
    /// Consumes the lavfi color input; must be the first layer.
    Background {
        input_index: usize,
    },
    /// Logo image anchored top-left at a fixed scale.
    LogoOverlay {
        input_index: usize,
        scale_width: u32,
    },
    /// Burned-in subtitles from an SRT file.
    SubtitleBurnIn {
        path: PathBuf,
    },
    /// Brand-name watermark text, bottom-right, with a background box.
    BrandText {
        text: String,
        font_file: String,
    },
    /// Scrolling bottom-bar ticker. Skipped entirely when empty.
    Ticker {
        text: String,
        font_file: String,
    },
}

/// Serialized filter complex plus the label of the final video stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedGraph {
    pub filter_complex: String,
    pub final_label: String,
}

/// Ordered chain of visual layers consumed by the encoder.
#[derive(Debug, Clone, Default)]
pub struct CompositionGraph {
    layers: Vec<Layer>,
}

impl CompositionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer to the chain.
    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Serialize the layer chain to an FFmpeg filter complex.
    ///
    /// The first layer must be `Background`; every subsequent layer
    /// consumes the previous layer's output label.
    pub fn serialize(&self) -> MediaResult<SerializedGraph> {
        let mut parts: Vec<String> = Vec::new();
        let mut current = String::new();

        for (i, layer) in self.layers.iter().enumerate() {
            match layer {
                Layer::Background { input_index } => {
                    if i != 0 {
                        return Err(MediaError::internal(
                            "Background layer must be first in the composition graph",
                        ));
                    }
                    parts.push(format!(
                        "[{input_index}:v]format=yuv420p,\
                         boxblur=2,\
                         vignette=PI/2:0.5,\
                         eq=contrast=1.05:saturation=1.15[bg]"
                    ));
                    current = "bg".to_string();
                }
                Layer::LogoOverlay {
                    input_index,
                    scale_width,
                } => {
                    self.require_base(i)?;
                    parts.push(format!("[{input_index}:v]scale={scale_width}:-1[logo]"));
                    parts.push(format!(
                        "[{current}][logo]overlay=60:40:format=auto[bg_logo]"
                    ));
                    current = "bg_logo".to_string();
                }
                Layer::SubtitleBurnIn { path } => {
                    self.require_base(i)?;
                    let escaped = escape_filter_path(&path.to_string_lossy());
                    parts.push(format!("[{current}]subtitles='{escaped}'[subbed]"));
                    current = "subbed".to_string();
                }
                Layer::BrandText { text, font_file } => {
                    self.require_base(i)?;
                    let safe_text = escape_drawtext(text);
                    parts.push(format!(
                        "[{current}]drawtext=\
                         fontfile={font_file}:\
                         text='{safe_text}':\
                         x=w-tw-80:y=h-th-60:\
                         fontsize=26:\
                         fontcolor=white:\
                         box=1:boxcolor={PANEL_COLOR}@0.8:boxborderw=20[brand]"
                    ));
                    current = "brand".to_string();
                }
                Layer::Ticker { text, font_file } => {
                    self.require_base(i)?;
                    let safe_ticker = escape_drawtext(text);
                    if safe_ticker.is_empty() {
                        continue;
                    }
                    parts.push(format!(
                        "[{current}]drawbox=\
                         x=0:y=h-80:w=w:h=80:color={PANEL_COLOR}@0.9:t=fill[tbk]"
                    ));
                    // Doubled text gives a seamless wrap as the bar scrolls
                    parts.push(format!(
                        "[tbk]drawtext=fontfile={font_file}:\
                         text='{safe_ticker}   {safe_ticker}':\
                         fontsize=22:\
                         fontcolor={TICKER_TEXT_COLOR}:\
                         x=w-mod(t*{TICKER_SCROLL_PX_PER_SEC}\\, w+tw):\
                         y=h-60:\
                         shadowx=0:shadowy=0:\
                         borderw=0[ticker]"
                    ));
                    current = "ticker".to_string();
                }
            }
        }

        if current.is_empty() {
            return Err(MediaError::internal("Composition graph has no layers"));
        }

        Ok(SerializedGraph {
            filter_complex: parts.join(";"),
            final_label: current,
        })
    }

    fn require_base(&self, index: usize) -> MediaResult<()> {
        if index == 0 {
            return Err(MediaError::internal(
                "Composition graph must start with a Background layer",
            ));
        }
        Ok(())
    }
}

/// Build the lavfi spec for the synthetic background input.
pub fn background_input_spec(color: &str, resolution: Resolution, fps: u32) -> String {
    format!("color=c={color}:size={resolution}:rate={fps}")
}

/// Derive ticker text from the script: whitespace collapsed, truncated
/// to the ticker excerpt limit on a character boundary.
pub fn ticker_excerpt(script_text: &str) -> String {
    let collapsed = script_text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(TICKER_MAX_CHARS).collect()
}

/// Sanitize text destined for a drawtext payload.
///
/// Quotes, colons, backslashes, and the filter-chain separators are
/// replaced with spaces, then whitespace runs collapse to single
/// spaces. This is a correctness requirement: any of these characters
/// would terminate the layer specification early.
pub fn escape_drawtext(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| match c {
            '\'' | '"' | ':' | '\\' | ';' | '[' | ']' | '%' => ' ',
            other => other,
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape a file path for use inside a quoted filter argument.
pub fn escape_filter_path(path: &str) -> String {
    path.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:")
}
