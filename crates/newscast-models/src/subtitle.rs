//! Subtitle cues and SRT rendering.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::timestamp::format_srt_timestamp;

/// One timed caption entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubtitleCue {
    /// 1-based sequential index
    pub index: u32,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Caption text (single line)
    pub text: String,
}

impl SubtitleCue {
    /// Render this cue as one SRT block (index, time range, text, blank line).
    pub fn to_srt_block(&self) -> String {
        format!(
            "{}\n{} --> {}\n{}\n\n",
            self.index,
            format_srt_timestamp(self.start),
            format_srt_timestamp(self.end),
            self.text
        )
    }
}

/// Ordered sequence of subtitle cues covering one audio track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubtitleTrack {
    /// Cues in display order
    pub cues: Vec<SubtitleCue>,
    /// Audio duration the track was generated for, in seconds
    pub duration: f64,
}

impl SubtitleTrack {
    /// Render the whole track as SRT file contents.
    pub fn to_srt(&self) -> String {
        self.cues.iter().map(SubtitleCue::to_srt_block).collect()
    }

    /// Validate track invariants: non-empty, 1-based contiguous indices,
    /// monotonically non-decreasing start times, and the final end time
    /// within `tolerance` of the audio duration.
    pub fn validate(&self, tolerance: f64) -> Result<(), SubtitleTrackError> {
        if self.cues.is_empty() {
            return Err(SubtitleTrackError::Empty);
        }

        for (i, cue) in self.cues.iter().enumerate() {
            let expected = i as u32 + 1;
            if cue.index != expected {
                return Err(SubtitleTrackError::BadIndex {
                    expected,
                    actual: cue.index,
                });
            }
            if cue.end < cue.start {
                return Err(SubtitleTrackError::NegativeSpan { index: cue.index });
            }
        }

        for pair in self.cues.windows(2) {
            if pair[1].start < pair[0].start {
                return Err(SubtitleTrackError::NonMonotonic {
                    index: pair[1].index,
                });
            }
        }

        let last_end = self.cues.last().map(|c| c.end).unwrap_or(0.0);
        if last_end > self.duration + tolerance {
            return Err(SubtitleTrackError::OverrunsDuration {
                last_end,
                duration: self.duration,
            });
        }

        Ok(())
    }
}

/// Subtitle track invariant violation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubtitleTrackError {
    #[error("Subtitle track has no cues")]
    Empty,

    #[error("Cue index mismatch: expected {expected}, got {actual}")]
    BadIndex { expected: u32, actual: u32 },

    #[error("Cue {index} ends before it starts")]
    NegativeSpan { index: u32 },

    #[error("Cue {index} starts before its predecessor")]
    NonMonotonic { index: u32 },

    #[error("Last cue ends at {last_end:.3}s, past audio duration {duration:.3}s")]
    OverrunsDuration { last_end: f64, duration: f64 },
}
