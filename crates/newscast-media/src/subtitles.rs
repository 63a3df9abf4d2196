//! Script segmentation and subtitle track generation.
//!
//! The script text is split into sentence-sized chunks and the audio
//! duration is distributed evenly across them. Degenerate inputs are
//! handled by policy, not rejected: empty text yields a single fallback
//! cue, and a single run-on chunk falls back to greedy word wrapping.

use std::path::Path;

use newscast_models::{SubtitleCue, SubtitleTrack};
use tracing::debug;

use crate::error::MediaResult;

/// Trailing pad added to the last portion of each cue's end time so the
/// final caption does not appear to cut off early due to rounding.
pub const TRAILING_PAD_SECS: f64 = 0.25;

/// A single chunk longer than this triggers the word-wrap fallback.
const RUNON_THRESHOLD_CHARS: usize = 140;

/// Soft limit for greedy word wrapping. Words are never split.
const WRAP_SOFT_LIMIT_CHARS: usize = 120;

/// Split script text into subtitle-sized chunks.
///
/// Whitespace is normalized first, then the text is split on terminal
/// punctuation (`.`, `!`, `?`). If that produces a single chunk longer
/// than 140 characters (no punctuation, or one run-on sentence), the
/// text is instead greedily word-wrapped at a 120-character soft limit.
pub fn split_script(text: &str) -> Vec<String> {
    let cleaned = normalize_whitespace(text);
    if cleaned.is_empty() {
        return Vec::new();
    }

    let sentences = split_sentences(&cleaned);

    if sentences.len() == 1 && sentences[0].len() > RUNON_THRESHOLD_CHARS {
        return wrap_words(&cleaned);
    }

    sentences
}

/// Collapse all whitespace runs to single spaces and trim.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split on terminal punctuation followed by whitespace.
fn split_sentences(cleaned: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = cleaned.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            // Consume the separating whitespace
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            let sentence = current.trim().to_string();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current.clear();
        }
    }

    let tail = current.trim().to_string();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

/// Greedy word wrapping: accumulate words until the joined chunk
/// exceeds the soft limit, then start a new chunk. Never splits a word.
fn wrap_words(cleaned: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in cleaned.split(' ') {
        current_len += if current.is_empty() {
            word.len()
        } else {
            word.len() + 1
        };
        current.push(word);

        if current_len > WRAP_SOFT_LIMIT_CHARS {
            chunks.push(current.join(" "));
            current.clear();
            current_len = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

/// Generate a subtitle track covering exactly `duration` seconds.
///
/// The duration is divided evenly across the chunks; each cue's end
/// time receives the trailing pad, clamped to the audio duration. For
/// empty script text a single `fallback_text` cue spans the full
/// duration so the output is never caption-less.
pub fn build_subtitle_track(script_text: &str, duration: f64, fallback_text: &str) -> SubtitleTrack {
    let mut chunks = split_script(script_text);
    if chunks.is_empty() {
        chunks.push(fallback_text.to_string());
    }

    let n = chunks.len();
    let per_segment = duration / n as f64;

    debug!(chunks = n, duration, "Distributing subtitle cues");

    let cues = chunks
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let index = i as u32 + 1;
            let start = per_segment * i as f64;
            let end = (per_segment * index as f64 + TRAILING_PAD_SECS).min(duration);
            SubtitleCue {
                index,
                start,
                end,
                text,
            }
        })
        .collect();

    SubtitleTrack { cues, duration }
}

/// Write a subtitle track as an SRT file.
pub async fn write_srt(track: &SubtitleTrack, path: impl AsRef<Path>) -> MediaResult<()> {
    tokio::fs::write(path.as_ref(), track.to_srt()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences_basic() {
        let chunks = split_script("First story. Second story! Third story?");
        assert_eq!(chunks, vec!["First story.", "Second story!", "Third story?"]);
    }

    #[test]
    fn test_split_normalizes_whitespace() {
        let chunks = split_script("  One\t\tstory.   Another\n\nstory.  ");
        assert_eq!(chunks, vec!["One story.", "Another story."]);
    }

    #[test]
    fn test_split_empty_text() {
        assert!(split_script("").is_empty());
        assert!(split_script("   \n\t  ").is_empty());
    }

    #[test]
    fn test_runon_text_wraps_without_splitting_words() {
        let words: Vec<String> = (0..60).map(|i| format!("word{:02}", i)).collect();
        let text = words.join(" ");
        assert!(text.len() > 140);

        let chunks = split_script(&text);
        assert!(chunks.len() > 1);

        // Joining all chunks reconstructs the original word sequence exactly
        let rejoined: Vec<&str> = chunks.iter().flat_map(|c| c.split(' ')).collect();
        let original: Vec<&str> = text.split(' ').collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn test_short_unpunctuated_text_stays_whole() {
        let chunks = split_script("breaking news from the world of AI");
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_three_sentences_over_120_seconds() {
        let track = build_subtitle_track("One. Two. Three.", 120.0, "BRAND");
        assert_eq!(track.cues.len(), 3);

        for (i, cue) in track.cues.iter().enumerate() {
            let expected_start = 40.0 * i as f64;
            assert!((cue.start - expected_start).abs() < 1e-9);
        }
        assert!((track.cues[0].end - 40.25).abs() < 1e-9);
        assert!((track.cues[1].end - 80.25).abs() < 1e-9);
        // Last cue clamps to the audio duration
        assert!((track.cues[2].end - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_script_produces_fallback_cue() {
        let track = build_subtitle_track("", 90.0, "AI DAILY NEWSCAST");
        assert_eq!(track.cues.len(), 1);
        let cue = &track.cues[0];
        assert_eq!(cue.index, 1);
        assert_eq!(cue.text, "AI DAILY NEWSCAST");
        assert!((cue.start - 0.0).abs() < 1e-9);
        assert!((cue.end - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_track_invariants_hold() {
        let script = "Alpha. Beta. Gamma! Delta? Epsilon.";
        let track = build_subtitle_track(script, 33.3, "BRAND");

        assert!((track.cues[0].start - 0.0).abs() < 1e-9);
        for pair in track.cues.windows(2) {
            assert!(pair[0].start <= pair[1].start);
        }
        assert!(track.cues.last().unwrap().end <= 33.3 + TRAILING_PAD_SECS);
        assert!(track.validate(TRAILING_PAD_SECS).is_ok());
    }

    #[test]
    fn test_deterministic_output() {
        let script = "Headline one. Headline two. Headline three.";
        let a = build_subtitle_track(script, 77.7, "BRAND");
        let b = build_subtitle_track(script, 77.7, "BRAND");
        assert_eq!(a.to_srt(), b.to_srt());
    }

    #[tokio::test]
    async fn test_write_srt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode_subtitles.srt");

        let track = build_subtitle_track("Hello world.", 10.0, "BRAND");
        write_srt(&track, &path).await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(contents.starts_with("1\n00:00:00,000 --> 00:00:10,000\nHello world.\n"));
    }
}
