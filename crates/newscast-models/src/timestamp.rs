//! SRT timestamp formatting and parsing.
//!
//! Subtitle cue times render in the caption-standard `HH:MM:SS,mmm`
//! form. Parsing is provided for validation and tests.

/// Format seconds into an SRT `HH:MM:SS,mmm` timestamp.
///
/// Negative inputs clamp to zero.
///
/// # Examples
/// ```
/// use newscast_models::timestamp::format_srt_timestamp;
/// assert_eq!(format_srt_timestamp(0.0), "00:00:00,000");
/// assert_eq!(format_srt_timestamp(90.5), "00:01:30,500");
/// ```
pub fn format_srt_timestamp(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let total_ms = (seconds * 1000.0).round() as u64;

    let hours = total_ms / 3_600_000;
    let rem = total_ms % 3_600_000;
    let minutes = rem / 60_000;
    let rem = rem % 60_000;
    let secs = rem / 1000;
    let ms = rem % 1000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, ms)
}

/// Parse an SRT `HH:MM:SS,mmm` timestamp back to seconds.
pub fn parse_srt_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let (hms, ms) = ts
        .split_once(',')
        .ok_or_else(|| TimestampError::InvalidFormat(ts.to_string()))?;

    let parts: Vec<&str> = hms.split(':').collect();
    if parts.len() != 3 {
        return Err(TimestampError::InvalidFormat(ts.to_string()));
    }

    let hours: u64 = parts[0]
        .parse()
        .map_err(|_| TimestampError::InvalidValue("hours", parts[0].to_string()))?;
    let minutes: u64 = parts[1]
        .parse()
        .map_err(|_| TimestampError::InvalidValue("minutes", parts[1].to_string()))?;
    let seconds: u64 = parts[2]
        .parse()
        .map_err(|_| TimestampError::InvalidValue("seconds", parts[2].to_string()))?;
    let millis: u64 = ms
        .parse()
        .map_err(|_| TimestampError::InvalidValue("milliseconds", ms.to_string()))?;

    if minutes >= 60 || seconds >= 60 || millis >= 1000 {
        return Err(TimestampError::InvalidFormat(ts.to_string()));
    }

    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds as f64 + millis as f64 / 1000.0)
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimestampError {
    #[error("Timestamp cannot be empty")]
    Empty,

    #[error("Invalid {0} value: {1}")]
    InvalidValue(&'static str, String),

    #[error("Invalid SRT timestamp '{0}'. Expected HH:MM:SS,mmm")]
    InvalidFormat(String),
}
