//! FFprobe audio information.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// Audio file information.
#[derive(Debug, Clone)]
pub struct AudioInfo {
    /// Duration in seconds
    pub duration: f64,
    /// Container format name, if reported
    pub format_name: Option<String>,
    /// File size in bytes
    pub size: u64,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    format_name: Option<String>,
    size: Option<String>,
}

/// Probe an audio file for its duration.
///
/// All subsequent subtitle timing is derived from this duration, so a
/// missing file, a failed probe, or a non-positive duration is fatal.
pub async fn probe_audio(path: impl AsRef<Path>) -> MediaResult<AudioInfo> {
    probe_audio_with_timeout(path, None).await
}

/// Probe an audio file, bounding the ffprobe call by `timeout_secs`.
pub async fn probe_audio_with_timeout(
    path: impl AsRef<Path>,
    timeout_secs: Option<u64>,
) -> MediaResult<AudioInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    // Check FFprobe exists
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let output_future = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    let output = if let Some(secs) = timeout_secs {
        tokio::time::timeout(std::time::Duration::from_secs(secs), output_future)
            .await
            .map_err(|_| MediaError::Timeout(secs))??
    } else {
        output_future.await?
    };

    if !output.status.success() {
        return Err(MediaError::ffprobe_failed(
            format!("FFprobe failed for {}", path.display()),
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
        ));
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;

    let duration = probe
        .format
        .duration
        .as_ref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| {
            MediaError::ffprobe_failed(
                format!("FFprobe reported no duration for {}", path.display()),
                None,
            )
        })?;

    if duration <= 0.0 {
        return Err(MediaError::InvalidAudio(format!(
            "Non-positive duration {:.3}s for {}",
            duration,
            path.display()
        )));
    }

    let size = probe
        .format
        .size
        .as_ref()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    Ok(AudioInfo {
        duration,
        format_name: probe.format.format_name,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_missing_file() {
        let err = probe_audio("/nonexistent/episode_audio.mp3")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }

    #[test]
    fn test_parse_probe_output() {
        let json = r#"{"format":{"duration":"123.456","format_name":"mp3","size":"2048"}}"#;
        let probe: FfprobeOutput = serde_json::from_str(json).unwrap();
        assert_eq!(probe.format.duration.as_deref(), Some("123.456"));
        assert_eq!(probe.format.format_name.as_deref(), Some("mp3"));
        assert_eq!(probe.format.size.as_deref(), Some("2048"));
    }

    #[test]
    fn test_parse_probe_output_missing_duration() {
        let json = r#"{"format":{"format_name":"mp3"}}"#;
        let probe: FfprobeOutput = serde_json::from_str(json).unwrap();
        assert!(probe.format.duration.is_none());
    }
}
