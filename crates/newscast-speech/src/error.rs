//! Error types for speech synthesis.

use thiserror::Error;

/// Result type for speech operations.
pub type SpeechResult<T> = Result<T, SpeechError>;

/// One failed provider attempt, kept for the all-failed diagnostic.
#[derive(Debug, Clone)]
pub struct AttemptFailure {
    /// Provider name
    pub provider: String,
    /// Human-readable cause
    pub cause: String,
}

/// Errors that can occur during speech synthesis.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("{provider} returned HTTP {status}: {body}")]
    Http {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Request to {provider} failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0} not found in PATH")]
    ToolNotFound(&'static str),

    #[error("{tool} failed: {stderr}")]
    ToolFailed {
        tool: &'static str,
        stderr: String,
        exit_code: Option<i32>,
    },

    #[error("Synthesis timed out after {0} seconds")]
    Timeout(u64),

    #[error("Empty script text, nothing to synthesize")]
    EmptyScript,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("All speech providers failed: {}", format_attempts(.0))]
    AllProvidersFailed(Vec<AttemptFailure>),
}

fn format_attempts(attempts: &[AttemptFailure]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.provider, a.cause))
        .collect::<Vec<_>>()
        .join("; ")
}
