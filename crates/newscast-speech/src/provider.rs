//! Speech provider trait.

use std::path::Path;

use async_trait::async_trait;

use crate::error::SpeechResult;

/// A text-to-speech backend.
///
/// Implementations are constructed once per run by the factory and
/// passed explicitly to consumers; there is no process-wide provider
/// state.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Short provider name used in logs and failure diagnostics.
    fn name(&self) -> &'static str;

    /// Render `text` as narration audio at `out_path`.
    ///
    /// On error the output file is not left behind.
    async fn synthesize(&self, text: &str, out_path: &Path) -> SpeechResult<()>;
}
