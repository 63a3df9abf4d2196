//! Ordered first-success provider fallback.

use std::path::Path;

use tracing::{info, warn};

use crate::error::{AttemptFailure, SpeechError, SpeechResult};
use crate::provider::SpeechProvider;

/// Try each provider in order, returning the name of the first one
/// that succeeds.
///
/// Every failed attempt is collected; if the whole chain fails, the
/// returned error carries each provider's diagnostic so the caller
/// sees the full picture rather than only the last failure.
pub async fn synthesize_with_fallback(
    providers: &[Box<dyn SpeechProvider>],
    text: &str,
    out_path: &Path,
) -> SpeechResult<&'static str> {
    let mut failures: Vec<AttemptFailure> = Vec::new();

    for provider in providers {
        info!(provider = provider.name(), "Trying speech provider");
        match provider.synthesize(text, out_path).await {
            Ok(()) => {
                info!(provider = provider.name(), "Speech synthesis succeeded");
                return Ok(provider.name());
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "Speech provider failed");
                failures.push(AttemptFailure {
                    provider: provider.name().to_string(),
                    cause: e.to_string(),
                });
            }
        }
    }

    Err(SpeechError::AllProvidersFailed(failures))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct FakeProvider {
        name: &'static str,
        succeed: bool,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl SpeechProvider for FakeProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn synthesize(&self, _text: &str, out_path: &Path) -> SpeechResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                tokio::fs::write(out_path, b"audio").await?;
                Ok(())
            } else {
                Err(SpeechError::ToolNotFound("fake"))
            }
        }
    }

    fn fake(name: &'static str, succeed: bool, calls: &Arc<AtomicU32>) -> Box<dyn SpeechProvider> {
        Box::new(FakeProvider {
            name,
            succeed,
            calls: calls.clone(),
        })
    }

    #[tokio::test]
    async fn test_first_success_stops_the_chain() {
        let calls_a = Arc::new(AtomicU32::new(0));
        let calls_b = Arc::new(AtomicU32::new(0));
        let providers = vec![fake("a", true, &calls_a), fake("b", true, &calls_b)];

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("audio.mp3");

        let winner = synthesize_with_fallback(&providers, "text", &out)
            .await
            .unwrap();

        assert_eq!(winner, "a");
        assert_eq!(calls_a.load(Ordering::SeqCst), 1);
        assert_eq!(calls_b.load(Ordering::SeqCst), 0);
        assert!(out.exists());
    }

    #[tokio::test]
    async fn test_falls_through_to_later_provider() {
        let calls_a = Arc::new(AtomicU32::new(0));
        let calls_b = Arc::new(AtomicU32::new(0));
        let providers = vec![fake("a", false, &calls_a), fake("b", true, &calls_b)];

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("audio.mp3");

        let winner = synthesize_with_fallback(&providers, "text", &out)
            .await
            .unwrap();

        assert_eq!(winner, "b");
        assert_eq!(calls_a.load(Ordering::SeqCst), 1);
        assert_eq!(calls_b.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_failed_collects_every_diagnostic() {
        let calls = Arc::new(AtomicU32::new(0));
        let providers = vec![fake("a", false, &calls), fake("b", false, &calls)];

        let dir = tempfile::tempdir().unwrap();
        let err = synthesize_with_fallback(&providers, "text", &dir.path().join("audio.mp3"))
            .await
            .unwrap_err();

        match err {
            SpeechError::AllProvidersFailed(failures) => {
                assert_eq!(failures.len(), 2);
                assert_eq!(failures[0].provider, "a");
                assert_eq!(failures[1].provider, "b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
