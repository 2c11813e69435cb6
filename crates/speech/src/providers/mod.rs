//! Speech backend providers (adapters)

pub mod fallback;
pub mod local;
pub mod remote;

use std::sync::Arc;

use tracing::info;

use crate::cache::SynthesisCache;
use crate::config::{BackendKind, SpeechConfig};
use crate::error::SpeechError;
use crate::ports::SpeechBackend;

use fallback::FallbackBackend;
use local::{LocalSpeechBackend, NativeSpeechEngine};
use remote::{AudioSink, RemoteSpeechBackend};

/// Assemble the backend chain described by configuration
///
/// Backends are tried in `backend_order`. The synthesis cache is attached to
/// the remote backend only when `cache.enabled` is set; the local backend
/// never caches because its events arrive live.
///
/// # Errors
///
/// Returns `SpeechError::Configuration` if the configuration fails
/// validation or a backend cannot be constructed from it.
pub fn build_backend(
    config: &SpeechConfig,
    engine: Arc<dyn NativeSpeechEngine>,
    sink: Arc<dyn AudioSink>,
) -> Result<FallbackBackend, SpeechError> {
    config.validate()?;
    let cache = config
        .cache
        .enabled
        .then(|| SynthesisCache::new(&config.cache));

    let mut backends: Vec<Arc<dyn SpeechBackend>> = Vec::with_capacity(config.backend_order.len());
    for kind in &config.backend_order {
        let backend: Arc<dyn SpeechBackend> = match kind {
            BackendKind::Local => Arc::new(LocalSpeechBackend::new(
                Arc::clone(&engine),
                config.local.clone(),
            )),
            BackendKind::Remote => Arc::new(RemoteSpeechBackend::new(
                config.remote.clone(),
                cache.clone(),
                Arc::clone(&sink),
            )?),
        };
        backends.push(backend);
    }

    info!(
        order = ?config.backend_order,
        cached = cache.is_some(),
        "speech backend chain assembled"
    );
    FallbackBackend::new(backends)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use domain::{LanguageTag, PlaybackRate, SourceKind, SpokenUnit};
    use tokio::sync::mpsc;

    use super::local::NativeEvent;
    use super::*;
    use crate::ports::AudioClock;
    use crate::types::AudioData;

    struct StubEngine {
        speaks: AtomicUsize,
    }

    impl StubEngine {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                speaks: AtomicUsize::new(0),
            })
        }
    }

    impl NativeSpeechEngine for StubEngine {
        fn speak(
            &self,
            _text: &str,
            _language: &LanguageTag,
            _voice: Option<&str>,
            _rate: PlaybackRate,
        ) -> Result<mpsc::Receiver<NativeEvent>, SpeechError> {
            self.speaks.fetch_add(1, Ordering::SeqCst);
            let (tx, rx) = mpsc::channel(1);
            let _ = tx.try_send(NativeEvent::Finished);
            Ok(rx)
        }

        fn pause(&self) {}
        fn resume(&self) {}
        fn cancel(&self) {}
        fn set_rate(&self, _rate: PlaybackRate) {}

        fn is_available(&self) -> bool {
            true
        }
    }

    struct StubSink;

    impl AudioSink for StubSink {
        fn play(
            &self,
            _audio: &AudioData,
            _rate: PlaybackRate,
        ) -> Result<Arc<dyn AudioClock>, SpeechError> {
            Err(SpeechError::PlaybackFailed("stub sink".to_string()))
        }

        fn pause(&self) {}
        fn resume(&self) {}
        fn stop(&self) {}
        fn set_rate(&self, _rate: PlaybackRate) {}
    }

    fn config_with_order(order: Vec<BackendKind>) -> SpeechConfig {
        SpeechConfig {
            backend_order: order,
            ..Default::default()
        }
    }

    #[test]
    fn chain_follows_configured_order() {
        let chain = build_backend(
            &config_with_order(vec![BackendKind::Remote, BackendKind::Local]),
            StubEngine::new(),
            Arc::new(StubSink),
        )
        .unwrap();
        assert!(format!("{chain:?}").contains(r#"["remote", "local"]"#));

        let reordered = build_backend(
            &config_with_order(vec![BackendKind::Local, BackendKind::Remote]),
            StubEngine::new(),
            Arc::new(StubSink),
        )
        .unwrap();
        assert!(format!("{reordered:?}").contains(r#"["local", "remote"]"#));
    }

    #[tokio::test]
    async fn local_first_order_starts_local_engine() {
        let engine = StubEngine::new();
        let chain = build_backend(
            &config_with_order(vec![BackendKind::Local, BackendKind::Remote]),
            engine.clone(),
            Arc::new(StubSink),
        )
        .unwrap();

        let unit = SpokenUnit::new(
            "Hello",
            LanguageTag::parse("en").unwrap(),
            SourceKind::VisibleFallback,
        );
        chain.start(&unit, PlaybackRate::normal()).await.unwrap();
        assert_eq!(engine.speaks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_order_rejected() {
        let result = build_backend(
            &config_with_order(vec![]),
            StubEngine::new(),
            Arc::new(StubSink),
        );
        assert!(matches!(result, Err(SpeechError::Configuration(_))));
    }
}
