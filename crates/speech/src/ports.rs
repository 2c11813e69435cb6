//! Port definitions for speech backends
//!
//! Defines the trait every backend implements and the session types the
//! playback controller consumes. The two backend categories surface their
//! timing through a tagged feed: live boundary events for the local
//! category, a precomputed timing list plus an audio clock for the remote
//! category.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{PlaybackRate, SpokenUnit, WordTiming};
use tokio::sync::mpsc;

use crate::error::SpeechError;

/// A normalized event emitted by a live backend session
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// Speech reached a word boundary
    Word(WordTiming),
    /// The utterance finished normally
    Completed,
    /// The session was cancelled
    Cancelled,
    /// The backend failed mid-session
    Failed(String),
}

/// Actual audio playback position of a precomputed session
///
/// Position is real playout time reported by the host audio sink, never a
/// wall-clock estimate.
pub trait AudioClock: Send + Sync {
    /// Current playback position in milliseconds
    fn position_ms(&self) -> f64;

    /// Whether the audio stream has finished playing
    fn is_finished(&self) -> bool;
}

/// Control surface of one backend session
///
/// All methods are best-effort and non-blocking: cancellation may complete
/// asynchronously after the controller has already reported idle.
pub trait SessionControl: Send + Sync {
    /// Pause playback, keeping position
    fn pause(&self);

    /// Resume paused playback
    fn resume(&self);

    /// Tear the session down
    fn cancel(&self);

    /// Apply a new playback rate to the underlying audio
    fn set_rate(&self, rate: PlaybackRate);
}

/// How a session delivers word timing
pub enum SessionFeed {
    /// Live boundary events, delivered as speech progresses
    Live(mpsc::Receiver<BackendEvent>),
    /// Complete timing list known before playback starts; position is
    /// obtained by polling the audio clock
    Precomputed {
        /// Word timings for the whole utterance, ordered by onset
        timings: Vec<WordTiming>,
        /// Playback position source
        clock: Arc<dyn AudioClock>,
    },
}

impl fmt::Debug for SessionFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live(_) => f.write_str("SessionFeed::Live"),
            Self::Precomputed { timings, .. } => f
                .debug_struct("SessionFeed::Precomputed")
                .field("timings", &timings.len())
                .finish(),
        }
    }
}

/// One started backend session
pub struct SpeechSession {
    /// Timing delivery for this session
    pub feed: SessionFeed,
    /// Pause/resume/cancel/rate control
    pub control: Arc<dyn SessionControl>,
}

impl fmt::Debug for SpeechSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechSession")
            .field("feed", &self.feed)
            .finish()
    }
}

/// Port every speech backend implements
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Start speaking a unit at the given rate
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the backend cannot initialize or synthesis
    /// fails before playback starts.
    async fn start(
        &self,
        unit: &SpokenUnit,
        rate: PlaybackRate,
    ) -> Result<SpeechSession, SpeechError>;

    /// Check whether the backend is ready to accept a session
    async fn is_available(&self) -> bool;

    /// Backend name for logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use domain::{LanguageTag, SourceKind};

    use super::*;

    struct MockControl;

    impl SessionControl for MockControl {
        fn pause(&self) {}
        fn resume(&self) {}
        fn cancel(&self) {}
        fn set_rate(&self, _rate: PlaybackRate) {}
    }

    struct MockBackend {
        available: bool,
    }

    #[async_trait]
    impl SpeechBackend for MockBackend {
        async fn start(
            &self,
            _unit: &SpokenUnit,
            _rate: PlaybackRate,
        ) -> Result<SpeechSession, SpeechError> {
            let (tx, rx) = mpsc::channel(4);
            tx.send(BackendEvent::Completed)
                .await
                .map_err(|e| SpeechError::SynthesisFailed(e.to_string()))?;
            Ok(SpeechSession {
                feed: SessionFeed::Live(rx),
                control: Arc::new(MockControl),
            })
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn unit() -> SpokenUnit {
        SpokenUnit::new(
            "Hello world",
            LanguageTag::parse("en").unwrap(),
            SourceKind::VisibleFallback,
        )
    }

    #[tokio::test]
    async fn mock_backend_starts_session() {
        let backend = MockBackend { available: true };
        let session = backend
            .start(&unit(), PlaybackRate::normal())
            .await
            .unwrap();
        match session.feed {
            SessionFeed::Live(mut rx) => {
                assert_eq!(rx.recv().await, Some(BackendEvent::Completed));
            }
            SessionFeed::Precomputed { .. } => unreachable!("mock feed is live"),
        }
    }

    #[tokio::test]
    async fn availability_reported() {
        assert!(MockBackend { available: true }.is_available().await);
        assert!(!MockBackend { available: false }.is_available().await);
    }

    #[test]
    fn session_feed_debug_does_not_expose_internals() {
        let feed = SessionFeed::Precomputed {
            timings: vec![WordTiming::new(0, 3, 0.0)],
            clock: Arc::new(FixedClock),
        };
        let rendered = format!("{feed:?}");
        assert!(rendered.contains("Precomputed"));
    }

    struct FixedClock;

    impl AudioClock for FixedClock {
        fn position_ms(&self) -> f64 {
            0.0
        }

        fn is_finished(&self) -> bool {
            false
        }
    }
}
