//! Local event-driven speech backend
//!
//! Wraps the host platform's native synthesizer, which speaks immediately
//! and reports word boundaries live as speech progresses. Boundary offsets
//! on this category are coarse and, on some hosts, outright unreliable;
//! the degenerate-pattern handling lives downstream in the playback
//! controller via [`crate::boundary::BoundaryGuard`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use domain::{LanguageTag, PlaybackRate, SpokenUnit, WordTiming};
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::config::LocalConfig;
use crate::error::SpeechError;
use crate::ports::{BackendEvent, SessionControl, SessionFeed, SpeechBackend, SpeechSession};

/// An event reported by the host's native synthesizer
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    /// Speech reached the word starting at `char_index`
    Boundary {
        /// Character offset into the spoken text
        char_index: usize,
        /// Elapsed speaking time in milliseconds, at the session's rate
        elapsed_ms: f64,
    },
    /// The utterance finished
    Finished,
    /// Synthesis failed mid-utterance
    Failed(String),
}

/// Port to the host platform's utterance API
///
/// The concrete implementation is supplied by the host integration; tests
/// use a scripted engine.
pub trait NativeSpeechEngine: Send + Sync {
    /// Begin speaking and return the event stream for this utterance
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the synthesizer refuses the utterance.
    fn speak(
        &self,
        text: &str,
        language: &LanguageTag,
        voice: Option<&str>,
        rate: PlaybackRate,
    ) -> Result<mpsc::Receiver<NativeEvent>, SpeechError>;

    /// Pause the current utterance
    fn pause(&self);

    /// Resume a paused utterance
    fn resume(&self);

    /// Cancel the current utterance
    fn cancel(&self);

    /// Apply a new rate to the current utterance
    fn set_rate(&self, rate: PlaybackRate);

    /// Whether the synthesizer is present and usable on this host
    fn is_available(&self) -> bool;
}

/// Speech backend over the host's native synthesizer
pub struct LocalSpeechBackend {
    engine: Arc<dyn NativeSpeechEngine>,
    config: LocalConfig,
}

impl std::fmt::Debug for LocalSpeechBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSpeechBackend")
            .field("config", &self.config)
            .finish()
    }
}

impl LocalSpeechBackend {
    /// Create a local backend over a host synthesizer
    #[must_use]
    pub fn new(engine: Arc<dyn NativeSpeechEngine>, config: LocalConfig) -> Self {
        Self { engine, config }
    }
}

/// Measure the word starting at a character offset
///
/// Returns the number of characters from `char_index` up to the next
/// whitespace, or 0 when the offset points at whitespace or past the end.
fn word_length_at(text: &str, char_index: usize) -> usize {
    text.chars()
        .skip(char_index)
        .take_while(|c| !c.is_whitespace())
        .count()
}

struct LocalControl {
    engine: Arc<dyn NativeSpeechEngine>,
    rate_bits: Arc<AtomicU64>,
}

impl SessionControl for LocalControl {
    fn pause(&self) {
        self.engine.pause();
    }

    fn resume(&self) {
        self.engine.resume();
    }

    fn cancel(&self) {
        self.engine.cancel();
    }

    fn set_rate(&self, rate: PlaybackRate) {
        self.rate_bits
            .store(f64::from(rate.value()).to_bits(), Ordering::Relaxed);
        self.engine.set_rate(rate);
    }
}

#[async_trait]
impl SpeechBackend for LocalSpeechBackend {
    #[instrument(skip(self, unit), fields(text_len = unit.text.len(), language = %unit.language))]
    async fn start(
        &self,
        unit: &SpokenUnit,
        rate: PlaybackRate,
    ) -> Result<SpeechSession, SpeechError> {
        let native_rx = self.engine.speak(
            &unit.text,
            &unit.language,
            self.config.voice.as_deref(),
            rate,
        )?;
        debug!("local synthesizer accepted utterance");

        let (tx, rx) = mpsc::channel(32);
        let text = unit.text.clone();
        // Native elapsed time runs at the session rate; timings are kept at
        // 1.0x so downstream rescaling has one coordinate space. The rate is
        // shared with the control handle so mid-session changes reach
        // boundaries that arrive afterwards.
        let rate_bits = Arc::new(AtomicU64::new(f64::from(rate.value()).to_bits()));
        let task_rate = Arc::clone(&rate_bits);
        let mut native_rx = native_rx;
        tokio::spawn(async move {
            while let Some(event) = native_rx.recv().await {
                let out = match event {
                    NativeEvent::Boundary {
                        char_index,
                        elapsed_ms,
                    } => {
                        let length = word_length_at(&text, char_index);
                        if length == 0 {
                            continue;
                        }
                        let rate_factor = f64::from_bits(task_rate.load(Ordering::Relaxed));
                        BackendEvent::Word(WordTiming::new(
                            char_index,
                            length,
                            elapsed_ms * rate_factor,
                        ))
                    }
                    NativeEvent::Finished => BackendEvent::Completed,
                    NativeEvent::Failed(reason) => BackendEvent::Failed(reason),
                };
                let terminal = matches!(out, BackendEvent::Completed | BackendEvent::Failed(_));
                if tx.send(out).await.is_err() || terminal {
                    break;
                }
            }
        });

        Ok(SpeechSession {
            feed: SessionFeed::Live(rx),
            control: Arc::new(LocalControl {
                engine: Arc::clone(&self.engine),
                rate_bits,
            }),
        })
    }

    async fn is_available(&self) -> bool {
        self.engine.is_available()
    }

    fn name(&self) -> &str {
        "local"
    }
}
