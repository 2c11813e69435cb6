//! Playback controller
//!
//! Owns the single active playback session and its state machine:
//! `Idle → Loading → Playing ⇄ Paused → Idle`, with any state able to fall
//! to `Error` or back to `Idle` via cancel. A new playback request always
//! cancels the previous session and clears its highlights synchronously
//! before loading begins, so no two sessions' events can interleave.
//! Backend teardown is best-effort and may finish after the state already
//! reads idle.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use domain::{
    AlternativeEntry, DomRange, LanguageTag, PlaybackRate, PlaybackState, Region, RegionId,
    SessionId, WordTiming,
};
use parking_lot::{Mutex, RwLock};
use speech::{BackendEvent, BoundaryGuard, SessionControl, SessionFeed, SpeechBackend};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::catalog::AlternativeCatalog;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::highlight::{HighlightHost, HighlightRenderer};
use crate::mapper::TextPositionIndex;
use crate::resolver::resolve;

/// How a playback request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// The utterance played to completion
    Completed,
    /// The session was cancelled, by `stop()` or a newer request
    Cancelled,
    /// The region resolved to nothing speakable; nothing happened
    Empty,
}

/// Per-request options for [`ReadAloudEngine::speak`]
#[derive(Debug, Clone)]
pub struct SpeakOptions {
    /// Preferred content language, overriding the configured fallback
    pub language_override: Option<LanguageTag>,
    /// Whether resolution may fall back across languages
    pub allow_language_fallback: bool,
}

impl Default for SpeakOptions {
    fn default() -> Self {
        Self {
            language_override: None,
            allow_language_fallback: true,
        }
    }
}

/// How one session's event loop ended
enum LoopOutcome {
    Completed,
    Cancelled,
    Superseded,
    Failed(String),
}

type StateCallback = Box<dyn Fn(PlaybackState) + Send + Sync>;
type WordCallback = Box<dyn Fn(DomRange) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Rescale scheduled word onsets after a mid-session rate change
///
/// Onsets already reached stay put; every remaining onset is compressed or
/// stretched around the elapsed position so lookups stay synchronized with
/// audio now playing at the new rate. No word is skipped or re-triggered.
pub fn rescale_timings(
    timings: &mut [WordTiming],
    elapsed_ms: f64,
    old_rate: PlaybackRate,
    new_rate: PlaybackRate,
) {
    let factor = f64::from(old_rate.value()) / f64::from(new_rate.value());
    for timing in timings.iter_mut() {
        if timing.start_time_ms > elapsed_ms {
            timing.start_time_ms = elapsed_ms + (timing.start_time_ms - elapsed_ms) * factor;
        }
    }
}

/// The read-aloud playback engine
///
/// One engine drives one host surface. Region and catalog registries are
/// mutated only by the navigation layer through the registration methods,
/// never by the playback path; locks are short and never held across
/// suspension points.
pub struct ReadAloudEngine {
    backend: Arc<dyn SpeechBackend>,
    renderer: HighlightRenderer,
    config: EngineConfig,
    regions: RwLock<HashMap<RegionId, Region>>,
    catalog: RwLock<AlternativeCatalog>,
    state: Mutex<PlaybackState>,
    rate: Mutex<PlaybackRate>,
    generation: AtomicU64,
    control: Mutex<Option<Arc<dyn SessionControl>>>,
    state_cb: Mutex<Option<StateCallback>>,
    word_cb: Mutex<Option<WordCallback>>,
    error_cb: Mutex<Option<ErrorCallback>>,
}

impl std::fmt::Debug for ReadAloudEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadAloudEngine")
            .field("state", &*self.state.lock())
            .field("rate", &*self.rate.lock())
            .field("renderer", &self.renderer)
            .finish()
    }
}

impl ReadAloudEngine {
    /// Create an engine over a backend and a highlight host
    #[must_use]
    pub fn new(
        backend: Arc<dyn SpeechBackend>,
        host: Arc<dyn HighlightHost>,
        config: EngineConfig,
    ) -> Self {
        Self {
            backend,
            renderer: HighlightRenderer::new(host),
            config,
            regions: RwLock::new(HashMap::new()),
            catalog: RwLock::new(AlternativeCatalog::new()),
            state: Mutex::new(PlaybackState::Idle),
            rate: Mutex::new(PlaybackRate::normal()),
            generation: AtomicU64::new(0),
            control: Mutex::new(None),
            state_cb: Mutex::new(None),
            word_cb: Mutex::new(None),
            error_cb: Mutex::new(None),
        }
    }

    /// Current playback state
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        *self.state.lock()
    }

    /// Current playback rate
    #[must_use]
    pub fn rate(&self) -> PlaybackRate {
        *self.rate.lock()
    }

    /// Register or replace a visible region
    ///
    /// Replacing the content of an already registered region should go
    /// through [`Self::update_region`] instead, which bumps the revision so
    /// in-flight position indices detect the change.
    pub fn register_region(&self, region: Region) {
        self.regions.write().insert(region.id().clone(), region);
    }

    /// Replace a registered region's content, invalidating position indices
    ///
    /// Returns whether the region was known.
    pub fn update_region(&self, region_id: &RegionId, root: domain::ContentNode) -> bool {
        let mut regions = self.regions.write();
        match regions.get_mut(region_id) {
            Some(region) => {
                region.replace_root(root);
                true
            }
            None => false,
        }
    }

    /// Register container-scope alternative content
    pub fn register_container_catalog(&self, entries: Vec<AlternativeEntry>) {
        self.catalog.write().register_container(entries);
    }

    /// Register item-scope alternative content for the active region
    pub fn register_item_catalog(&self, entries: Vec<AlternativeEntry>) {
        self.catalog.write().register_item(entries);
    }

    /// Discard all item-scope alternative content
    pub fn clear_item_catalog(&self) {
        self.catalog.write().clear_item();
    }

    /// Subscribe to playback state changes
    pub fn on_state_change(&self, callback: impl Fn(PlaybackState) + Send + Sync + 'static) {
        *self.state_cb.lock() = Some(Box::new(callback));
    }

    /// Subscribe to word highlight updates
    pub fn on_word_highlighted(&self, callback: impl Fn(DomRange) + Send + Sync + 'static) {
        *self.word_cb.lock() = Some(Box::new(callback));
    }

    /// Subscribe to backend failure reports
    pub fn on_error(&self, callback: impl Fn(&str) + Send + Sync + 'static) {
        *self.error_cb.lock() = Some(Box::new(callback));
    }

    /// Speak a registered region
    ///
    /// Cancels any session already active, resolves the region's spoken
    /// content, starts a backend session, and drives highlights until the
    /// utterance ends or is cancelled; the future resolves only then.
    /// Intermediate progress is observed through the subscriptions.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownRegion`] for an unregistered id and
    /// [`EngineError::BackendUnavailable`] when every configured backend
    /// fails; an unspeakable region is `Ok(SpeakOutcome::Empty)`, not an
    /// error.
    #[instrument(skip(self, options), fields(region = %region_id))]
    pub async fn speak(
        &self,
        region_id: &RegionId,
        options: SpeakOptions,
    ) -> Result<SpeakOutcome, EngineError> {
        let my_gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // The previous session's highlights must be gone before Loading.
        self.cancel_active();
        self.set_state(PlaybackState::Loading);

        let Some(region) = self.regions.read().get(region_id).cloned() else {
            self.set_state(PlaybackState::Idle);
            return Err(EngineError::UnknownRegion(region_id.to_string()));
        };

        let unit = {
            let catalog = self.catalog.read();
            resolve(
                &region,
                &catalog,
                options.language_override.as_ref(),
                options.allow_language_fallback,
                &self.config.fallback_language,
            )
        };
        let Some(unit) = unit else {
            self.set_state(PlaybackState::Idle);
            return Ok(SpeakOutcome::Empty);
        };
        let session_id = SessionId::new();
        info!(
            session = %session_id,
            source = ?unit.source,
            chars = unit.char_len(),
            "content resolved"
        );

        let index = TextPositionIndex::build(&region, &unit.text);
        let rate = self.rate();

        let session = match self.backend.start(&unit, rate).await {
            Ok(session) => session,
            Err(e) => {
                let reason = e.to_string();
                warn!(error = %reason, "all speech backends failed");
                self.set_state(PlaybackState::Error);
                self.notify_error(&reason);
                self.set_state(PlaybackState::Idle);
                return Err(EngineError::BackendUnavailable(reason));
            }
        };

        // A newer request may have superseded us while synthesis ran.
        if self.generation.load(Ordering::SeqCst) != my_gen {
            session.control.cancel();
            return Ok(SpeakOutcome::Cancelled);
        }

        *self.control.lock() = Some(Arc::clone(&session.control));
        self.set_state(PlaybackState::Playing);
        self.renderer.set_utterance(region_id, &index.full_span());

        let outcome = match session.feed {
            SessionFeed::Live(rx) => self.run_live(my_gen, rx, region_id, &index).await,
            SessionFeed::Precomputed { timings, clock } => {
                self.run_precomputed(my_gen, timings, &*clock, rate, region_id, &index)
                    .await
            }
        };
        debug!(session = %session_id, "session ended");
        self.finish(my_gen, outcome)
    }

    /// Pause the active session, freezing the highlight in place
    pub fn pause(&self) {
        if self.state() != PlaybackState::Playing {
            return;
        }
        if let Some(control) = self.control.lock().clone() {
            control.pause();
            self.set_state(PlaybackState::Paused);
        }
    }

    /// Resume a paused session
    pub fn resume(&self) {
        if self.state() != PlaybackState::Paused {
            return;
        }
        if let Some(control) = self.control.lock().clone() {
            control.resume();
            self.set_state(PlaybackState::Playing);
        }
    }

    /// Stop the active session, clearing both highlight layers
    ///
    /// State reads idle as soon as this returns; backend teardown completes
    /// in the background.
    pub fn stop(&self) {
        if !self.state().is_active() {
            return;
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cancel_active();
        self.set_state(PlaybackState::Idle);
        info!("playback stopped");
    }

    /// Change the playback rate, rescaling any in-flight session
    pub fn set_rate(&self, rate: PlaybackRate) {
        *self.rate.lock() = rate;
        if let Some(control) = self.control.lock().clone() {
            control.set_rate(rate);
        }
    }

    /// Consume a live event feed until a terminal event
    async fn run_live(
        &self,
        my_gen: u64,
        mut rx: mpsc::Receiver<BackendEvent>,
        region_id: &RegionId,
        index: &TextPositionIndex,
    ) -> LoopOutcome {
        let mut guard = BoundaryGuard::new();
        while let Some(event) = rx.recv().await {
            if self.generation.load(Ordering::SeqCst) != my_gen {
                return LoopOutcome::Superseded;
            }
            match event {
                BackendEvent::Word(timing) => {
                    self.handle_word(&mut guard, region_id, index, &timing);
                }
                BackendEvent::Completed => return LoopOutcome::Completed,
                BackendEvent::Cancelled => return LoopOutcome::Cancelled,
                BackendEvent::Failed(reason) => return LoopOutcome::Failed(reason),
            }
        }
        // Channel closed without a terminal event; treat as teardown.
        if self.generation.load(Ordering::SeqCst) == my_gen {
            LoopOutcome::Completed
        } else {
            LoopOutcome::Superseded
        }
    }

    /// Drive a precomputed session by polling the audio clock
    async fn run_precomputed(
        &self,
        my_gen: u64,
        mut timings: Vec<WordTiming>,
        clock: &dyn speech::AudioClock,
        initial_rate: PlaybackRate,
        region_id: &RegionId,
        index: &TextPositionIndex,
    ) -> LoopOutcome {
        let mut guard = BoundaryGuard::new();
        let mut session_rate = initial_rate;
        // Marks arrive in 1.0x time; bring them into the playout timeline.
        if session_rate != PlaybackRate::normal() {
            rescale_timings(&mut timings, 0.0, PlaybackRate::normal(), session_rate);
        }

        let mut next = 0;
        let mut interval =
            tokio::time::interval(Duration::from_millis(self.config.poll_interval_ms));
        loop {
            interval.tick().await;
            if self.generation.load(Ordering::SeqCst) != my_gen {
                return LoopOutcome::Superseded;
            }

            let current_rate = self.rate();
            if current_rate != session_rate {
                let elapsed = clock.position_ms();
                rescale_timings(&mut timings, elapsed, session_rate, current_rate);
                debug!(elapsed, old = %session_rate, new = %current_rate, "timings rescaled");
                session_rate = current_rate;
            }

            let position = clock.position_ms();
            while next < timings.len() && timings[next].start_time_ms <= position {
                self.handle_word(&mut guard, region_id, index, &timings[next]);
                next += 1;
            }

            if clock.is_finished() {
                return LoopOutcome::Completed;
            }
        }
    }

    /// Paint one word event, if this session still may
    fn handle_word(
        &self,
        guard: &mut BoundaryGuard,
        region_id: &RegionId,
        index: &TextPositionIndex,
        timing: &WordTiming,
    ) {
        if !guard.observe(timing.start_offset) {
            return;
        }
        let stale = self
            .regions
            .read()
            .get(region_id)
            .is_none_or(|current| index.is_stale(current));
        if stale {
            debug!(offset = timing.start_offset, "position index stale, skipping word");
            return;
        }
        let Some(range) = index.locate(timing.start_offset, timing.length) else {
            debug!(offset = timing.start_offset, "word event out of bounds, skipping");
            return;
        };
        if self.renderer.set_word(region_id, range) {
            self.notify_word(range);
        }
    }

    /// Close out a finished session, if it is still the current one
    fn finish(&self, my_gen: u64, outcome: LoopOutcome) -> Result<SpeakOutcome, EngineError> {
        if self.generation.load(Ordering::SeqCst) != my_gen {
            // A newer session owns the highlight layers now.
            return Ok(SpeakOutcome::Cancelled);
        }
        match outcome {
            LoopOutcome::Completed => {
                self.renderer.clear_all();
                *self.control.lock() = None;
                self.set_state(PlaybackState::Idle);
                Ok(SpeakOutcome::Completed)
            }
            LoopOutcome::Cancelled | LoopOutcome::Superseded => {
                self.renderer.clear_all();
                *self.control.lock() = None;
                self.set_state(PlaybackState::Idle);
                Ok(SpeakOutcome::Cancelled)
            }
            LoopOutcome::Failed(reason) => {
                warn!(error = %reason, "backend failed mid-session");
                self.renderer.clear_all();
                *self.control.lock() = None;
                self.set_state(PlaybackState::Error);
                self.notify_error(&reason);
                self.set_state(PlaybackState::Idle);
                Err(EngineError::BackendUnavailable(reason))
            }
        }
    }

    /// Cancel whatever session is active and clear its highlights
    fn cancel_active(&self) {
        if let Some(control) = self.control.lock().take() {
            control.cancel();
        }
        if self.state().is_active() {
            self.renderer.clear_all();
        }
    }

    fn set_state(&self, state: PlaybackState) {
        *self.state.lock() = state;
        if let Some(callback) = self.state_cb.lock().as_ref() {
            callback(state);
        }
    }

    fn notify_word(&self, range: DomRange) {
        if let Some(callback) = self.word_cb.lock().as_ref() {
            callback(range);
        }
    }

    fn notify_error(&self, reason: &str) {
        if let Some(callback) = self.error_cb.lock().as_ref() {
            callback(reason);
        }
    }
}
