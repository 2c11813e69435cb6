//! Two-layer highlight rendering
//!
//! Two independent layers run concurrently: a low-emphasis utterance layer
//! set once per playback request, and a high-emphasis word layer replaced on
//! every resolved word event. Both are painted through a host capability
//! port for non-destructive range highlighting, so the document structure,
//! selection, and accessibility tree are never touched.

use std::fmt;
use std::sync::Arc;

use domain::{DomRange, RegionId};
use tracing::warn;

/// The two highlight layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightLayer {
    /// Low-emphasis span over the whole utterance
    Utterance,
    /// High-emphasis span over the current word
    Word,
}

/// Host capability port for non-destructive range highlighting
///
/// Capability is reported once, at engine construction, not probed per
/// call. A host without the range primitive still gets utterance-level
/// highlighting through whatever coarser mechanism it implements
/// `apply_utterance` with.
pub trait HighlightHost: Send + Sync {
    /// Whether the host can mark arbitrary ranges without mutating nodes
    fn supports_range_highlights(&self) -> bool;

    /// Paint the utterance layer over the given ranges
    fn apply_utterance(&self, region: &RegionId, ranges: &[DomRange]);

    /// Paint the word layer over one range, replacing the previous word
    fn apply_word(&self, region: &RegionId, range: DomRange);

    /// Remove one layer entirely
    fn clear(&self, layer: HighlightLayer);
}

/// Renderer over a highlight host, with capability selected at construction
///
/// Hosts lacking the non-destructive range primitive run utterance-only:
/// word calls are dropped, never emulated by document mutation.
pub struct HighlightRenderer {
    host: Arc<dyn HighlightHost>,
    word_capable: bool,
}

impl fmt::Debug for HighlightRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighlightRenderer")
            .field("word_capable", &self.word_capable)
            .finish()
    }
}

impl HighlightRenderer {
    /// Create a renderer, detecting the host capability once
    #[must_use]
    pub fn new(host: Arc<dyn HighlightHost>) -> Self {
        let word_capable = host.supports_range_highlights();
        if !word_capable {
            warn!("host lacks range highlighting, word layer disabled");
        }
        Self { host, word_capable }
    }

    /// Whether word-level highlighting is operational
    #[must_use]
    pub const fn word_capable(&self) -> bool {
        self.word_capable
    }

    /// Paint the utterance layer
    pub fn set_utterance(&self, region: &RegionId, ranges: &[DomRange]) {
        if ranges.is_empty() {
            return;
        }
        self.host.apply_utterance(region, ranges);
    }

    /// Paint the word layer; returns whether the highlight was applied
    pub fn set_word(&self, region: &RegionId, range: DomRange) -> bool {
        if !self.word_capable || range.is_empty() {
            return false;
        }
        self.host.apply_word(region, range);
        true
    }

    /// Clear both layers
    pub fn clear_all(&self) {
        self.host.clear(HighlightLayer::Word);
        self.host.clear(HighlightLayer::Utterance);
    }
}
