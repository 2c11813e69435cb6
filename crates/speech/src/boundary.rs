//! Degenerate boundary-event detection
//!
//! Some host synthesizers report broken word boundaries: the same character
//! offset over and over instead of advancing through the text. When that
//! pattern appears the session downgrades to utterance-level highlighting
//! only; it is a degradation, not an error, and is never surfaced to the
//! caller.

use tracing::warn;

/// Number of consecutive identical offsets that marks a session degenerate
pub const DEGENERATE_REPEAT_LIMIT: usize = 3;

/// Detector for repeated boundary offsets
///
/// Feed every word event's start offset through [`BoundaryGuard::observe`];
/// once it returns `false` the session stays degraded and word events must
/// be dropped for its remainder.
#[derive(Debug, Default)]
pub struct BoundaryGuard {
    last_offset: Option<usize>,
    repeats: usize,
    degraded: bool,
}

impl BoundaryGuard {
    /// Create a fresh guard for one session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a boundary offset; returns whether word events may still be
    /// emitted
    pub fn observe(&mut self, start_offset: usize) -> bool {
        if self.degraded {
            return false;
        }
        if self.last_offset == Some(start_offset) {
            self.repeats += 1;
        } else {
            self.last_offset = Some(start_offset);
            self.repeats = 1;
        }
        if self.repeats >= DEGENERATE_REPEAT_LIMIT {
            self.degraded = true;
            warn!(
                start_offset,
                repeats = self.repeats,
                "degenerate boundary events detected, word highlighting disabled for this session"
            );
            return false;
        }
        true
    }

    /// Whether the session has been downgraded to utterance-only
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }
}
