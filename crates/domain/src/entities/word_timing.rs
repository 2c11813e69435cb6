//! Normalized word-boundary timing record

use serde::{Deserialize, Serialize};

/// A word boundary in the normalized spoken string
///
/// `start_offset` and `length` are character offsets into the normalized
/// spoken text; `start_time_ms` is relative to utterance start at 1.0x
/// rate. Every backend-native event format is translated into this shape
/// before any other component sees it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    /// Offset of the first character of the word
    pub start_offset: usize,
    /// Word length in characters
    pub length: usize,
    /// Audible onset relative to utterance start, milliseconds at 1.0x
    pub start_time_ms: f64,
}

impl WordTiming {
    /// Create a timing record
    #[must_use]
    pub const fn new(start_offset: usize, length: usize, start_time_ms: f64) -> Self {
        Self {
            start_offset,
            length,
            start_time_ms,
        }
    }

    /// Offset one past the last character of the word
    #[must_use]
    pub const fn end_offset(&self) -> usize {
        self.start_offset + self.length
    }

    /// Check whether this word lies within a text of the given length
    #[must_use]
    pub const fn fits(&self, text_len: usize) -> bool {
        self.end_offset() <= text_len
    }

    /// Check that a timing sequence is non-decreasing in time
    #[must_use]
    pub fn is_ordered(timings: &[Self]) -> bool {
        timings
            .windows(2)
            .all(|pair| pair[0].start_time_ms <= pair[1].start_time_ms)
    }
}
