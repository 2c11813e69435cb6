//! Resolved text to be synthesized for one playback request

use serde::{Deserialize, Serialize};

use crate::value_objects::{LanguageTag, SourceKind};

/// The exact string to synthesize, with its language and origin
///
/// Created once per playback request and consumed by both the backend and
/// the position mapper so they agree on exactly the same string. Immutable
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokenUnit {
    /// The normalized text to speak
    pub text: String,
    /// Language of the text
    pub language: LanguageTag,
    /// Which resolution step produced this unit
    pub source: SourceKind,
}

impl SpokenUnit {
    /// Create a spoken unit
    #[must_use]
    pub fn new(text: impl Into<String>, language: LanguageTag, source: SourceKind) -> Self {
        Self {
            text: text.into(),
            language,
            source,
        }
    }

    /// Check whether there is anything to speak
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Text length in characters
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
