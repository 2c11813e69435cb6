//! Author-supplied alternative representation of a region

use serde::{Deserialize, Serialize};

use crate::value_objects::{LanguageTag, Modality, RegionId};

/// One alternative representation registered for a visible region
///
/// Entries are grouped by owner and registered at container scope (lives as
/// long as the passage/section) or item scope (discarded when navigation
/// leaves the region).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeEntry {
    /// Identifier of the region this entry substitutes for
    pub owner: RegionId,
    /// Access modality of the content
    pub modality: Modality,
    /// Language of the content
    pub language: LanguageTag,
    /// The alternative content itself
    pub content: String,
}

impl AlternativeEntry {
    /// Create an alternative entry
    #[must_use]
    pub fn new(
        owner: RegionId,
        modality: Modality,
        language: LanguageTag,
        content: impl Into<String>,
    ) -> Self {
        Self {
            owner,
            modality,
            language,
            content: content.into(),
        }
    }

    /// Check whether this entry carries a spoken script
    #[must_use]
    pub fn is_spoken(&self) -> bool {
        self.modality == Modality::Spoken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spoken_entry_detected() {
        let entry = AlternativeEntry::new(
            RegionId::new("item-1").unwrap(),
            Modality::Spoken,
            LanguageTag::parse("en").unwrap(),
            "spoken script",
        );
        assert!(entry.is_spoken());
    }

    #[test]
    fn non_spoken_entry_detected() {
        let entry = AlternativeEntry::new(
            RegionId::new("item-1").unwrap(),
            Modality::Braille,
            LanguageTag::parse("en").unwrap(),
            "braille cells",
        );
        assert!(!entry.is_spoken());
    }
}
