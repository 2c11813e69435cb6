//! Language tag with subtag-aware matching

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A BCP 47 style language tag, normalized to lowercase
///
/// Assessment packages commonly tag content as `en-US` while a user
/// preference arrives as plain `en`, so matching accepts primary-subtag
/// equality in addition to exact equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Parse a language tag
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLanguageTag` if the tag is empty or
    /// contains characters outside `[a-zA-Z0-9-]`.
    pub fn parse(tag: impl Into<String>) -> Result<Self, DomainError> {
        let tag = tag.into();
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidLanguageTag("<empty>".to_string()));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
            || trimmed.starts_with('-')
            || trimmed.ends_with('-')
        {
            return Err(DomainError::InvalidLanguageTag(tag));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// The plain English tag, used as the default fallback language
    #[must_use]
    pub fn english() -> Self {
        Self("en".to_string())
    }

    /// Get the tag as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the primary subtag (`en` for `en-US`)
    #[must_use]
    pub fn primary_subtag(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    /// Check whether this tag matches another
    ///
    /// Tags match when they are equal or when their primary subtags are
    /// equal, so `en` matches `en-US` and vice versa, but `en` does not
    /// match `es`.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self == other || self.primary_subtag() == other.primary_subtag()
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for LanguageTag {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for LanguageTag {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_matches_parsed_variants() {
        let default = LanguageTag::english();
        assert_eq!(default.as_str(), "en");
        assert!(default.matches(&LanguageTag::parse("en-US").unwrap()));
    }

    #[test]
    fn parses_and_lowercases() {
        let tag = LanguageTag::parse("en-US").unwrap();
        assert_eq!(tag.as_str(), "en-us");
    }

    #[test]
    fn rejects_empty() {
        assert!(LanguageTag::parse("").is_err());
        assert!(LanguageTag::parse("   ").is_err());
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(LanguageTag::parse("en_US").is_err());
        assert!(LanguageTag::parse("-en").is_err());
        assert!(LanguageTag::parse("en-").is_err());
    }

    #[test]
    fn primary_subtag_strips_region() {
        let tag = LanguageTag::parse("es-MX").unwrap();
        assert_eq!(tag.primary_subtag(), "es");
    }

    #[test]
    fn exact_tags_match() {
        let a = LanguageTag::parse("en-us").unwrap();
        let b = LanguageTag::parse("en-US").unwrap();
        assert!(a.matches(&b));
    }

    #[test]
    fn primary_subtag_matches_regional_variant() {
        let plain = LanguageTag::parse("en").unwrap();
        let regional = LanguageTag::parse("en-US").unwrap();
        assert!(plain.matches(&regional));
        assert!(regional.matches(&plain));
    }

    #[test]
    fn different_languages_do_not_match() {
        let en = LanguageTag::parse("en").unwrap();
        let es = LanguageTag::parse("es").unwrap();
        assert!(!en.matches(&es));
    }
}
