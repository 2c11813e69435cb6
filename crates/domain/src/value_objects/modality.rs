//! Access modality of an alternative representation

use std::fmt;

use serde::{Deserialize, Serialize};

/// Modality of author-supplied alternative content
///
/// Only [`Modality::Spoken`] participates in speech resolution; the other
/// modalities are registered through the same catalog and consumed by other
/// accommodation tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modality {
    /// Spoken script for text-to-speech
    Spoken,
    /// Sign-language representation
    Signed,
    /// Braille representation
    Braille,
    /// Simplified-language rendering
    Simplified,
    /// Tactile graphic description
    Tactile,
    /// Extended description of a graphic or figure
    ExtendedDescription,
    /// Audio description of visual media
    AudioDescription,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Spoken => "spoken",
            Self::Signed => "signed",
            Self::Braille => "braille",
            Self::Simplified => "simplified",
            Self::Tactile => "tactile",
            Self::ExtendedDescription => "extended-description",
            Self::AudioDescription => "audio-description",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&Modality::ExtendedDescription).unwrap();
        assert_eq!(json, "\"extended-description\"");
    }

    #[test]
    fn deserializes_kebab_case() {
        let modality: Modality = serde_json::from_str("\"audio-description\"").unwrap();
        assert_eq!(modality, Modality::AudioDescription);
    }

    #[test]
    fn display_matches_serde_name() {
        assert_eq!(Modality::Spoken.to_string(), "spoken");
        assert_eq!(
            Modality::ExtendedDescription.to_string(),
            "extended-description"
        );
    }
}
