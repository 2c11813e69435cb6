//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Region identifier is empty or malformed
    #[error("Invalid region id: {0}")]
    InvalidRegionId(String),

    /// Language tag is empty or malformed
    #[error("Invalid language tag: {0}")]
    InvalidLanguageTag(String),

    /// Playback rate outside the supported range
    #[error("Invalid playback rate {rate}: must be between {min} and {max}")]
    InvalidRate {
        /// The rejected rate
        rate: f32,
        /// Minimum supported rate
        min: f32,
        /// Maximum supported rate
        max: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_region_id_message() {
        let err = DomainError::InvalidRegionId("<empty>".to_string());
        assert_eq!(err.to_string(), "Invalid region id: <empty>");
    }

    #[test]
    fn invalid_language_tag_message() {
        let err = DomainError::InvalidLanguageTag("en_US_".to_string());
        assert_eq!(err.to_string(), "Invalid language tag: en_US_");
    }

    #[test]
    fn invalid_rate_message() {
        let err = DomainError::InvalidRate {
            rate: 9.0,
            min: 0.25,
            max: 4.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid playback rate 9: must be between 0.25 and 4"
        );
    }
}
