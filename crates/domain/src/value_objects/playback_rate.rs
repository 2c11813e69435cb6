//! Playback rate value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Minimum supported playback rate
pub const MIN_RATE: f32 = 0.25;

/// Maximum supported playback rate
pub const MAX_RATE: f32 = 4.0;

/// Speech playback rate, validated to the 0.25–4.0 range
///
/// 1.0 is normal speed. Timing records are always expressed at 1.0x; the
/// playback controller rescales them when the rate changes mid-session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct PlaybackRate(f32);

impl PlaybackRate {
    /// Create a validated playback rate
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRate` if the rate is outside
    /// [`MIN_RATE`]..=[`MAX_RATE`] or not finite.
    pub fn new(rate: f32) -> Result<Self, DomainError> {
        if !rate.is_finite() || !(MIN_RATE..=MAX_RATE).contains(&rate) {
            return Err(DomainError::InvalidRate {
                rate,
                min: MIN_RATE,
                max: MAX_RATE,
            });
        }
        Ok(Self(rate))
    }

    /// Normal speed (1.0x)
    #[must_use]
    pub const fn normal() -> Self {
        Self(1.0)
    }

    /// Get the rate as a float
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.0
    }
}

impl Default for PlaybackRate {
    fn default() -> Self {
        Self::normal()
    }
}

impl fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

impl TryFrom<f32> for PlaybackRate {
    type Error = DomainError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlaybackRate> for f32 {
    fn from(rate: PlaybackRate) -> Self {
        rate.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_rates_in_range() {
        assert!(PlaybackRate::new(0.25).is_ok());
        assert!(PlaybackRate::new(1.0).is_ok());
        assert!(PlaybackRate::new(4.0).is_ok());
    }

    #[test]
    fn rejects_rates_out_of_range() {
        assert!(PlaybackRate::new(0.0).is_err());
        assert!(PlaybackRate::new(0.2).is_err());
        assert!(PlaybackRate::new(4.1).is_err());
        assert!(PlaybackRate::new(-1.0).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(PlaybackRate::new(f32::NAN).is_err());
        assert!(PlaybackRate::new(f32::INFINITY).is_err());
    }

    #[test]
    fn default_is_normal_speed() {
        assert!((PlaybackRate::default().value() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn display_format() {
        let rate = PlaybackRate::new(1.5).unwrap();
        assert_eq!(rate.to_string(), "1.5x");
    }

    #[test]
    fn serde_rejects_out_of_range() {
        let result: Result<PlaybackRate, _> = serde_json::from_str("12.0");
        assert!(result.is_err());
    }
}
