//! Playback session state

use std::fmt;

use serde::{Deserialize, Serialize};

/// State of the single active playback session
///
/// Transitions are owned by the playback controller:
/// `Idle → Loading → Playing ⇄ Paused → Idle`, with any state able to move
/// to `Error` or back to `Idle` via cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No session active
    Idle,
    /// Resolving content and starting a backend
    Loading,
    /// Audio playing, highlights tracking
    Playing,
    /// Paused; highlight frozen at its last position
    Paused,
    /// Backend failure after exhausting fallbacks
    Error,
}

impl PlaybackState {
    /// Check whether a session currently holds resources
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Loading | Self::Playing | Self::Paused)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Error => "error",
        };
        write!(f, "{name}")
    }
}
