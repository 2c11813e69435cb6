//! Speech backend errors

use thiserror::Error;

/// Errors that can occur while driving a speech backend
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Failed to connect to a synthesis service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to a synthesis service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Synthesis service returned a malformed or contract-violating response
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Synthesis itself failed
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Timeout during synthesis or playback start
    #[error("Speech processing timeout after {0}ms")]
    Timeout(u64),

    /// Text exceeds the backend's request size limit
    #[error("Text too long: {len} characters exceeds maximum of {max}")]
    TextTooLong {
        /// Length of the submitted text
        len: usize,
        /// Maximum accepted length
        max: usize,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backend not available (not installed, no credentials, no network)
    #[error("Backend not available: {0}")]
    NotAvailable(String),

    /// Audio playout failed on the host
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(30000)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}
