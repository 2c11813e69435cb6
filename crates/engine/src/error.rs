//! Engine error taxonomy
//!
//! Only backend exhaustion reaches callers as a failure. Everything else
//! degrades internally: empty resolution is a silent no-op, stale mapping
//! lookups skip the word highlight, degenerate boundary events downgrade to
//! utterance-only highlighting, and an explicit stop resolves normally.

use thiserror::Error;

/// Errors surfaced by the playback engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Every configured speech backend failed to produce playback
    #[error("No speech backend available: {0}")]
    BackendUnavailable(String),

    /// A playback request named a region that was never registered
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// Configuration loading or validation failed
    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            EngineError::BackendUnavailable("no network".to_string()).to_string(),
            "No speech backend available: no network"
        );
        assert_eq!(
            EngineError::UnknownRegion("item-9".to_string()).to_string(),
            "Unknown region: item-9"
        );
        assert_eq!(
            EngineError::Configuration("bad toml".to_string()).to_string(),
            "Configuration error: bad toml"
        );
    }
}
