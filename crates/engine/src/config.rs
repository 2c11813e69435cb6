//! Configuration for the playback engine

use domain::LanguageTag;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Engine-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Designated fallback language for content resolution
    #[serde(default = "default_fallback_language")]
    pub fallback_language: LanguageTag,

    /// Interval for polling the audio clock of precomputed sessions, ms
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_fallback_language() -> LanguageTag {
    LanguageTag::english()
}

const fn default_poll_interval_ms() -> u64 {
    50
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_language: default_fallback_language(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a TOML document
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the document does not parse or the parsed
    /// values fail validation.
    pub fn from_toml_str(input: &str) -> Result<Self, EngineError> {
        let config: Self =
            toml::from_str(input).map_err(|e| EngineError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `Configuration` describing the first problem found.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.poll_interval_ms < 10 {
            return Err(EngineError::Configuration(
                "poll_interval_ms must be at least 10".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fallback_language.as_str(), "en");
        assert_eq!(config.poll_interval_ms, 50);
    }

    #[test]
    fn parses_from_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            fallback_language = "es-MX"
            poll_interval_ms = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.fallback_language.as_str(), "es-mx");
        assert_eq!(config.poll_interval_ms, 100);
    }

    #[test]
    fn tiny_poll_interval_rejected() {
        let result = EngineConfig::from_toml_str("poll_interval_ms = 1");
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }

    #[test]
    fn invalid_language_tag_rejected() {
        let result = EngineConfig::from_toml_str(r#"fallback_language = "en_US""#);
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }
}
