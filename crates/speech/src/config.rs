//! Configuration for speech backends

use serde::{Deserialize, Serialize};

/// Which backend category a priority slot refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Host-native, event-driven synthesizer
    Local,
    /// Remote service returning audio plus precomputed speech marks
    Remote,
}

/// Configuration for the speech backend stack
///
/// Backend selection is explicit configuration: `backend_order` is the
/// fallback priority, tried in order, never a per-call heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Backend priority order, preferred first
    #[serde(default = "default_backend_order")]
    pub backend_order: Vec<BackendKind>,

    /// Remote backend settings
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Local backend settings
    #[serde(default)]
    pub local: LocalConfig,

    /// Synthesis memoization settings
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Remote synthesis service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the synthesis service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for the service, if it requires one
    #[serde(default)]
    pub api_key: Option<String>,

    /// Voice identifier submitted with each request
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum utterance length in characters
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,
}

/// Local synthesizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Voice identifier handed to the host synthesizer, if any
    #[serde(default)]
    pub voice: Option<String>,
}

/// Synthesis memoization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether repeated playback reuses synthesized audio and timings
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Maximum number of cached utterances
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,

    /// Time-to-live for cached utterances, seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_backend_order() -> Vec<BackendKind> {
    vec![BackendKind::Remote, BackendKind::Local]
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/v1".to_string()
}

fn default_voice() -> String {
    "joanna".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

const fn default_max_text_len() -> usize {
    3000
}

const fn default_cache_enabled() -> bool {
    true
}

const fn default_cache_max_entries() -> u64 {
    64
}

const fn default_cache_ttl_secs() -> u64 {
    600
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            backend_order: default_backend_order(),
            remote: RemoteConfig::default(),
            local: LocalConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            voice: default_voice(),
            timeout_ms: default_timeout_ms(),
            max_text_len: default_max_text_len(),
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self { voice: None }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            max_entries: default_cache_max_entries(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl SpeechConfig {
    /// Parse a configuration from a TOML document
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the document does not parse or the parsed
    /// values fail validation.
    pub fn from_toml_str(input: &str) -> Result<Self, crate::error::SpeechError> {
        let config: Self = toml::from_str(input)
            .map_err(|e| crate::error::SpeechError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `Configuration` describing the first problem found.
    pub fn validate(&self) -> Result<(), crate::error::SpeechError> {
        use crate::error::SpeechError;

        if self.backend_order.is_empty() {
            return Err(SpeechError::Configuration(
                "backend_order must name at least one backend".to_string(),
            ));
        }
        if self.backend_order.contains(&BackendKind::Remote) {
            if self.remote.base_url.trim().is_empty() {
                return Err(SpeechError::Configuration(
                    "remote.base_url must not be empty".to_string(),
                ));
            }
            if self.remote.timeout_ms == 0 {
                return Err(SpeechError::Configuration(
                    "remote.timeout_ms must be positive".to_string(),
                ));
            }
            if self.remote.max_text_len == 0 {
                return Err(SpeechError::Configuration(
                    "remote.max_text_len must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SpeechConfig::default().validate().is_ok());
    }

    #[test]
    fn default_order_prefers_remote() {
        let config = SpeechConfig::default();
        assert_eq!(
            config.backend_order,
            vec![BackendKind::Remote, BackendKind::Local]
        );
    }

    #[test]
    fn empty_backend_order_rejected() {
        let config = SpeechConfig {
            backend_order: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_remote_url_rejected_when_remote_configured() {
        let config = SpeechConfig {
            remote: RemoteConfig {
                base_url: String::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn remote_settings_ignored_for_local_only_order() {
        let config = SpeechConfig {
            backend_order: vec![BackendKind::Local],
            remote: RemoteConfig {
                base_url: String::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_from_toml() {
        let config = SpeechConfig::from_toml_str(
            r#"
            backend_order = ["local"]

            [remote]
            base_url = "https://tts.internal/v2"
            voice = "amy"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend_order, vec![BackendKind::Local]);
        assert_eq!(config.remote.voice, "amy");
    }

    #[test]
    fn toml_parse_error_is_configuration() {
        let result = SpeechConfig::from_toml_str("backend_order = 12");
        assert!(matches!(
            result,
            Err(crate::error::SpeechError::Configuration(_))
        ));
    }
}
