//! Synthesis memoization
//!
//! Repeated playback of the same utterance (students replaying a prompt) is
//! common, so the remote backend memoizes synthesized audio together with
//! its timing list, keyed by a content hash of the exact request.

use std::sync::Arc;
use std::time::Duration;

use domain::LanguageTag;
use moka::future::Cache;

use crate::config::CacheConfig;
use crate::types::SynthesisResult;

/// Cache of synthesized utterances
#[derive(Debug, Clone)]
pub struct SynthesisCache {
    inner: Cache<String, Arc<SynthesisResult>>,
}

impl SynthesisCache {
    /// Create a cache sized from configuration
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .build();
        Self { inner }
    }

    /// Cache key for one synthesis request
    ///
    /// Text, language, and voice all shape the audio, so all three are
    /// hashed. Rate is not part of the key: timings are stored at 1.0x and
    /// rescaled at playback time.
    #[must_use]
    pub fn key(text: &str, language: &LanguageTag, voice: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(text.as_bytes());
        hasher.update(&[0]);
        hasher.update(language.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(voice.as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    /// Look up a cached synthesis result
    pub async fn get(&self, key: &str) -> Option<Arc<SynthesisResult>> {
        self.inner.get(key).await
    }

    /// Store a synthesis result
    pub async fn insert(&self, key: String, result: Arc<SynthesisResult>) {
        self.inner.insert(key, result).await;
    }

    /// Number of cached utterances
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}
