//! Remote precomputed-timing speech backend
//!
//! Submits the utterance text to a synthesis service and receives the audio
//! stream together with a complete list of speech marks before playback
//! begins. Audio playout itself is delegated to the host through the
//! [`AudioSink`] port; the playback controller polls the returned clock and
//! looks up the last mark whose onset has been reached.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use domain::{PlaybackRate, SpokenUnit};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::cache::SynthesisCache;
use crate::config::RemoteConfig;
use crate::error::SpeechError;
use crate::ports::{AudioClock, SessionControl, SessionFeed, SpeechBackend, SpeechSession};
use crate::types::{AudioData, AudioFormat, SpeechMark, SynthesisResult, validate_marks};

/// Host port for playing a synthesized audio stream
///
/// The returned [`AudioClock`] must report actual playout position, not a
/// wall-clock estimate, so pauses and buffering stalls cannot desynchronize
/// the highlight.
pub trait AudioSink: Send + Sync {
    /// Begin playing an audio stream at the given rate
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::PlaybackFailed` if the host cannot play the
    /// stream.
    fn play(
        &self,
        audio: &AudioData,
        rate: PlaybackRate,
    ) -> Result<Arc<dyn AudioClock>, SpeechError>;

    /// Pause playback
    fn pause(&self);

    /// Resume paused playback
    fn resume(&self);

    /// Stop playback and release the stream
    fn stop(&self);

    /// Change the playback rate of the current stream
    fn set_rate(&self, rate: PlaybackRate);
}

/// Speech backend over a remote synthesis service
pub struct RemoteSpeechBackend {
    client: Client,
    config: RemoteConfig,
    sink: Arc<dyn AudioSink>,
    cache: Option<SynthesisCache>,
}

impl std::fmt::Debug for RemoteSpeechBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSpeechBackend")
            .field("base_url", &self.config.base_url)
            .field("voice", &self.config.voice)
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

/// Synthesis request body
#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    input: &'a str,
    language: &'a str,
    voice: &'a str,
}

/// Synthesis response body: base64 audio plus the full mark list
#[derive(Debug, Deserialize)]
struct SynthesisResponse {
    audio: String,
    format: String,
    marks: Vec<SpeechMark>,
}

/// Service error response
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

impl RemoteSpeechBackend {
    /// Create a remote backend
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the base URL is empty or the
    /// HTTP client cannot be built.
    pub fn new(
        config: RemoteConfig,
        cache: Option<SynthesisCache>,
        sink: Arc<dyn AudioSink>,
    ) -> Result<Self, SpeechError> {
        if config.base_url.trim().is_empty() {
            return Err(SpeechError::Configuration(
                "remote base_url must not be empty".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SpeechError::Configuration(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config,
            sink,
            cache,
        })
    }

    fn synthesize_url(&self) -> String {
        format!("{}/synthesize", self.config.base_url)
    }

    /// Fetch audio and marks for a unit, memoized when a cache is configured
    #[instrument(skip(self, unit), fields(text_len = unit.text.len(), language = %unit.language))]
    async fn synthesize(&self, unit: &SpokenUnit) -> Result<Arc<SynthesisResult>, SpeechError> {
        let char_len = unit.char_len();
        if char_len > self.config.max_text_len {
            return Err(SpeechError::TextTooLong {
                len: char_len,
                max: self.config.max_text_len,
            });
        }

        let key = SynthesisCache::key(&unit.text, &unit.language, &self.config.voice);
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await {
                debug!("synthesis cache hit");
                return Ok(hit);
            }
        }

        let mut request = self.client.post(self.synthesize_url()).json(&SynthesisRequest {
            input: &unit.text,
            language: unit.language.as_str(),
            voice: &self.config.voice,
        });
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
                warn!(
                    code = ?api_error.error.code,
                    "synthesis service rejected request"
                );
                return Err(SpeechError::SynthesisFailed(api_error.error.message));
            }
            return Err(SpeechError::RequestFailed(format!(
                "synthesis service returned {status}"
            )));
        }

        let body: SynthesisResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;

        let audio_bytes = BASE64
            .decode(&body.audio)
            .map_err(|e| SpeechError::InvalidResponse(format!("bad audio encoding: {e}")))?;
        let format = AudioFormat::from_name(&body.format).ok_or_else(|| {
            SpeechError::InvalidResponse(format!("unknown audio format {:?}", body.format))
        })?;
        validate_marks(&body.marks, char_len)?;

        let result = Arc::new(SynthesisResult {
            audio: AudioData::new(audio_bytes, format),
            timings: body.marks.iter().map(SpeechMark::to_word_timing).collect(),
        });
        debug!(
            marks = result.timings.len(),
            audio_bytes = result.audio.size_bytes(),
            "synthesis complete"
        );

        if let Some(cache) = &self.cache {
            cache.insert(key, Arc::clone(&result)).await;
        }
        Ok(result)
    }
}

struct RemoteControl {
    sink: Arc<dyn AudioSink>,
}

impl SessionControl for RemoteControl {
    fn pause(&self) {
        self.sink.pause();
    }

    fn resume(&self) {
        self.sink.resume();
    }

    fn cancel(&self) {
        self.sink.stop();
    }

    fn set_rate(&self, rate: PlaybackRate) {
        self.sink.set_rate(rate);
    }
}

#[async_trait]
impl SpeechBackend for RemoteSpeechBackend {
    async fn start(
        &self,
        unit: &SpokenUnit,
        rate: PlaybackRate,
    ) -> Result<SpeechSession, SpeechError> {
        let result = self.synthesize(unit).await?;
        let clock = self.sink.play(&result.audio, rate)?;
        Ok(SpeechSession {
            feed: SessionFeed::Precomputed {
                timings: result.timings.clone(),
                clock,
            },
            control: Arc::new(RemoteControl {
                sink: Arc::clone(&self.sink),
            }),
        })
    }

    async fn is_available(&self) -> bool {
        !self.config.base_url.trim().is_empty()
    }

    fn name(&self) -> &str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSink;

    struct NullClock;

    impl AudioClock for NullClock {
        fn position_ms(&self) -> f64 {
            0.0
        }

        fn is_finished(&self) -> bool {
            true
        }
    }

    impl AudioSink for NullSink {
        fn play(
            &self,
            _audio: &AudioData,
            _rate: PlaybackRate,
        ) -> Result<Arc<dyn AudioClock>, SpeechError> {
            Ok(Arc::new(NullClock))
        }

        fn pause(&self) {}
        fn resume(&self) {}
        fn stop(&self) {}
        fn set_rate(&self, _rate: PlaybackRate) {}
    }

    #[test]
    fn empty_base_url_rejected() {
        let config = RemoteConfig {
            base_url: "  ".to_string(),
            ..Default::default()
        };
        let result = RemoteSpeechBackend::new(config, None, Arc::new(NullSink));
        assert!(matches!(result, Err(SpeechError::Configuration(_))));
    }

    #[test]
    fn synthesize_url_appends_path() {
        let backend = RemoteSpeechBackend::new(
            RemoteConfig {
                base_url: "https://tts.internal/v1".to_string(),
                ..Default::default()
            },
            None,
            Arc::new(NullSink),
        )
        .unwrap();
        assert_eq!(backend.synthesize_url(), "https://tts.internal/v1/synthesize");
    }

    #[tokio::test]
    async fn text_over_limit_rejected_before_any_request() {
        let backend = RemoteSpeechBackend::new(
            RemoteConfig {
                base_url: "https://tts.internal/v1".to_string(),
                max_text_len: 5,
                ..Default::default()
            },
            None,
            Arc::new(NullSink),
        )
        .unwrap();
        let unit = SpokenUnit::new(
            "much too long",
            domain::LanguageTag::parse("en").unwrap(),
            domain::SourceKind::VisibleFallback,
        );
        let result = backend.synthesize(&unit).await;
        assert!(matches!(result, Err(SpeechError::TextTooLong { .. })));
    }
}
