//! Fallback backend chain
//!
//! Tries each configured backend once, in the explicit priority order from
//! configuration. A backend that is unavailable or fails to start is logged
//! and skipped; only when every backend has been exhausted does the failure
//! reach the caller.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{PlaybackRate, SpokenUnit};
use tracing::{debug, info, instrument, warn};

use crate::error::SpeechError;
use crate::ports::{SpeechBackend, SpeechSession};

/// Priority-ordered chain of speech backends
pub struct FallbackBackend {
    backends: Vec<Arc<dyn SpeechBackend>>,
}

impl std::fmt::Debug for FallbackBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.backends.iter().map(|b| b.name()).collect();
        f.debug_struct("FallbackBackend")
            .field("order", &names)
            .finish()
    }
}

impl FallbackBackend {
    /// Create a chain from backends in priority order
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the chain is empty.
    pub fn new(backends: Vec<Arc<dyn SpeechBackend>>) -> Result<Self, SpeechError> {
        if backends.is_empty() {
            return Err(SpeechError::Configuration(
                "at least one speech backend must be configured".to_string(),
            ));
        }
        Ok(Self { backends })
    }
}

#[async_trait]
impl SpeechBackend for FallbackBackend {
    #[instrument(skip(self, unit), fields(text_len = unit.text.len()))]
    async fn start(
        &self,
        unit: &SpokenUnit,
        rate: PlaybackRate,
    ) -> Result<SpeechSession, SpeechError> {
        let mut last_error: Option<SpeechError> = None;

        for backend in &self.backends {
            if !backend.is_available().await {
                debug!(backend = backend.name(), "backend not available, skipping");
                continue;
            }
            match backend.start(unit, rate).await {
                Ok(session) => {
                    info!(backend = backend.name(), "backend session started");
                    return Ok(session);
                }
                Err(e) => {
                    warn!(backend = backend.name(), error = %e, "backend failed to start");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| SpeechError::NotAvailable("no speech backend available".to_string())))
    }

    async fn is_available(&self) -> bool {
        for backend in &self.backends {
            if backend.is_available().await {
                return true;
            }
        }
        false
    }

    fn name(&self) -> &str {
        "fallback"
    }
}
