//! Audio and timing types shared by the speech providers

use domain::WordTiming;
use serde::{Deserialize, Serialize};

use crate::error::SpeechError;

/// Audio formats the providers deal in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// MP3 format
    Mp3,
    /// WAV format (uncompressed)
    Wav,
    /// OGG container
    Ogg,
}

impl AudioFormat {
    /// Get the MIME type for this audio format
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
        }
    }

    /// Parse a format from its wire name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }
}

/// Container for synthesized audio with metadata
#[derive(Debug, Clone)]
pub struct AudioData {
    data: Vec<u8>,
    format: AudioFormat,
    duration_ms: Option<u64>,
}

impl AudioData {
    /// Create new audio data
    #[must_use]
    pub const fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self {
            data,
            format,
            duration_ms: None,
        }
    }

    /// Attach a known duration
    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Get the raw audio bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the audio format
    #[must_use]
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    /// Get the duration in milliseconds, if known
    #[must_use]
    pub const fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    /// Check whether the audio payload is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of the payload in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// One timing record of the remote wire contract
///
/// `char_start`/`char_end` are 0-based character offsets into the exact
/// utterance text submitted for synthesis; records are ordered by `time_ms`
/// and cover the full utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechMark {
    /// Audible onset in milliseconds from utterance start
    pub time_ms: f64,
    /// Offset of the first character of the word
    pub char_start: usize,
    /// Offset one past the last character of the word
    pub char_end: usize,
    /// The word itself, as submitted
    pub text: String,
}

impl SpeechMark {
    /// Translate this mark into the normalized timing record
    #[must_use]
    pub fn to_word_timing(&self) -> WordTiming {
        WordTiming::new(
            self.char_start,
            self.char_end.saturating_sub(self.char_start),
            self.time_ms,
        )
    }
}

/// Validate a mark sequence against the submitted utterance text
///
/// # Errors
///
/// Returns `SpeechError::InvalidResponse` when marks are out of time order,
/// have inverted character ranges, or reference text beyond the utterance.
pub fn validate_marks(marks: &[SpeechMark], text_len: usize) -> Result<(), SpeechError> {
    let mut last_time = f64::NEG_INFINITY;
    for (i, mark) in marks.iter().enumerate() {
        if mark.time_ms < last_time {
            return Err(SpeechError::InvalidResponse(format!(
                "mark {i} out of time order ({} < {last_time})",
                mark.time_ms
            )));
        }
        last_time = mark.time_ms;
        if mark.char_end <= mark.char_start {
            return Err(SpeechError::InvalidResponse(format!(
                "mark {i} has inverted range {}..{}",
                mark.char_start, mark.char_end
            )));
        }
        if mark.char_end > text_len {
            return Err(SpeechError::InvalidResponse(format!(
                "mark {i} ends at {} beyond text length {text_len}",
                mark.char_end
            )));
        }
    }
    Ok(())
}

/// Synthesized audio with its complete timing list
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// The audio stream to play
    pub audio: AudioData,
    /// Word timings covering the full utterance, ordered by onset
    pub timings: Vec<WordTiming>,
}
