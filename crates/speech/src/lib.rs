//! Speech backend abstraction for the read-aloud engine
//!
//! Provides a uniform port over backends with very different timing
//! behavior:
//! - a local, event-driven backend whose boundary callbacks arrive live and
//!   may be unreliable on some hosts, and
//! - a remote backend that returns an audio stream plus a complete list of
//!   millisecond-accurate speech marks before playback starts.
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` defines the [`SpeechBackend`] trait and session types
//! - `providers` contains the concrete adapters (local, remote, fallback)
//!
//! Every backend-native event format is translated into
//! [`domain::WordTiming`] before leaving this crate, so the playback
//! controller is backend-agnostic.

pub mod boundary;
pub mod cache;
pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use boundary::BoundaryGuard;
pub use cache::SynthesisCache;
pub use config::{BackendKind, CacheConfig, LocalConfig, RemoteConfig, SpeechConfig};
pub use error::SpeechError;
pub use ports::{AudioClock, BackendEvent, SessionControl, SessionFeed, SpeechBackend, SpeechSession};
pub use providers::build_backend;
pub use providers::fallback::FallbackBackend;
pub use providers::local::{LocalSpeechBackend, NativeEvent, NativeSpeechEngine};
pub use providers::remote::{AudioSink, RemoteSpeechBackend};
pub use types::{AudioData, AudioFormat, SpeechMark, SynthesisResult};
