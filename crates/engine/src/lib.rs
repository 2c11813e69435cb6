//! Read-aloud playback orchestration
//!
//! Ties the pieces of the synchronization engine together: the content
//! resolver picks what to speak, the position mapper aligns the spoken
//! string with the rendered document, the playback controller drives a
//! speech backend session, and the highlight renderer paints a two-layer
//! highlight that tracks the spoken word.
//!
//! The speech backends themselves live in the `speech` crate; this crate is
//! backend-agnostic and consumes their normalized timing events.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod highlight;
pub mod mapper;
pub mod resolver;

pub use catalog::{AlternativeCatalog, CatalogScope};
pub use config::EngineConfig;
pub use controller::{ReadAloudEngine, SpeakOptions, SpeakOutcome, rescale_timings};
pub use error::EngineError;
pub use highlight::{HighlightHost, HighlightLayer, HighlightRenderer};
pub use mapper::{TextPositionIndex, normalize_text};
pub use resolver::resolve;
