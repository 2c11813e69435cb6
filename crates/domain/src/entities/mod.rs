//! Entities and records for the read-aloud domain

pub mod alternative_entry;
pub mod content;
pub mod playback_state;
pub mod spoken_unit;
pub mod word_timing;

pub use alternative_entry::AlternativeEntry;
pub use content::{ContentNode, DomRange, NodeId, Region, SPOKEN_PAYLOAD_TAG, TextLocation};
pub use playback_state::PlaybackState;
pub use spoken_unit::SpokenUnit;
pub use word_timing::WordTiming;
