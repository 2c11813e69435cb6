//! Value objects for the read-aloud domain

pub mod language_tag;
pub mod modality;
pub mod playback_rate;
pub mod region_id;
pub mod session_id;
pub mod source_kind;

pub use language_tag::LanguageTag;
pub use modality::Modality;
pub use playback_rate::PlaybackRate;
pub use region_id::RegionId;
pub use session_id::SessionId;
pub use source_kind::SourceKind;
