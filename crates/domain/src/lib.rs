//! Domain layer for the read-aloud synchronization engine
//!
//! Contains the core data model shared by the speech backends and the
//! playback engine: value objects, content/region structures, timing
//! records, and domain errors. This layer has no knowledge of any concrete
//! speech backend or host document implementation.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
