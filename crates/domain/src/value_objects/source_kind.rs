//! Origin of a resolved spoken unit

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which step of the resolution chain produced a spoken unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Embedded spoken payload extracted from the region's own markup
    Extracted,
    /// Item-scope catalog entry
    AlternativeItem,
    /// Container-scope catalog entry
    AlternativeContainer,
    /// The rendered visible text, taken verbatim
    VisibleFallback,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Extracted => "extracted",
            Self::AlternativeItem => "alternative-item",
            Self::AlternativeContainer => "alternative-container",
            Self::VisibleFallback => "visible-fallback",
        };
        write!(f, "{name}")
    }
}
