//! Content resolution
//!
//! Picks the string actually synthesized for a region. Four-step priority
//! chain, highest first: an embedded spoken payload inside the region's own
//! content, an item-scope spoken catalog entry, a container-scope entry,
//! then the rendered visible text verbatim. Exactly one step fires per
//! request; a step that exists but is unusable falls through rather than
//! being partially used.

use domain::{LanguageTag, Modality, Region, SourceKind, SpokenUnit};
use tracing::debug;

use crate::catalog::{AlternativeCatalog, CatalogScope};
use crate::mapper::normalize_text;

/// Resolve the spoken unit for a region
///
/// `requested_language` is the caller's preference; entries are matched
/// exactly (with primary-subtag equivalence), then against the designated
/// fallback language, then any entry, the latter two only when
/// `allow_language_fallback` permits. Returns `None` when the region has no
/// spoken content and no visible text; callers treat that as a no-op.
///
/// Pure over the currently registered catalog state; no side effects.
#[must_use]
pub fn resolve(
    region: &Region,
    catalog: &AlternativeCatalog,
    requested_language: Option<&LanguageTag>,
    allow_language_fallback: bool,
    fallback_language: &LanguageTag,
) -> Option<SpokenUnit> {
    let preferred = requested_language.unwrap_or(fallback_language);

    // Step 1: spoken payload embedded in the region's own markup. An empty
    // or whitespace-only payload is malformed and treated as absent.
    if let Some(payload) = region.spoken_payload() {
        let text = normalize_text(&payload);
        if text.is_empty() {
            debug!(region = %region.id(), "embedded spoken payload is malformed, falling through");
        } else {
            return Some(SpokenUnit::new(text, preferred.clone(), SourceKind::Extracted));
        }
    }

    // Steps 2 and 3: catalog entries, item scope shadowing container scope.
    for (scope, source) in [
        (CatalogScope::Item, SourceKind::AlternativeItem),
        (CatalogScope::Container, SourceKind::AlternativeContainer),
    ] {
        let entries = catalog.lookup(scope, region.id(), Modality::Spoken);
        if let Some(unit) = pick_entry(
            &entries,
            preferred,
            fallback_language,
            allow_language_fallback,
            source,
        ) {
            return Some(unit);
        }
    }

    // Step 4: the rendered visible text itself.
    let text = normalize_text(&region.visible_text());
    if text.is_empty() {
        debug!(region = %region.id(), "nothing to speak");
        return None;
    }
    Some(SpokenUnit::new(
        text,
        preferred.clone(),
        SourceKind::VisibleFallback,
    ))
}

/// Pick one entry by language preference tier
fn pick_entry(
    entries: &[&domain::AlternativeEntry],
    preferred: &LanguageTag,
    fallback: &LanguageTag,
    allow_language_fallback: bool,
    source: SourceKind,
) -> Option<SpokenUnit> {
    let chosen = entries
        .iter()
        .find(|e| e.language.matches(preferred))
        .or_else(|| {
            if allow_language_fallback {
                entries
                    .iter()
                    .find(|e| e.language.matches(fallback))
                    .or_else(|| entries.first())
            } else {
                None
            }
        })?;

    let text = normalize_text(&chosen.content);
    if text.is_empty() {
        // Registered but empty content is as good as absent.
        return None;
    }
    Some(SpokenUnit::new(text, chosen.language.clone(), source))
}
