//! Alternative-content catalog
//!
//! Holds author-supplied alternative representations at two scopes: a
//! long-lived container scope (a whole passage or section) and a short-lived
//! item scope that is discarded when navigation leaves the active region.
//! Mutated only by explicit registration calls from the navigation layer,
//! never by the playback path.

use domain::{AlternativeEntry, Modality, RegionId};
use tracing::debug;

/// Which catalog scope a registration or lookup targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogScope {
    /// Lives for the life of the container
    Container,
    /// Lives until the active region changes
    Item,
}

/// Registry of alternative representations, grouped by owning region
#[derive(Debug, Default)]
pub struct AlternativeCatalog {
    container: Vec<AlternativeEntry>,
    item: Vec<AlternativeEntry>,
}

/// Replace any entries owned by the incoming entries' regions, then append
///
/// Registration is idempotent per region: registering the same region twice
/// leaves one set of entries, not two.
fn upsert(target: &mut Vec<AlternativeEntry>, entries: Vec<AlternativeEntry>) {
    let owners: Vec<RegionId> = entries.iter().map(|e| e.owner.clone()).collect();
    target.retain(|existing| !owners.contains(&existing.owner));
    target.extend(entries);
}

impl AlternativeCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register container-scope entries
    pub fn register_container(&mut self, entries: Vec<AlternativeEntry>) {
        debug!(count = entries.len(), "registering container-scope entries");
        upsert(&mut self.container, entries);
    }

    /// Register item-scope entries for the active region
    pub fn register_item(&mut self, entries: Vec<AlternativeEntry>) {
        debug!(count = entries.len(), "registering item-scope entries");
        upsert(&mut self.item, entries);
    }

    /// Discard every item-scope entry
    ///
    /// Callers must invoke this before registering the next region's entries
    /// so stale content cannot leak across items.
    pub fn clear_item(&mut self) {
        self.item.clear();
    }

    /// Entries of one modality registered for a region at a scope
    #[must_use]
    pub fn lookup(
        &self,
        scope: CatalogScope,
        region: &RegionId,
        modality: Modality,
    ) -> Vec<&AlternativeEntry> {
        let entries = match scope {
            CatalogScope::Container => &self.container,
            CatalogScope::Item => &self.item,
        };
        entries
            .iter()
            .filter(|e| &e.owner == region && e.modality == modality)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use domain::LanguageTag;

    use super::*;

    fn entry(owner: &str, modality: Modality, language: &str, content: &str) -> AlternativeEntry {
        AlternativeEntry::new(
            RegionId::new(owner).unwrap(),
            modality,
            LanguageTag::parse(language).unwrap(),
            content,
        )
    }

    fn region(id: &str) -> RegionId {
        RegionId::new(id).unwrap()
    }

    #[test]
    fn lookup_filters_by_region_and_modality() {
        let mut catalog = AlternativeCatalog::new();
        catalog.register_item(vec![
            entry("item-1", Modality::Spoken, "en", "spoken script"),
            entry("item-1", Modality::Braille, "en", "braille cells"),
            entry("item-2", Modality::Spoken, "en", "other region"),
        ]);

        let hits = catalog.lookup(CatalogScope::Item, &region("item-1"), Modality::Spoken);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "spoken script");
    }

    #[test]
    fn item_registration_replaces_per_region() {
        let mut catalog = AlternativeCatalog::new();
        catalog.register_item(vec![entry("item-1", Modality::Spoken, "en", "first")]);
        catalog.register_item(vec![entry("item-1", Modality::Spoken, "en", "second")]);

        let hits = catalog.lookup(CatalogScope::Item, &region("item-1"), Modality::Spoken);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "second");
    }

    #[test]
    fn replacement_leaves_other_regions_alone() {
        let mut catalog = AlternativeCatalog::new();
        catalog.register_item(vec![
            entry("item-1", Modality::Spoken, "en", "one"),
            entry("item-2", Modality::Spoken, "en", "two"),
        ]);
        catalog.register_item(vec![entry("item-1", Modality::Spoken, "en", "one again")]);

        let other = catalog.lookup(CatalogScope::Item, &region("item-2"), Modality::Spoken);
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].content, "two");
    }

    #[test]
    fn clear_item_discards_item_scope_only() {
        let mut catalog = AlternativeCatalog::new();
        catalog.register_container(vec![entry("item-1", Modality::Spoken, "en", "container")]);
        catalog.register_item(vec![entry("item-1", Modality::Spoken, "en", "item")]);

        catalog.clear_item();

        assert!(
            catalog
                .lookup(CatalogScope::Item, &region("item-1"), Modality::Spoken)
                .is_empty()
        );
        assert_eq!(
            catalog
                .lookup(CatalogScope::Container, &region("item-1"), Modality::Spoken)
                .len(),
            1
        );
    }
}
