//! Text to document position mapping
//!
//! Rendered text and spoken text differ by leading/trailing whitespace and
//! collapsed whitespace runs. The index built here aligns every character
//! offset of the normalized spoken string with the exact text node and
//! in-node offset it came from, so backend word events (which reference the
//! spoken string) can be painted onto the rendered document.

use domain::{DomRange, Region, RegionId, TextLocation};

/// Normalize text the way it is spoken: trim, collapse whitespace runs
///
/// This is the single normalization rule shared by the resolver and the
/// position index; both sides of the mapping must use it.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.is_empty() {
                pending_space = true;
            }
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
    }
    out
}

/// Index from normalized-text offsets to document positions
///
/// Built once per playback request, against the region revision current at
/// build time. A region whose content is replaced afterwards makes the index
/// stale; lookups against a stale index must be skipped, not trusted.
#[derive(Debug)]
pub struct TextPositionIndex {
    region_id: RegionId,
    revision: u64,
    table: Vec<TextLocation>,
    node_lens: Vec<usize>,
}

impl TextPositionIndex {
    /// Build the index by walking the region's visible text nodes
    ///
    /// Characters before the first non-space and extra whitespace inside a
    /// run are skipped without advancing the normalized position, so entry
    /// `i` of the table is the document position of normalized character
    /// `i`. The table is truncated to the normalized text length, which
    /// drops the entry a trailing whitespace run would otherwise add.
    #[must_use]
    pub fn build(region: &Region, normalized_text: &str) -> Self {
        let mut table = Vec::new();
        let mut node_lens = Vec::new();
        let mut started = false;
        let mut last_was_space = false;

        for (node, text) in region.text_nodes() {
            node_lens.push(text.chars().count());
            for (offset, c) in text.chars().enumerate() {
                if c.is_whitespace() {
                    if !started || last_was_space {
                        continue;
                    }
                    table.push(TextLocation { node, offset });
                    last_was_space = true;
                } else {
                    started = true;
                    last_was_space = false;
                    table.push(TextLocation { node, offset });
                }
            }
        }
        table.truncate(normalized_text.chars().count());

        Self {
            region_id: region.id().clone(),
            revision: region.revision(),
            table,
            node_lens,
        }
    }

    /// Length of the indexed normalized text
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check whether the index covers no text
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Check whether a region has mutated since the index was built
    #[must_use]
    pub fn is_stale(&self, region: &Region) -> bool {
        region.id() != &self.region_id || region.revision() != self.revision
    }

    /// Resolve a normalized-text span to a document range
    ///
    /// A span whose endpoints fall in different text nodes (a word split by
    /// inline markup) is clipped to the end of the first node. Returns
    /// `None` for an empty span or one extending past the indexed text.
    #[must_use]
    pub fn locate(&self, offset: usize, length: usize) -> Option<DomRange> {
        if length == 0 {
            return None;
        }
        let first = *self.table.get(offset)?;
        let last = *self.table.get(offset + length - 1)?;
        if first.node == last.node {
            return Some(DomRange {
                node: first.node,
                start: first.offset,
                end: last.offset + 1,
            });
        }
        let end = *self.node_lens.get(first.node.0)?;
        Some(DomRange {
            node: first.node,
            start: first.offset,
            end,
        })
    }

    /// Document ranges covering the whole indexed text, one per touched node
    #[must_use]
    pub fn full_span(&self) -> Vec<DomRange> {
        let mut spans: Vec<DomRange> = Vec::new();
        for location in &self.table {
            match spans.last_mut() {
                Some(span) if span.node == location.node => span.end = location.offset + 1,
                _ => spans.push(DomRange {
                    node: location.node,
                    start: location.offset,
                    end: location.offset + 1,
                }),
            }
        }
        spans
    }
}
