//! Rendered-content model for visible regions
//!
//! The engine never mutates the host document; it only needs enough
//! structure to walk visible text nodes in document order and to detect the
//! embedded spoken-payload element structurally. Rendering itself is an
//! external collaborator.

use serde::{Deserialize, Serialize};

use crate::value_objects::RegionId;

/// Tag of the inline element carrying an author-supplied spoken script
///
/// Detection is structural: an element node with this tag. The payload text
/// is extracted for synthesis and its subtree is excluded from the visible
/// text and from the text-node walk.
pub const SPOKEN_PAYLOAD_TAG: &str = "spoken";

/// A node in a region's rendered content tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentNode {
    /// An element with a tag and child nodes
    Element {
        /// Element tag name
        tag: String,
        /// Child nodes in document order
        children: Vec<ContentNode>,
    },
    /// A text node
    Text(String),
}

impl ContentNode {
    /// Create an element node
    #[must_use]
    pub fn element(tag: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Element {
            tag: tag.into(),
            children,
        }
    }

    /// Create a text node
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Check whether this node is a spoken-payload element
    #[must_use]
    pub fn is_spoken_payload(&self) -> bool {
        matches!(self, Self::Element { tag, .. } if tag == SPOKEN_PAYLOAD_TAG)
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Document-order index of a visible text node within a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// A position inside a visible text node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLocation {
    /// The text node
    pub node: NodeId,
    /// Character offset within that node's raw text
    pub offset: usize,
}

/// A character range inside a single visible text node
///
/// Ranges never span nodes: a word straddling two text nodes is clipped to
/// the end of the first node by the position mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomRange {
    /// The text node
    pub node: NodeId,
    /// Start offset within the node (inclusive)
    pub start: usize,
    /// End offset within the node (exclusive)
    pub end: usize,
}

impl DomRange {
    /// Length of the range in characters
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check whether the range is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// A visible region of rendered content
///
/// The revision counter is bumped whenever the content is replaced; position
/// indices record the revision they were built against so stale lookups can
/// be detected rather than silently mis-highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    id: RegionId,
    root: ContentNode,
    revision: u64,
}

impl Region {
    /// Create a region from its rendered content tree
    #[must_use]
    pub fn new(id: RegionId, root: ContentNode) -> Self {
        Self {
            id,
            root,
            revision: 0,
        }
    }

    /// The region's identifier
    #[must_use]
    pub fn id(&self) -> &RegionId {
        &self.id
    }

    /// Current content revision
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the rendered content, invalidating existing position indices
    pub fn replace_root(&mut self, root: ContentNode) {
        self.root = root;
        self.revision += 1;
    }

    /// Extract the embedded spoken payload, if one is present
    ///
    /// Returns the concatenated text of the first spoken-payload element in
    /// document order. Whether that text is usable is the resolver's call.
    #[must_use]
    pub fn spoken_payload(&self) -> Option<String> {
        fn find(node: &ContentNode) -> Option<String> {
            match node {
                ContentNode::Text(_) => None,
                ContentNode::Element { children, .. } => {
                    if node.is_spoken_payload() {
                        let mut text = String::new();
                        node.collect_text(&mut text);
                        return Some(text);
                    }
                    children.iter().find_map(find)
                }
            }
        }
        find(&self.root)
    }

    /// Visible text nodes in document order, excluding spoken-payload subtrees
    #[must_use]
    pub fn text_nodes(&self) -> Vec<(NodeId, &str)> {
        fn walk<'a>(node: &'a ContentNode, out: &mut Vec<(NodeId, &'a str)>) {
            match node {
                ContentNode::Text(text) => {
                    let id = NodeId(out.len());
                    out.push((id, text.as_str()));
                }
                ContentNode::Element { children, .. } => {
                    if node.is_spoken_payload() {
                        return;
                    }
                    for child in children {
                        walk(child, out);
                    }
                }
            }
        }
        let mut nodes = Vec::new();
        walk(&self.root, &mut nodes);
        nodes
    }

    /// The raw visible text: all visible text nodes concatenated
    #[must_use]
    pub fn visible_text(&self) -> String {
        self.text_nodes()
            .into_iter()
            .map(|(_, text)| text)
            .collect()
    }

    /// Raw text of a single node, if the id is valid
    #[must_use]
    pub fn node_text(&self, node: NodeId) -> Option<String> {
        self.text_nodes()
            .into_iter()
            .find(|(id, _)| *id == node)
            .map(|(_, text)| text.to_string())
    }
}
