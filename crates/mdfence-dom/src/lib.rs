//! Markup tree for the mdfence HTML engine.
//!
//! This crate provides an arena-based tree structure for the documents the
//! lenient HTML parser in `mdfence-html` produces.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Parents
//! own their children through the arena; the `parent` field of a [`Node`] is a
//! navigational handle only.

mod render_override;
mod span;
mod walk;

use indexmap::IndexMap;

pub use render_override::{RenderOutput, RenderOverride};
pub use span::{Location, Span};
pub use walk::{Descendants, descendants, walk};

/// Map of attribute names to values for an element, in source order.
///
/// A repeated key overwrites the earlier value but keeps its position.
pub type AttributesMap = IndexMap<String, String>;

/// A type-safe index into the tree.
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// A node in the arena: its data, its place in the tree and its source location.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is, with its kind-specific data.
    pub node_type: NodeType,

    /// The node containing this one. `None` for the document and for nodes
    /// allocated but not yet appended.
    pub parent: Option<NodeId>,

    /// Children in document order. Always empty for leaves.
    pub children: Vec<NodeId>,

    /// Where the node was found in the source text.
    pub location: Location,
}

/// The closed set of node kinds.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The root container of a parsed fragment.
    Document,
    /// A tag with attributes and children.
    Element(ElementData),
    /// Literal character data, stored exactly as it appeared.
    Text(String),
    /// The raw interior of `<!--...-->`.
    Comment(String),
    /// The raw interior of `<!...>` (`DOCTYPE html` for `<!DOCTYPE html>`).
    Doctype(String),
}

impl NodeType {
    /// Whether this is an element node.
    #[must_use]
    pub const fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }
}

/// Element-specific data.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// The tag name, exactly as written in the source.
    pub tag_name: String,
    /// Attributes in source order.
    pub attrs: AttributesMap,
    /// The tag was written as `<tag/>`, or names a void element.
    pub self_closing: bool,
    /// Replaces the serializer's output for this element when set.
    pub render_override: Option<RenderOverride>,
}

impl ElementData {
    /// An element with no attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attrs.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Arena-based tree with O(1) node access and traversal.
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships. This provides:
/// - O(1) access to any node by `NodeId`
/// - O(1) parent traversal
/// - No borrowing issues (indices instead of references)
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
            location: Location::default(),
        };
        Self {
            nodes: vec![document],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    ///
    /// Mutation is not re-validated; callers keep the tree well-formed.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes in the tree, the document included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (it always holds at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType, location: Location) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            location,
        });
        id
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// `child` must be a freshly allocated, unattached node.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.nodes[child.0].parent.is_none(),
            "append_child called with an attached node"
        );
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Allocate a node and append it under `parent` in one step.
    pub fn append(&mut self, parent: NodeId, node_type: NodeType, location: Location) -> NodeId {
        let id = self.alloc(node_type, location);
        self.append_child(parent, id);
        id
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Position of `id` among its parent's children.
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Source location of a node.
    #[must_use]
    pub fn location(&self, id: NodeId) -> Option<Location> {
        self.get(id).map(|n| n.location)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Whether any ancestor of `id` is an element named `tag_name`.
    #[must_use]
    pub fn has_ancestor_named(&self, id: NodeId, tag_name: &str) -> bool {
        self.ancestors(id)
            .any(|a| self.as_element(a).is_some_and(|e| e.tag_name == tag_name))
    }

    /// The concatenated text of all text nodes under `id`, in document order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        descendants(self, id)
            .filter_map(|d| self.as_text(d))
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
