//! HTML tree model for the arbor toolkit.
//!
//! This crate provides an arena-based tree structure loosely following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/): a document, elements
//! with ordered attributes, and text.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships.
//! Every node stores its parent index and an ordered list of child indices, so
//! upward walks (selector matching, implicit end tags) are O(depth) without
//! reference counting.
//!
//! Appending enforces the document shape: a [`DomTree`] holds at most one
//! root element, the root is always `HTML`, and content placed directly under
//! `HTML` is wrapped in a synthesized `BODY` unless it is `HEAD` or `BODY`.

/// Ordered, unique-by-name attribute storage.
pub mod attributes;
/// Live token-set view over the `class` attribute.
pub mod class_list;
/// Tree mutation errors.
pub mod error;
/// Markup serialization.
pub mod serialize;

pub use attributes::{Attr, NamedNodeMap};
pub use class_list::ClassList;
pub use error::DomError;

/// Elements that never have children and never take an end tag.
///
/// Names are stored uppercase, the way element tag names are normalized.
pub const VOID_ELEMENTS: [&str; 14] = [
    "AREA", "BASE", "BR", "COL", "EMBED", "HR", "IMG", "INPUT", "LINK", "META", "PARAM", "SOURCE",
    "TRACK", "WBR",
];

/// Whether `tag_name` names a void element. Case-insensitive.
#[must_use]
pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag_name))
}

/// A type-safe index into the tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,
}

impl Node {
    const fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
        }
    }

    /// `#document`, `#text`, or the element's uppercase tag name.
    #[must_use]
    pub fn node_name(&self) -> &str {
        match &self.node_type {
            NodeType::Document => "#document",
            NodeType::Element(data) => data.tag_name(),
            NodeType::Text(_) => "#text",
        }
    }

    /// The text of a text node; `None` for documents and elements.
    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        match &self.node_type {
            NodeType::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this node is an element.
    #[must_use]
    pub const fn is_element(&self) -> bool {
        matches!(self.node_type, NodeType::Element(_))
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
}

/// Element-specific data.
///
/// The tag name is uppercased when the element is created and never changes
/// afterwards; attribute names keep their source casing.
#[derive(Debug, Clone)]
pub struct ElementData {
    tag_name: String,
    /// "An element has an associated attribute list"
    pub attributes: NamedNodeMap,
}

impl ElementData {
    /// Create element data, normalizing the tag name to uppercase.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_uppercase(),
            attributes: NamedNodeMap::new(),
        }
    }

    /// The uppercase tag name.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id")
    }

    /// The deduplicated `class` tokens in first-seen order.
    #[must_use]
    pub fn classes(&self) -> Vec<&str> {
        class_list::tokens(self.attributes.get("class").unwrap_or_default())
    }

    /// A live, mutable view over the `class` attribute.
    pub fn class_list(&mut self) -> ClassList<'_> {
        ClassList::new(&mut self.attributes)
    }

    /// Whether this element is one of [`VOID_ELEMENTS`].
    #[must_use]
    pub fn is_void(&self) -> bool {
        is_void_element(&self.tag_name)
    }
}

/// Arena-based tree with O(1) node access.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// All nodes live in one vector and refer to each other by index. Detached
/// nodes stay in the arena; they are simply unreachable from the root.
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
        Self {
            nodes: vec![Node::new(NodeType::Document)],
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
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes ever allocated, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty (it always holds at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new detached node and return its ID.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(node_type));
        id
    }

    /// Allocate a detached element; the tag name is uppercased.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeType::Element(ElementData::new(tag_name)))
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Text(text.into()))
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Appends `child` as the last child of `parent` and returns the ID of the
    /// appended node. If `child` is attached elsewhere it is moved.
    ///
    /// Appending an element may redirect the insertion:
    /// - under the Document, a non-`HTML` element is placed inside a
    ///   synthesized `HTML` element;
    /// - under `HTML`, an element other than `HEAD`/`BODY` is placed inside a
    ///   synthesized `BODY` element.
    ///
    /// # Errors
    ///
    /// - [`DomError::DocumentStructure`] if `parent` is the Document and it
    ///   already has a root element.
    /// - [`DomError::HierarchyRequest`] if `parent` is a text node or a
    ///   descendant of `child`, or either ID is unknown.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        self.check_hierarchy(parent, child)?;

        let mut parent = parent;
        if let Some(child_tag) = self.tag_name(child).map(str::to_owned) {
            if parent == NodeId::ROOT {
                if self.document_element().is_some() {
                    return Err(DomError::DocumentStructure);
                }
                if child_tag != "HTML" {
                    let html = self.create_element("HTML");
                    parent = self.append_child(parent, html)?;
                }
            }
            if self.tag_name(parent) == Some("HTML") && child_tag != "HEAD" && child_tag != "BODY"
            {
                let body = self.create_element("BODY");
                parent = self.append_child(parent, body)?;
            }
        }

        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        Ok(child)
    }

    /// [§ 4.2.3 Pre-insert](https://dom.spec.whatwg.org/#concept-node-pre-insert)
    ///
    /// Inserts `node` into `parent` immediately before `reference`. No
    /// wrapping is applied. If `node` is attached elsewhere it is moved.
    ///
    /// # Errors
    ///
    /// - [`DomError::ChildNotFound`] if `reference` is not a child of `parent`.
    /// - [`DomError::HierarchyRequest`] as for [`DomTree::append_child`].
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        reference: NodeId,
    ) -> Result<NodeId, DomError> {
        self.check_hierarchy(parent, node)?;
        if !self.children(parent).contains(&reference) {
            return Err(DomError::ChildNotFound {
                parent,
                child: reference,
            });
        }
        if node == reference {
            return Ok(node);
        }

        self.detach(node);
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|&id| id == reference)
            .ok_or(DomError::ChildNotFound {
                parent,
                child: reference,
            })?;
        self.nodes[parent.0].children.insert(index, node);
        self.nodes[node.0].parent = Some(parent);
        Ok(node)
    }

    /// [§ 4.2.4 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Detaches `id` from its parent. The node and its subtree stay in the
    /// arena and can be re-inserted. Removing a detached node is a no-op.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        self.nodes[parent.0].children.retain(|&child| child != id);
        self.nodes[id.0].parent = None;
    }

    fn check_hierarchy(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let reason = match (self.get(parent), self.get(child)) {
            (None, _) | (_, None) => Some("unknown node"),
            (Some(p), _) if matches!(p.node_type, NodeType::Text(_)) => {
                Some("text nodes cannot have children")
            }
            (_, Some(c)) if matches!(c.node_type, NodeType::Document) => {
                Some("the document cannot be a child")
            }
            _ if parent == child || self.is_descendant_of(parent, child) => {
                Some("a node cannot contain its own ancestor")
            }
            _ => None,
        };
        match reason {
            Some(reason) => Err(DomError::HierarchyRequest {
                parent,
                child,
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// The parent, if it is an element.
    #[must_use]
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.as_element(p).is_some())
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// The element children of a node, in order.
    #[must_use]
    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.as_element(child).is_some())
            .collect()
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
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
        self.get(id).and_then(Node::text_content)
    }

    /// The uppercase tag name if this node is an element.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(ElementData::tag_name)
    }

    /// `#document`, `#text`, or the tag name; `None` for unknown IDs.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(Node::node_name)
    }

    /// The concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(text) = self.as_text(id) {
            out.push_str(text);
            return;
        }
        for &child in self.children(id) {
            self.collect_text(child, out);
        }
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// The first `HEAD` child of the document element.
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.document_child_named("HEAD")
    }

    /// The first `BODY` child of the document element.
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.document_child_named("BODY")
    }

    fn document_child_named(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .find(|&&id| self.tag_name(id) == Some(tag))
            .copied()
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
