//! Arena-backed box tree.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. Layout
//! reads the tree and never mutates it.

use std::fmt;

use rustkit_style::BoxStyle;
use thiserror::Error;

/// Index of a node in a [`BoxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors from building a box tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("Node {child} already has a parent")]
    AlreadyAttached { child: NodeId },

    #[error("Appending {child} to {parent} would create a cycle")]
    WouldCreateCycle { parent: NodeId, child: NodeId },

    #[error("Node {0} is a leaf and cannot have children")]
    NotAContainer(NodeId),
}

/// What a box contains.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxKind {
    /// A box whose content is its children.
    Container,
    /// A run of text, measured through the text measurer.
    Text(String),
    /// A replaced element with a natural size (images, canvases).
    Replaced { width: f32, height: f32 },
}

/// A styled node in the tree.
#[derive(Debug, Clone)]
pub struct BoxNode {
    pub style: BoxStyle,
    pub kind: BoxKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The box tree consumed by layout.
#[derive(Debug, Clone, Default)]
pub struct BoxTree {
    nodes: Vec<BoxNode>,
}

impl BoxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached node.
    pub fn push(&mut self, style: BoxStyle, kind: BoxKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(BoxNode {
            style,
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Add a detached container.
    pub fn container(&mut self, style: BoxStyle) -> NodeId {
        self.push(style, BoxKind::Container)
    }

    /// Add a detached text leaf.
    pub fn text(&mut self, style: BoxStyle, text: impl Into<String>) -> NodeId {
        self.push(style, BoxKind::Text(text.into()))
    }

    /// Add a detached replaced leaf.
    pub fn replaced(&mut self, style: BoxStyle, width: f32, height: f32) -> NodeId {
        self.push(style, BoxKind::Replaced { width, height })
    }

    /// Add a container and attach `children` to it in order.
    pub fn with_children(&mut self, style: BoxStyle, children: &[NodeId]) -> Result<NodeId, TreeError> {
        let parent = self.container(style);
        for &child in children {
            self.append_child(parent, child)?;
        }
        Ok(parent)
    }

    /// Attach `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let parent_node = self.nodes.get(parent.0).ok_or(TreeError::UnknownNode(parent))?;
        let child_node = self.nodes.get(child.0).ok_or(TreeError::UnknownNode(child))?;

        if parent_node.kind != BoxKind::Container {
            return Err(TreeError::NotAContainer(parent));
        }

        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(TreeError::WouldCreateCycle { parent, child });
            }
            ancestor = self.nodes[id.0].parent;
        }

        if child_node.parent.is_some() {
            return Err(TreeError::AlreadyAttached { child });
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&BoxNode> {
        self.nodes.get(id.0)
    }

    pub fn style_mut(&mut self, id: NodeId) -> Option<&mut BoxStyle> {
        self.nodes.get_mut(id.0).map(|node| &mut node.style)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // Ids handed to layout are checked at the entry point and every attached
    // id was checked by `append_child`, so the accessors below index directly.

    pub(crate) fn get(&self, id: NodeId) -> &BoxNode {
        &self.nodes[id.0]
    }

    pub(crate) fn style(&self, id: NodeId) -> &BoxStyle {
        &self.nodes[id.0].style
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |node| node.children.as_slice())
    }
}
