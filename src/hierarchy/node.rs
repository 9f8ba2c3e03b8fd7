//! Node type and related structures.
//!
//! Nodes are the positions of the org chart once arranged as a tree. Each node has:
//! - A stable identifier (the index of its input row)
//! - The immutable `Position` it was built from
//! - Its children (in input row order) and a non-owning parent link
//! - Its depth (root = 0)

use std::fmt;

use serde::Serialize;

use crate::data::Position;

/// Stable node identifier.
///
/// Wraps the zero-based row index of the position the node was built from,
/// so it doubles as an index into per-node arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Index into per-node arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// One node of the built hierarchy.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    pub(crate) position: Position,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) depth: u32,
}

impl HierarchyNode {
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Parent lookup; `None` only for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Node presentation flags packed into a single byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeState {
    flags: u8,
}

impl NodeState {
    const COLLAPSED: u8 = 0b0000_0001;
    const HIDDEN: u8 = 0b0000_0010;
    const HOVERED: u8 = 0b0000_0100;

    /// Create a new default node state (expanded, visible, not hovered).
    #[inline]
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    /// Check if the node's own subtree is collapsed.
    #[inline]
    pub fn is_collapsed(self) -> bool {
        self.flags & Self::COLLAPSED != 0
    }

    /// Set the collapsed state.
    #[inline]
    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.set(Self::COLLAPSED, collapsed);
    }

    /// Check if the node is hidden by a collapsed ancestor.
    #[inline]
    pub fn is_hidden(self) -> bool {
        self.flags & Self::HIDDEN != 0
    }

    /// Set the hidden state.
    #[inline]
    pub fn set_hidden(&mut self, hidden: bool) {
        self.set(Self::HIDDEN, hidden);
    }

    /// Check if the pointer is over the node.
    #[inline]
    pub fn is_hovered(self) -> bool {
        self.flags & Self::HOVERED != 0
    }

    /// Set the hovered state.
    #[inline]
    pub fn set_hovered(&mut self, hovered: bool) {
        self.set(Self::HOVERED, hovered);
    }

    #[inline]
    fn set(&mut self, bit: u8, on: bool) {
        if on {
            self.flags |= bit;
        } else {
            self.flags &= !bit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.index(), 42);
        assert_eq!(format!("{}", id), "Node(42)");
    }

    #[test]
    fn test_node_id_conversion() {
        let id: NodeId = 123.into();
        let raw: u32 = id.into();
        assert_eq!(raw, 123);
    }

    #[test]
    fn test_node_state_default() {
        let state = NodeState::new();
        assert!(!state.is_collapsed());
        assert!(!state.is_hidden());
        assert!(!state.is_hovered());
    }

    #[test]
    fn test_node_state_flags_independent() {
        let mut state = NodeState::new();
        state.set_collapsed(true);
        state.set_hovered(true);
        assert!(state.is_collapsed());
        assert!(!state.is_hidden());
        assert!(state.is_hovered());

        state.set_hidden(true);
        state.set_collapsed(false);
        assert!(!state.is_collapsed());
        assert!(state.is_hidden());
        assert!(state.is_hovered());
    }
}
