//! Collapse/expand state and derived visibility.
//!
//! The collapsed set is the only source of truth. A node is visible iff none
//! of its strict ancestors is collapsed, and an edge is visible iff its child
//! is visible. Derived flags are recomputed for the affected subtree on every
//! toggle, so the renderer can read them at any time.

use std::collections::BTreeSet;

use crate::hierarchy::{EdgeState, Hierarchy, NodeId, NodeState};

/// Own state of a node in the collapse state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseState {
    Expanded,
    Collapsed,
}

/// Per-chart visibility controller.
#[derive(Debug, Clone)]
pub struct VisibilityState {
    collapsed: BTreeSet<NodeId>,
    /// Node flags, indexed by `NodeId`.
    nodes: Vec<NodeState>,
    /// Edge flags, indexed by the edge's child `NodeId` (unused for the root).
    edges: Vec<EdgeState>,
    hovered: Option<NodeId>,
}

impl VisibilityState {
    /// Every node expanded and visible.
    pub fn new(tree: &Hierarchy) -> Self {
        Self {
            collapsed: BTreeSet::new(),
            nodes: vec![NodeState::new(); tree.len()],
            edges: vec![EdgeState::new(); tree.len()],
            hovered: None,
        }
    }

    /// Flip `id` between expanded and collapsed, then re-derive visibility
    /// for its strict descendants. Returns the node's new state.
    ///
    /// Panics if `id` does not belong to `tree`.
    pub fn toggle(&mut self, tree: &Hierarchy, id: NodeId) -> CollapseState {
        let collapsed = !self.collapsed.remove(&id);
        if collapsed {
            self.collapsed.insert(id);
        }
        self.nodes[id.index()].set_collapsed(collapsed);
        self.propagate(tree, id);

        let state = if collapsed {
            CollapseState::Collapsed
        } else {
            CollapseState::Expanded
        };
        tracing::debug!(node = %id, ?state, "toggled node");
        state
    }

    /// Clear the collapsed set and show everything.
    pub fn expand_all(&mut self) {
        for id in std::mem::take(&mut self.collapsed) {
            self.nodes[id.index()].set_collapsed(false);
        }
        self.nodes.iter_mut().for_each(|s| s.set_hidden(false));
        self.edges.iter_mut().for_each(|s| s.set_hidden(false));
    }

    /// Re-derive visibility below `id` from the collapsed set.
    ///
    /// `id`'s own visibility depends only on its ancestors and is unchanged.
    fn propagate(&mut self, tree: &Hierarchy, id: NodeId) {
        let hide_children = self.nodes[id.index()].is_hidden() || self.collapsed.contains(&id);
        let mut stack: Vec<(NodeId, bool)> = tree
            .node(id)
            .children()
            .iter()
            .map(|&child| (child, hide_children))
            .collect();

        while let Some((node, hidden)) = stack.pop() {
            self.nodes[node.index()].set_hidden(hidden);
            self.edges[node.index()].set_hidden(hidden);
            debug_assert_eq!(!hidden, self.derive_visible(tree, node));

            let hide_below = hidden || self.collapsed.contains(&node);
            stack.extend(
                tree.node(node)
                    .children()
                    .iter()
                    .map(|&child| (child, hide_below)),
            );
        }
    }

    pub fn state(&self, id: NodeId) -> CollapseState {
        if self.collapsed.contains(&id) {
            CollapseState::Collapsed
        } else {
            CollapseState::Expanded
        }
    }

    pub fn is_collapsed(&self, id: NodeId) -> bool {
        self.collapsed.contains(&id)
    }

    /// Collapsed node ids in ascending order.
    pub fn collapsed(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.collapsed.iter().copied()
    }

    /// Whether no strict ancestor of `id` is collapsed.
    pub fn is_visible(&self, id: NodeId) -> bool {
        !self.nodes[id.index()].is_hidden()
    }

    /// Visibility of the edge whose child endpoint is `child`.
    pub fn is_edge_visible(&self, child: NodeId) -> bool {
        !self.edges[child.index()].is_hidden()
    }

    pub fn node_state(&self, id: NodeId) -> NodeState {
        self.nodes[id.index()]
    }

    /// Mark `id` as hovered (or clear it). Only one node is hovered at a time.
    pub fn set_hovered(&mut self, id: NodeId, hovered: bool) {
        if hovered {
            if let Some(previous) = self.hovered.replace(id) {
                self.nodes[previous.index()].set_hovered(false);
            }
            self.nodes[id.index()].set_hovered(true);
        } else if self.hovered == Some(id) {
            self.hovered = None;
            self.nodes[id.index()].set_hovered(false);
        }
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Visibility computed directly from the definition, ignoring cached flags.
    pub fn derive_visible(&self, tree: &Hierarchy, id: NodeId) -> bool {
        !tree.ancestors(id).any(|a| self.collapsed.contains(&a))
    }
}
