//! Hierarchy - flat positions arranged as a single-rooted tree.
//!
//! The arena owns every node; parents list children by id and children keep a
//! parent id for lookup only. Construction validates the parent references
//! before anything is laid out:
//!
//! 1. Identifiers are unique.
//! 2. Every non-empty parent reference resolves to a position.
//! 3. Exactly one position is parentless.
//! 4. Parent links are acyclic (checked with a topological sort).

use std::collections::{HashMap, VecDeque};

use petgraph::algo::toposort;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Directed;

use super::edge::Edge;
use super::node::{HierarchyNode, NodeId};
use crate::data::Position;
use crate::error::{ChartError, Result};

/// A validated, single-rooted org chart tree.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
    root: NodeId,
    /// Registry from position identifier to node.
    by_position: HashMap<String, NodeId>,
}

impl Hierarchy {
    /// Build the tree from positions in input order.
    ///
    /// Children keep the relative order of their rows.
    pub fn build(positions: Vec<Position>) -> Result<Self> {
        let mut by_position: HashMap<String, NodeId> = HashMap::with_capacity(positions.len());
        for (row, position) in positions.iter().enumerate() {
            let id = NodeId(row as u32);
            if let Some(first) = by_position.insert(position.position_id.clone(), id) {
                return Err(ChartError::DuplicatePosition {
                    position_id: position.position_id.clone(),
                    first_row: first.index(),
                    second_row: row,
                });
            }
        }

        // Resolve parent references
        let mut parents: Vec<Option<NodeId>> = Vec::with_capacity(positions.len());
        let mut roots: Vec<NodeId> = Vec::new();
        for (row, position) in positions.iter().enumerate() {
            match position.parent_id() {
                None => {
                    roots.push(NodeId(row as u32));
                    parents.push(None);
                }
                Some(parent_id) if parent_id == position.position_id => {
                    return Err(ChartError::Cycle {
                        position_id: position.position_id.clone(),
                    });
                }
                Some(parent_id) => match by_position.get(parent_id) {
                    Some(&parent) => parents.push(Some(parent)),
                    None => {
                        return Err(ChartError::DanglingParent {
                            position_id: position.position_id.clone(),
                            parent_id: parent_id.to_string(),
                        });
                    }
                },
            }
        }

        let root = match roots.as_slice() {
            [] => return Err(ChartError::NoRoot),
            [root] => *root,
            many => {
                return Err(ChartError::MultipleRoots {
                    position_ids: many
                        .iter()
                        .map(|id| positions[id.index()].position_id.clone())
                        .collect(),
                });
            }
        };

        Self::check_acyclic(&positions, &parents)?;

        let mut nodes: Vec<HierarchyNode> = positions
            .into_iter()
            .zip(parents.iter())
            .map(|(position, &parent)| HierarchyNode {
                position,
                parent,
                children: Vec::new(),
                depth: 0,
            })
            .collect();

        for (row, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                nodes[parent.index()].children.push(NodeId(row as u32));
            }
        }

        // Breadth-first depth assignment; every node must be reached from the root.
        let mut reached = 0usize;
        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            reached += 1;
            let depth = nodes[id.index()].depth;
            for i in 0..nodes[id.index()].children.len() {
                let child = nodes[id.index()].children[i];
                nodes[child.index()].depth = depth + 1;
                queue.push_back(child);
            }
        }
        if reached != nodes.len() {
            let orphan = nodes
                .iter()
                .enumerate()
                .find(|(row, node)| NodeId(*row as u32) != root && node.depth == 0)
                .map(|(_, node)| node.position.position_id.clone())
                .unwrap_or_default();
            return Err(ChartError::Cycle { position_id: orphan });
        }

        tracing::debug!(
            nodes = nodes.len(),
            root = %nodes[root.index()].position.position_id,
            "built hierarchy"
        );

        Ok(Self {
            nodes,
            root,
            by_position,
        })
    }

    /// Reject parent links that loop instead of ending at the root.
    fn check_acyclic(positions: &[Position], parents: &[Option<NodeId>]) -> Result<()> {
        let mut graph: StableGraph<NodeId, (), Directed> =
            StableGraph::with_capacity(parents.len(), parents.len());
        for row in 0..parents.len() {
            graph.add_node(NodeId(row as u32));
        }
        for (row, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                graph.add_edge(NodeIndex::new(parent.index()), NodeIndex::new(row), ());
            }
        }

        toposort(&graph, None).map(|_| ()).map_err(|cycle| {
            let id = graph[cycle.node_id()];
            ChartError::Cycle {
                position_id: positions[id.index()].position_id.clone(),
            }
        })
    }

    /// Number of nodes (always at least one).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node. Panics if `id` does not belong to this hierarchy.
    pub fn node(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&HierarchyNode> {
        self.nodes.get(id.index())
    }

    /// Look up a node by its position identifier.
    pub fn find(&self, position_id: &str) -> Option<NodeId> {
        self.by_position.get(position_id).copied()
    }

    /// All nodes in input row order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &HierarchyNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(row, node)| (NodeId(row as u32), node))
    }

    /// All parent → child edges in input row order of the child.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes()
            .filter_map(|(id, node)| node.parent.map(|parent| Edge::new(parent, id)))
    }

    /// Every node, parents before children, siblings in stored order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        order.push(self.root);
        order.extend(self.descendants(self.root));
        order
    }

    /// Strict descendants of `id` in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id.index()].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.index()].children.iter().rev().copied());
        }
        out
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id.index()].parent, move |current| {
            self.nodes[current.index()].parent
        })
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(pairs: &[(&str, Option<&str>)]) -> Vec<Position> {
        pairs
            .iter()
            .map(|&(id, parent)| Position::new(id, parent))
            .collect()
    }

    #[test]
    fn test_three_node_tree() {
        let tree = Hierarchy::build(positions(&[("R", None), ("A", Some("R")), ("B", Some("R"))]))
            .unwrap();

        assert_eq!(tree.len(), 3);
        let root = tree.root();
        assert_eq!(tree.node(root).position().position_id, "R");
        assert_eq!(tree.node(root).depth(), 0);

        let children: Vec<&str> = tree
            .node(root)
            .children()
            .iter()
            .map(|&c| tree.node(c).position().position_id.as_str())
            .collect();
        assert_eq!(children, vec!["A", "B"]);

        for &child in tree.node(root).children() {
            assert_eq!(tree.node(child).depth(), 1);
            assert_eq!(tree.node(child).parent(), Some(root));
        }
        assert_eq!(tree.edges().count(), 2);
    }

    #[test]
    fn test_children_follow_row_order_when_parent_comes_later() {
        let tree = Hierarchy::build(positions(&[
            ("c2", Some("p")),
            ("root", None),
            ("c1", Some("p")),
            ("p", Some("root")),
        ]))
        .unwrap();

        let p = tree.find("p").unwrap();
        let names: Vec<&str> = tree
            .node(p)
            .children()
            .iter()
            .map(|&c| tree.node(c).position().position_id.as_str())
            .collect();
        assert_eq!(names, vec!["c2", "c1"]);
        assert_eq!(tree.node(tree.find("c1").unwrap()).depth(), 2);
    }

    #[test]
    fn test_dangling_parent() {
        let err = Hierarchy::build(positions(&[("R", None), ("A", Some("ghost"))])).unwrap_err();
        assert_eq!(
            err,
            ChartError::DanglingParent {
                position_id: "A".into(),
                parent_id: "ghost".into()
            }
        );
    }

    #[test]
    fn test_multiple_roots() {
        let err = Hierarchy::build(positions(&[("R", None), ("S", None), ("A", Some("R"))]))
            .unwrap_err();
        assert_eq!(
            err,
            ChartError::MultipleRoots {
                position_ids: vec!["R".into(), "S".into()]
            }
        );
    }

    #[test]
    fn test_no_root() {
        assert_eq!(Hierarchy::build(Vec::new()).unwrap_err(), ChartError::NoRoot);

        let err = Hierarchy::build(positions(&[("A", Some("B")), ("B", Some("A"))])).unwrap_err();
        assert_eq!(err, ChartError::NoRoot);
    }

    #[test]
    fn test_cycle_beside_root() {
        let err = Hierarchy::build(positions(&[
            ("R", None),
            ("A", Some("C")),
            ("B", Some("A")),
            ("C", Some("B")),
        ]))
        .unwrap_err();
        assert!(matches!(err, ChartError::Cycle { .. }), "got {err:?}");
    }

    #[test]
    fn test_self_parent_is_cycle() {
        let err = Hierarchy::build(positions(&[("R", None), ("A", Some("A"))])).unwrap_err();
        assert_eq!(
            err,
            ChartError::Cycle {
                position_id: "A".into()
            }
        );
    }

    #[test]
    fn test_duplicate_position() {
        let err = Hierarchy::build(positions(&[("R", None), ("A", Some("R")), ("A", Some("R"))]))
            .unwrap_err();
        assert!(matches!(
            err,
            ChartError::DuplicatePosition { first_row: 1, second_row: 2, .. }
        ));
    }

    #[test]
    fn test_traversals() {
        // R → A → (A1, A2), R → B
        let tree = Hierarchy::build(positions(&[
            ("R", None),
            ("A", Some("R")),
            ("B", Some("R")),
            ("A1", Some("A")),
            ("A2", Some("A")),
        ]))
        .unwrap();

        let ids = |v: Vec<NodeId>| -> Vec<String> {
            v.into_iter()
                .map(|id| tree.node(id).position().position_id.clone())
                .collect()
        };

        assert_eq!(ids(tree.preorder()), vec!["R", "A", "A1", "A2", "B"]);
        assert_eq!(ids(tree.descendants(tree.find("A").unwrap())), vec!["A1", "A2"]);
        assert_eq!(
            ids(tree.ancestors(tree.find("A2").unwrap()).collect()),
            vec!["A", "R"]
        );
        assert!(tree.is_ancestor(tree.root(), tree.find("A2").unwrap()));
        assert!(!tree.is_ancestor(tree.find("B").unwrap(), tree.find("A2").unwrap()));
    }
}
