//! Hierarchy data structures and construction.
//!
//! Positions are arranged into an arena-backed tree: nodes are addressed by
//! stable [`NodeId`]s, parents own their child lists, and children keep a
//! parent id for lookup.

mod edge;
mod node;
mod tree;

pub use edge::{Edge, EdgeState};
pub use node::{HierarchyNode, NodeId, NodeState};
pub use tree::Hierarchy;
