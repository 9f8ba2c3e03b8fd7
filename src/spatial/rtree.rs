//! R-tree based spatial index using the rstar crate.
//!
//! Indexes projected node centers in 3D and answers nearest-node queries for
//! pointer picking. Visibility filtering is left to the caller so the index
//! is built once per load.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::hierarchy::NodeId;

/// A point in the spatial index with associated node ID.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePoint {
    /// The node identifier.
    pub id: NodeId,
    /// Projected center.
    pub position: [f32; 3],
}

impl NodePoint {
    /// Create a new NodePoint.
    pub fn new(id: NodeId, position: [f32; 3]) -> Self {
        Self { id, position }
    }
}

impl RTreeObject for NodePoint {
    type Envelope = AABB<[f32; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for NodePoint {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        let dz = self.position[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Spatial index over projected nodes.
///
/// Uses an R*-tree for efficient spatial queries.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: RTree<NodePoint>,
}

impl SpatialIndex {
    /// Bulk load from `(id, position)` pairs.
    pub fn from_points(points: impl IntoIterator<Item = (NodeId, [f32; 3])>) -> Self {
        let node_points: Vec<_> = points
            .into_iter()
            .map(|(id, position)| NodePoint::new(id, position))
            .collect();

        Self {
            tree: RTree::bulk_load(node_points),
        }
    }

    /// Nearest node within `max_distance` that satisfies `accept`.
    ///
    /// Candidates are visited in order of increasing distance.
    pub fn nearest_matching<F>(&self, point: [f32; 3], max_distance: f32, mut accept: F) -> Option<NodeId>
    where
        F: FnMut(NodeId) -> bool,
    {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor_iter_with_distance_2(&point)
            .take_while(|(_, distance_2)| *distance_2 <= max_distance_sq)
            .map(|(p, _)| p.id)
            .find(|&id| accept(id))
    }

    /// Get the number of nodes in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
