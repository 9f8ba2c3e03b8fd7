//! Spatial indexing for O(log n) node picking.
//!
//! This module provides an R-tree based spatial index over projected node
//! positions, used to resolve pointer locations to nodes.

mod rtree;

pub use rtree::SpatialIndex;
