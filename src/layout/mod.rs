//! Layout pipeline for org charts.
//!
//! This module computes every geometric parameter the renderer needs, in
//! strictly forward order: tidy tree ranks, then the cylindrical projection,
//! then the sampled edge arcs. Results are computed once per load.

pub mod cylinder;
pub mod edge_arc;
pub mod tidy_tree;

pub use cylinder::{CylinderConfig, CylinderProjector, ProjectedPoint, Projection, RankBounds};
pub use edge_arc::{EdgeArc, EdgeArcConfig};
pub use tidy_tree::{LayoutPoint, TidyTreeConfig, TidyTreeLayout, TidyTreeResult};
