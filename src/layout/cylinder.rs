//! Cylindrical projection of a tidy tree layout.
//!
//! The horizontal extent of the tree is wrapped around the inside of a
//! half-cylinder centered on the viewer; depth stays vertical. Projection runs
//! as three explicit stages, each a pure function of the previous one:
//!
//! 1. [`RankBounds::measure`]: horizontal extent of the layout.
//! 2. [`place`]: angle, cartesian position and facing per node.
//! 3. [`lift`]: one global vertical offset so the lowest node clears the floor.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

use super::tidy_tree::TidyTreeResult;
use crate::hierarchy::NodeId;

/// Configuration for the cylindrical projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CylinderConfig {
    /// Circumference as a multiple of the tree width (1.5 means the tree
    /// spans two thirds of the full circle's circumference).
    pub circumference_ratio: f32,
    /// Height of the root level.
    pub vertical_base: f32,
    /// Minimum gap between the bottom of the lowest node and the floor (`y = 0`).
    pub floor_clearance: f32,
    /// Height of a node box.
    pub node_height: f32,
    /// Angle of the leftmost rank, in radians.
    pub arc_start: f32,
    /// Angle covered from leftmost to rightmost rank, in radians.
    pub arc_sweep: f32,
}

impl Default for CylinderConfig {
    fn default() -> Self {
        Self {
            circumference_ratio: 1.5,
            vertical_base: 6.0,
            floor_clearance: 0.1,
            node_height: 0.8,
            arc_start: -FRAC_PI_2,
            arc_sweep: PI,
        }
    }
}

/// Horizontal extent of a layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankBounds {
    pub min_rank: f32,
    pub max_rank: f32,
    /// `max_rank - min_rank`, never zero.
    pub width: f32,
}

impl RankBounds {
    /// Stage 1: measure the layout.
    ///
    /// A zero-width layout (a single slot) is widened by half a slot on each
    /// side so it projects like a one-slot tree instead of collapsing the
    /// radius to zero.
    pub fn measure(layout: &TidyTreeResult) -> Self {
        let (min_rank, max_rank) = layout.rank_bounds();
        let width = max_rank - min_rank;
        if width.is_finite() && width > f32::EPSILON {
            return Self {
                min_rank,
                max_rank,
                width,
            };
        }

        let center = if min_rank.is_finite() { min_rank } else { 0.0 };
        let half = layout.sibling_separation / 2.0;
        Self {
            min_rank: center - half,
            max_rank: center + half,
            width: layout.sibling_separation,
        }
    }

    /// Rank mapped to `[0, 1]`.
    #[inline]
    pub fn normalize(&self, rank: f32) -> f32 {
        (rank - self.min_rank) / self.width
    }
}

/// Projected position of one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Angle around the cylinder axis, in radians.
    pub angle: f32,
    /// Rotation about the vertical axis, in degrees.
    pub rotation: f32,
}

impl ProjectedPoint {
    #[inline]
    pub fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Distance from the cylinder axis.
    #[inline]
    pub fn axis_distance(&self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }
}

/// Result of the projection.
#[derive(Debug, Clone)]
pub struct Projection {
    /// One point per node, indexed by `NodeId`.
    pub points: Vec<ProjectedPoint>,
    pub radius: f32,
    pub bounds: RankBounds,
    /// Lift applied to every node by the offset stage.
    pub vertical_offset: f32,
}

impl Projection {
    pub fn point(&self, id: NodeId) -> ProjectedPoint {
        self.points[id.index()]
    }
}

/// Point on the cylinder surface for an angle and height.
#[inline]
pub fn cylinder_point(radius: f32, angle: f32, y: f32) -> [f32; 3] {
    [radius * angle.sin(), y, -radius * angle.cos()]
}

/// Rotation (degrees) that turns a node at `(x, z)` to face the axis.
#[inline]
pub fn facing_rotation(x: f32, z: f32) -> f32 {
    x.atan2(z).to_degrees() + 180.0
}

/// The cylindrical projector.
#[derive(Debug, Clone, Default)]
pub struct CylinderProjector {
    config: CylinderConfig,
}

impl CylinderProjector {
    pub fn new(config: CylinderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CylinderConfig {
        &self.config
    }

    /// Run all three stages.
    pub fn project(&self, layout: &TidyTreeResult) -> Projection {
        let bounds = RankBounds::measure(layout);
        let (radius, placed) = place(&self.config, layout, &bounds);
        let (vertical_offset, points) = lift(&self.config, placed);

        tracing::debug!(
            radius,
            width = bounds.width,
            vertical_offset,
            "projected layout onto cylinder"
        );

        Projection {
            points,
            radius,
            bounds,
            vertical_offset,
        }
    }
}

/// Stage 2: radius and unlifted placement of every node.
pub fn place(
    config: &CylinderConfig,
    layout: &TidyTreeResult,
    bounds: &RankBounds,
) -> (f32, Vec<ProjectedPoint>) {
    let circumference = bounds.width * config.circumference_ratio;
    let radius = circumference / TAU;

    let points = layout
        .points
        .iter()
        .map(|p| {
            let angle = config.arc_start + bounds.normalize(p.rank) * config.arc_sweep;
            let y = config.vertical_base - p.depth as f32 * layout.level_separation;
            let [x, y, z] = cylinder_point(radius, angle, y);
            ProjectedPoint {
                x,
                y,
                z,
                angle,
                rotation: facing_rotation(x, z),
            }
        })
        .collect();

    (radius, points)
}

/// Stage 3: lift every node by the smallest amount that keeps the lowest
/// node's bottom face `floor_clearance` above the floor. Never lowers.
pub fn lift(config: &CylinderConfig, mut points: Vec<ProjectedPoint>) -> (f32, Vec<ProjectedPoint>) {
    let lowest = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    if !lowest.is_finite() {
        return (0.0, points);
    }

    let required = config.floor_clearance + config.node_height / 2.0;
    let offset = (required - lowest).max(0.0);
    if offset > 0.0 {
        points.iter_mut().for_each(|p| p.y += offset);
    }
    (offset, points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tidy_tree::LayoutPoint;

    fn layout(points: &[(f32, u32)]) -> TidyTreeResult {
        TidyTreeResult {
            points: points
                .iter()
                .map(|&(rank, depth)| LayoutPoint { rank, depth })
                .collect(),
            sibling_separation: 3.0,
            level_separation: 2.5,
        }
    }

    #[test]
    fn test_radius_from_width() {
        // Width 6 → circumference 9 → radius 9 / 2π
        let result = CylinderProjector::default().project(&layout(&[(3.0, 0), (0.0, 1), (6.0, 1)]));
        assert!((result.radius - 9.0 / TAU).abs() < 1e-5);
        assert_eq!(result.bounds.width, 6.0);
    }

    #[test]
    fn test_all_points_on_cylinder() {
        let result = CylinderProjector::default().project(&layout(&[
            (4.5, 0),
            (0.0, 1),
            (3.0, 2),
            (9.0, 1),
            (6.0, 2),
        ]));
        for p in &result.points {
            assert!(
                (p.axis_distance() - result.radius).abs() < 1e-4,
                "distance {} != radius {}",
                p.axis_distance(),
                result.radius
            );
        }
    }

    #[test]
    fn test_angles_span_half_circle() {
        let result = CylinderProjector::default().project(&layout(&[(1.5, 0), (0.0, 1), (3.0, 1)]));
        assert!((result.points[1].angle + FRAC_PI_2).abs() < 1e-6);
        assert!((result.points[2].angle - FRAC_PI_2).abs() < 1e-6);
        // Centered root lands in front of the axis
        assert!(result.points[0].angle.abs() < 1e-6);
        assert!(result.points[0].x.abs() < 1e-5);
        assert!(result.points[0].z < 0.0);
    }

    #[test]
    fn test_facing_rotation() {
        // Straight ahead (-z): atan2(0, -r) = 180°, plus the half turn
        assert!((facing_rotation(0.0, -1.0) - 360.0).abs() < 1e-4);
        // Right side (+x): 90° + 180°
        assert!((facing_rotation(1.0, 0.0) - 270.0).abs() < 1e-4);
    }

    #[test]
    fn test_single_node_fallback() {
        let result = CylinderProjector::default().project(&layout(&[(0.0, 0)]));
        assert_eq!(result.bounds.width, 3.0);
        assert!(result.radius > 0.0 && result.radius.is_finite());

        let p = result.points[0];
        assert!(p.angle.abs() < 1e-6, "single node should sit at the center");
        assert!(p.x.is_finite() && p.z.is_finite());
    }

    #[test]
    fn test_vertical_levels_without_lift() {
        // Two levels: y = 6 and 3.5, both well above the floor
        let result = CylinderProjector::default().project(&layout(&[(1.5, 0), (0.0, 1), (3.0, 1)]));
        assert_eq!(result.vertical_offset, 0.0);
        assert!((result.points[0].y - 6.0).abs() < 1e-6);
        assert!((result.points[1].y - 3.5).abs() < 1e-6);
    }

    #[test]
    fn test_deep_tree_is_lifted_above_floor() {
        // Depth 5: base y = 6 - 12.5 = -6.5; needs lift of 0.1 + 0.4 + 6.5 = 7.0
        let result =
            CylinderProjector::default().project(&layout(&[(0.0, 0), (0.0, 1), (0.0, 2), (0.0, 3), (0.0, 4), (0.0, 5)]));
        assert!((result.vertical_offset - 7.0).abs() < 1e-5);

        let lowest = result.points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        assert!((lowest - 0.5).abs() < 1e-5);
        // Relative spacing is preserved
        assert!((result.points[0].y - result.points[1].y - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_lift_is_global_and_minimal() {
        let config = CylinderConfig::default();
        let points = vec![
            ProjectedPoint { x: 0.0, y: 0.2, z: 0.0, angle: 0.0, rotation: 0.0 },
            ProjectedPoint { x: 0.0, y: 3.0, z: 0.0, angle: 0.0, rotation: 0.0 },
        ];
        let (offset, lifted) = lift(&config, points);
        assert!((offset - 0.3).abs() < 1e-6);
        assert!((lifted[1].y - 3.3).abs() < 1e-6);
    }
}
