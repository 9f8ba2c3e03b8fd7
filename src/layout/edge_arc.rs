//! Curved parent → child connectors on the cylinder surface.
//!
//! A straight chord between two projected nodes would cut through the inside
//! of the cylinder, so each edge is sampled along the shorter angular path
//! and drawn as a polyline.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use super::cylinder::{cylinder_point, Projection, ProjectedPoint};
use crate::hierarchy::{Edge, Hierarchy, NodeId};

/// Configuration for edge sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeArcConfig {
    /// Sample points per edge (segments = samples - 1). Clamped to at least 2.
    pub samples: usize,
}

impl Default for EdgeArcConfig {
    fn default() -> Self {
        Self { samples: 16 }
    }
}

/// Sampled connector for one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeArc {
    pub edge: Edge,
    pub points: Vec<[f32; 3]>,
}

impl EdgeArc {
    /// The child endpoint; the arc's visibility follows it.
    pub fn child(&self) -> NodeId {
        self.edge.child
    }

    /// Consecutive sample pairs.
    pub fn segments(&self) -> impl Iterator<Item = ([f32; 3], [f32; 3])> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// Signed angular difference folded into `(-π, π]`.
pub fn shortest_angle_diff(from: f32, to: f32) -> f32 {
    let mut diff = (to - from) % TAU;
    if diff > PI {
        diff -= TAU;
    } else if diff <= -PI {
        diff += TAU;
    }
    diff
}

/// Sample `samples` points from `parent` to `child` along the shorter arc,
/// interpolating angle and height linearly.
pub fn sample_arc(
    parent: &ProjectedPoint,
    child: &ProjectedPoint,
    radius: f32,
    samples: usize,
) -> Vec<[f32; 3]> {
    let samples = samples.max(2);
    let angle_diff = shortest_angle_diff(parent.angle, child.angle);
    let last = (samples - 1) as f32;

    (0..samples)
        .map(|i| {
            let t = i as f32 / last;
            let angle = parent.angle + angle_diff * t;
            let y = parent.y + (child.y - parent.y) * t;
            cylinder_point(radius, angle, y)
        })
        .collect()
}

/// Build one arc per hierarchy edge, in child row order.
pub fn build_arcs(tree: &Hierarchy, projection: &Projection, config: &EdgeArcConfig) -> Vec<EdgeArc> {
    tree.edges()
        .map(|edge| EdgeArc {
            edge,
            points: sample_arc(
                &projection.point(edge.parent),
                &projection.point(edge.child),
                projection.radius,
                config.samples,
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn point_at(radius: f32, angle: f32, y: f32) -> ProjectedPoint {
        let [x, y, z] = cylinder_point(radius, angle, y);
        ProjectedPoint { x, y, z, angle, rotation: 0.0 }
    }

    fn angle_of(p: [f32; 3]) -> f32 {
        // Inverse of cylinder_point: x = r sin a, z = -r cos a
        p[0].atan2(-p[2])
    }

    #[test]
    fn test_shortest_angle_diff() {
        assert!((shortest_angle_diff(0.0, FRAC_PI_2) - FRAC_PI_2).abs() < 1e-6);
        assert!((shortest_angle_diff(0.0, 3.0 * FRAC_PI_2) + FRAC_PI_2).abs() < 1e-5);
        assert!((shortest_angle_diff(3.0, -3.0) - (TAU - 6.0)).abs() < 1e-5);
        // Exactly opposite resolves to +π
        assert!((shortest_angle_diff(0.0, PI) - PI).abs() < 1e-6);
        assert!((shortest_angle_diff(0.0, -PI) - PI).abs() < 1e-6);
    }

    #[test]
    fn test_quarter_arc_is_monotonic() {
        let parent = point_at(2.0, 0.0, 6.0);
        let child = point_at(2.0, FRAC_PI_2, 3.5);
        let points = sample_arc(&parent, &child, 2.0, 16);

        assert_eq!(points.len(), 16);
        let angles: Vec<f32> = points.iter().map(|&p| angle_of(p)).collect();
        for pair in angles.windows(2) {
            assert!(pair[1] > pair[0], "angles must increase: {:?}", pair);
        }
        for a in &angles {
            assert!(*a >= -1e-5 && *a <= FRAC_PI_2 + 1e-5, "angle {a} left [0, π/2]");
        }
    }

    #[test]
    fn test_endpoints_and_heights() {
        let parent = point_at(3.0, -1.0, 6.0);
        let child = point_at(3.0, 0.5, 1.0);
        let points = sample_arc(&parent, &child, 3.0, 11);

        let first = points[0];
        let last = points[10];
        assert!((first[0] - parent.x).abs() < 1e-5 && (first[2] - parent.z).abs() < 1e-5);
        assert!((last[0] - child.x).abs() < 1e-5 && (last[2] - child.z).abs() < 1e-5);
        assert!((points[5][1] - 3.5).abs() < 1e-5, "midpoint height interpolated");
        for p in &points {
            assert!(((p[0] * p[0] + p[2] * p[2]).sqrt() - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_wraps_the_short_way() {
        // 170° → -170° is 20° through 180°, not 340° back through 0°
        let a = 170f32.to_radians();
        let b = -170f32.to_radians();
        let points = sample_arc(&point_at(1.0, a, 0.0), &point_at(1.0, b, 0.0), 1.0, 8);
        for p in &points {
            // Every sample stays behind the axis (z > 0 side is angle near π)
            assert!(p[2] > 0.9, "sample {:?} went the long way", p);
        }
    }

    #[test]
    fn test_segment_count_and_clamp() {
        let parent = point_at(1.0, 0.0, 1.0);
        let child = point_at(1.0, 0.2, 0.0);
        let arc = EdgeArc {
            edge: Edge::new(NodeId(0), NodeId(1)),
            points: sample_arc(&parent, &child, 1.0, 16),
        };
        assert_eq!(arc.segment_count(), 15);
        assert_eq!(arc.segments().count(), 15);
        assert_eq!(arc.child(), NodeId(1));

        assert_eq!(sample_arc(&parent, &child, 1.0, 0).len(), 2);
    }
}
