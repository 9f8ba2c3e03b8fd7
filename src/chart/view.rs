//! Render-facing snapshots of the chart.

use serde::Serialize;

use crate::hierarchy::NodeId;

/// Everything needed to draw one visible node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub node: NodeId,
    pub position_id: String,
    pub position: [f32; 3],
    /// Rotation about the vertical axis, in degrees.
    pub rotation: f32,
    pub title: String,
    pub name: String,
    /// Two-line label (title, name).
    pub label: String,
    pub scale: f32,
    pub collapsed: bool,
    pub child_count: usize,
}

/// One straight piece of a visible edge arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentView {
    pub start: [f32; 3],
    pub end: [f32; 3],
    /// The edge's child endpoint.
    pub child: NodeId,
}

/// Visible primitives for one draw/update cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub nodes: Vec<NodeView>,
    pub segments: Vec<SegmentView>,
    pub node_size: [f32; 3],
    pub node_color: String,
    pub text_color: String,
    pub edge_color: String,
}

/// Hover/detail overlay data for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetails {
    pub position_id: String,
    pub title: String,
    pub name: String,
    pub department: String,
    pub work_location: String,
    /// External image resource key; by convention the position id.
    pub image_key: String,
}
