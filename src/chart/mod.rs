//! OrgChart - the loaded chart and its interactive state.
//!
//! Loading runs the whole pipeline in one pass (rows → positions → hierarchy
//! → tidy tree → cylinder → arcs) and either yields a complete chart or the
//! first error. After loading, geometry is immutable; only the visibility
//! state changes in response to events.

mod config;
mod events;
mod view;

pub use config::{ChartConfig, ChartStyle};
pub use events::{ChartEvent, EventOutcome, OverlaySink};
pub use view::{NodeDetails, NodeView, RenderFrame, SegmentView};

use crate::data::{normalize_rows, parse_csv, Position, Row};
use crate::error::{ChartError, Result};
use crate::hierarchy::{Hierarchy, NodeId};
use crate::layout::edge_arc::build_arcs;
use crate::layout::{
    CylinderProjector, EdgeArc, Projection, TidyTreeLayout, TidyTreeResult,
};
use crate::spatial::SpatialIndex;
use crate::visibility::{CollapseState, VisibilityState};

/// A fully laid out org chart.
#[derive(Debug, Clone)]
pub struct OrgChart {
    config: ChartConfig,
    hierarchy: Hierarchy,
    layout: TidyTreeResult,
    projection: Projection,
    /// One arc per edge, in child row order.
    arcs: Vec<EdgeArc>,
    visibility: VisibilityState,
    /// Spatial index for picking
    spatial: SpatialIndex,
}

impl OrgChart {
    /// Load from delimited text with a header line.
    pub fn from_csv(text: &str, config: ChartConfig) -> Result<Self> {
        let rows = parse_csv(text)?;
        Self::from_rows(rows, config)
    }

    /// Load from decoded rows.
    pub fn from_rows<I>(rows: I, config: ChartConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Row>,
    {
        let positions = normalize_rows(rows)?;
        Self::from_positions(positions, config)
    }

    /// Load from already normalized positions.
    pub fn from_positions(positions: Vec<Position>, config: ChartConfig) -> Result<Self> {
        config.validate()?;

        let hierarchy = Hierarchy::build(positions)?;
        let layout = TidyTreeLayout::new(config.tree.clone()).compute(&hierarchy);
        let projection = CylinderProjector::new(config.cylinder.clone()).project(&layout);
        let arcs = build_arcs(&hierarchy, &projection, &config.arcs);
        let visibility = VisibilityState::new(&hierarchy);
        let spatial = SpatialIndex::from_points(
            projection
                .points
                .iter()
                .enumerate()
                .map(|(i, p)| (NodeId(i as u32), p.position())),
        );

        tracing::info!(
            nodes = hierarchy.len(),
            edges = arcs.len(),
            indexed = spatial.len(),
            radius = projection.radius,
            "org chart loaded"
        );

        Ok(Self {
            config,
            hierarchy,
            layout,
            projection,
            arcs,
            visibility,
            spatial,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn layout(&self) -> &TidyTreeResult {
        &self.layout
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn arcs(&self) -> &[EdgeArc] {
        &self.arcs
    }

    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    pub fn radius(&self) -> f32 {
        self.projection.radius
    }

    /// Resolve a host-side position id through the chart's registry.
    pub fn resolve(&self, position_id: &str) -> Result<NodeId> {
        self.hierarchy
            .find(position_id)
            .ok_or_else(|| ChartError::UnknownNode(position_id.to_string()))
    }

    // =========================================================================
    // Collapse / Expand
    // =========================================================================

    /// Flip a node between expanded and collapsed.
    pub fn toggle(&mut self, position_id: &str) -> Result<CollapseState> {
        let id = self.resolve(position_id)?;
        Ok(self.visibility.toggle(&self.hierarchy, id))
    }

    pub fn expand_all(&mut self) {
        self.visibility.expand_all();
    }

    pub fn is_visible(&self, position_id: &str) -> Result<bool> {
        self.resolve(position_id).map(|id| self.visibility.is_visible(id))
    }

    pub fn is_collapsed(&self, position_id: &str) -> Result<bool> {
        self.resolve(position_id).map(|id| self.visibility.is_collapsed(id))
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Dispatch one decoded pointer event.
    ///
    /// Clicks toggle the node; hover events update the hover flag and are
    /// forwarded unmodified to the overlay together with the node's details.
    pub fn handle_event(
        &mut self,
        event: &ChartEvent,
        overlay: &mut dyn OverlaySink,
    ) -> Result<EventOutcome> {
        let id = self.resolve(event.position_id())?;
        match event {
            ChartEvent::Click(_) => {
                let state = self.visibility.toggle(&self.hierarchy, id);
                Ok(EventOutcome::Toggled(state))
            }
            ChartEvent::HoverEnter(_) | ChartEvent::HoverExit(_) => {
                let entering = matches!(event, ChartEvent::HoverEnter(_));
                self.visibility.set_hovered(id, entering);
                overlay.forward(event, &self.node_details(id));
                Ok(EventOutcome::Forwarded)
            }
        }
    }

    /// Nearest visible node within `max_distance` of a 3D point.
    pub fn pick(&self, point: [f32; 3], max_distance: f32) -> Option<NodeId> {
        self.spatial
            .nearest_matching(point, max_distance, |id| self.visibility.is_visible(id))
    }

    // =========================================================================
    // Render Views
    // =========================================================================

    /// Department, location and image key for the detail overlay.
    pub fn details(&self, position_id: &str) -> Result<NodeDetails> {
        self.resolve(position_id).map(|id| self.node_details(id))
    }

    fn node_details(&self, id: NodeId) -> NodeDetails {
        let position = self.hierarchy.node(id).position();
        NodeDetails {
            position_id: position.position_id.clone(),
            title: position.title().to_string(),
            name: position.name().to_string(),
            department: position.department().to_string(),
            work_location: position.work_location().to_string(),
            image_key: position.position_id.clone(),
        }
    }

    /// Render data for one node, regardless of its visibility.
    pub fn node_view(&self, id: NodeId) -> NodeView {
        let node = self.hierarchy.node(id);
        let position = node.position();
        let point = self.projection.point(id);
        let state = self.visibility.node_state(id);

        NodeView {
            node: id,
            position_id: position.position_id.clone(),
            position: point.position(),
            rotation: point.rotation,
            title: position.title().to_string(),
            name: position.name().to_string(),
            label: position.label(),
            scale: if state.is_hovered() {
                self.config.style.hover_scale
            } else {
                1.0
            },
            collapsed: state.is_collapsed(),
            child_count: node.children().len(),
        }
    }

    /// Visible nodes (parents first) and visible edge segments.
    pub fn render_frame(&self) -> RenderFrame {
        let nodes = self
            .hierarchy
            .preorder()
            .into_iter()
            .filter(|&id| self.visibility.is_visible(id))
            .map(|id| self.node_view(id))
            .collect();

        let segments = self
            .visible_arcs()
            .flat_map(|arc| {
                let child = arc.child();
                arc.segments()
                    .map(move |(start, end)| SegmentView { start, end, child })
            })
            .collect();

        let style = &self.config.style;
        RenderFrame {
            nodes,
            segments,
            node_size: style.node_size,
            node_color: style.node_color.clone(),
            text_color: style.text_color.clone(),
            edge_color: style.edge_color.clone(),
        }
    }

    /// Visible segments as `[x0, y0, z0, x1, y1, z1, ...]` for line buffers.
    pub fn segment_buffer(&self) -> Vec<f32> {
        let mut buffer = Vec::new();
        for arc in self.visible_arcs() {
            for (start, end) in arc.segments() {
                buffer.extend_from_slice(&start);
                buffer.extend_from_slice(&end);
            }
        }
        buffer
    }

    fn visible_arcs(&self) -> impl Iterator<Item = &EdgeArc> + '_ {
        self.arcs
            .iter()
            .filter(|arc| self.visibility.is_edge_visible(arc.child()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
PositionID,ParentPositionID,JobTitle,FullName,Department,WorkLocation
1,,CEO,Grace Hopper,Executive,HQ
2,1,CTO,Alan Turing,Engineering,Lab
3,1,CFO,,Finance,
4,2,Engineer,Ada Lovelace,Engineering,Remote
5,2,Engineer,,Engineering,Remote
";

    fn sample() -> OrgChart {
        OrgChart::from_csv(SAMPLE_CSV, ChartConfig::default()).unwrap()
    }

    fn three_nodes() -> OrgChart {
        OrgChart::from_positions(
            vec![
                Position::new("R", None),
                Position::new("A", Some("R")),
                Position::new("B", Some("R")),
            ],
            ChartConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_three_record_scenario() {
        let mut chart = three_nodes();
        let tree = chart.hierarchy();
        assert_eq!(tree.node(tree.root()).position().position_id, "R");

        let a = chart.resolve("A").unwrap();
        let b = chart.resolve("B").unwrap();
        assert_eq!(chart.layout().point(a).depth, 1);
        assert_eq!(chart.layout().point(b).depth, 1);
        assert!(chart.layout().point(a).rank < chart.layout().point(b).rank);

        assert_eq!(chart.arcs().len(), 2);
        let frame = chart.render_frame();
        assert_eq!(frame.nodes.len(), 3);
        assert_eq!(frame.segments.len(), 2 * 15);

        assert_eq!(chart.toggle("R").unwrap(), CollapseState::Collapsed);
        let frame = chart.render_frame();
        assert_eq!(frame.nodes.len(), 1);
        assert!(frame.segments.is_empty());
        assert!(!chart.is_visible("A").unwrap());
        assert!(!chart.is_visible("B").unwrap());

        assert_eq!(chart.toggle("R").unwrap(), CollapseState::Expanded);
        let frame = chart.render_frame();
        assert_eq!(frame.nodes.len(), 3);
        assert_eq!(frame.segments.len(), 30);
    }

    #[test]
    fn test_dangling_parent_produces_no_chart() {
        let err = OrgChart::from_positions(
            vec![Position::new("R", None), Position::new("A", Some("missing"))],
            ChartConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::DanglingParent { .. }));
    }

    #[test]
    fn test_missing_field_aborts_load() {
        let err = OrgChart::from_csv("PositionID\n1\n", ChartConfig::default()).unwrap_err();
        assert!(matches!(err, ChartError::DataFormat { row: 0, .. }));
    }

    #[test]
    fn test_invalid_config_aborts_load() {
        let mut config = ChartConfig::default();
        config.tree.level_separation = -1.0;
        assert!(matches!(
            OrgChart::from_csv(SAMPLE_CSV, config),
            Err(ChartError::Config(_))
        ));
    }

    #[test]
    fn test_nodes_on_cylinder_and_arcs_connect_endpoints() {
        let chart = sample();
        let radius = chart.radius();
        for p in &chart.projection().points {
            assert!((p.axis_distance() - radius).abs() < 1e-4);
        }

        for arc in chart.arcs() {
            let parent = chart.projection().point(arc.edge.parent).position();
            let child = chart.projection().point(arc.child()).position();
            let first = arc.points[0];
            let last = arc.points[arc.points.len() - 1];
            for k in 0..3 {
                assert!((first[k] - parent[k]).abs() < 1e-4);
                assert!((last[k] - child[k]).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_details_and_placeholders() {
        let chart = sample();
        let details = chart.details("3").unwrap();
        assert_eq!(details.title, "CFO");
        assert_eq!(details.name, "No Name");
        assert_eq!(details.department, "Finance");
        assert_eq!(details.work_location, "No Location");
        assert_eq!(details.image_key, "3");

        assert_eq!(
            chart.details("99").unwrap_err(),
            ChartError::UnknownNode("99".into())
        );
    }

    #[test]
    fn test_click_toggles_and_hover_forwards() {
        let mut chart = sample();
        let mut forwarded: Vec<(ChartEvent, String)> = Vec::new();
        let mut overlay = |event: &ChartEvent, details: &NodeDetails| {
            forwarded.push((event.clone(), details.department.clone()));
        };

        let outcome = chart
            .handle_event(&ChartEvent::Click("2".into()), &mut overlay)
            .unwrap();
        assert_eq!(outcome, EventOutcome::Toggled(CollapseState::Collapsed));
        assert!(!chart.is_visible("4").unwrap());
        assert!(chart.is_visible("3").unwrap());

        let enter = ChartEvent::HoverEnter("3".into());
        assert_eq!(
            chart.handle_event(&enter, &mut overlay).unwrap(),
            EventOutcome::Forwarded
        );
        let hovered = chart.resolve("3").unwrap();
        assert!((chart.node_view(hovered).scale - 1.1).abs() < 1e-6);

        chart
            .handle_event(&ChartEvent::HoverExit("3".into()), &mut overlay)
            .unwrap();
        assert_eq!(chart.node_view(hovered).scale, 1.0);

        assert!(
            chart
                .handle_event(&ChartEvent::Click("nope".into()), &mut overlay)
                .is_err()
        );

        drop(overlay);
        assert_eq!(forwarded.len(), 2);
        assert_eq!(forwarded[0], (enter, "Finance".to_string()));
    }

    #[test]
    fn test_collapsed_flag_in_view() {
        let mut chart = sample();
        chart.toggle("2").unwrap();
        let frame = chart.render_frame();
        let cto = frame.nodes.iter().find(|n| n.position_id == "2").unwrap();
        assert!(cto.collapsed);
        assert_eq!(cto.child_count, 2);
        assert_eq!(cto.label, "CTO\nAlan Turing");
        assert!(frame.nodes.iter().all(|n| n.position_id != "4" && n.position_id != "5"));
        // Edges 1→2 and 1→3 remain
        assert_eq!(frame.segments.len(), 2 * 15);
        assert_eq!(chart.segment_buffer().len(), 2 * 15 * 6);

        chart.expand_all();
        assert_eq!(chart.render_frame().nodes.len(), 5);
    }

    #[test]
    fn test_pick_skips_hidden_nodes() {
        let mut chart = sample();
        let engineer = chart.resolve("4").unwrap();
        let at = chart.projection().point(engineer).position();
        assert_eq!(chart.pick(at, 0.5), Some(engineer));

        chart.toggle("2").unwrap();
        assert_ne!(chart.pick(at, 0.5), Some(engineer));
    }

    #[test]
    fn test_whitespace_line_does_not_abort_load() {
        let chart = OrgChart::from_csv(
            "PositionID,ParentPositionID\n1,\n   \n2,1\n",
            ChartConfig::default(),
        )
        .unwrap();
        assert_eq!(chart.hierarchy().len(), 2);
        assert_eq!(chart.arcs().len(), 1);
    }

    #[test]
    fn test_single_node_chart() {
        let chart = OrgChart::from_csv("PositionID,ParentPositionID\nonly,\n", ChartConfig::default())
            .unwrap();
        assert!(chart.radius() > 0.0);
        assert!(chart.arcs().is_empty());
        let frame = chart.render_frame();
        assert_eq!(frame.nodes.len(), 1);
        assert!(frame.nodes[0].position.iter().all(|v| v.is_finite()));
    }
}
