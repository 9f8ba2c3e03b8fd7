//! Chart configuration.
//!
//! Every field has a default, so hosts only pass what they want to change.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::layout::{CylinderConfig, EdgeArcConfig, TidyTreeConfig};

/// Visual parameters handed to the renderer with every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartStyle {
    /// Node box `[width, height, depth]`.
    pub node_size: [f32; 3],
    pub node_color: String,
    pub text_color: String,
    pub edge_color: String,
    /// Scale of the node under the pointer.
    pub hover_scale: f32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            node_size: [2.0, 0.8, 0.2],
            node_color: "#4285F4".to_string(),
            text_color: "#FFFFFF".to_string(),
            edge_color: "#999999".to_string(),
            hover_scale: 1.1,
        }
    }
}

/// Full configuration of the load pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub tree: TidyTreeConfig,
    pub cylinder: CylinderConfig,
    pub arcs: EdgeArcConfig,
    pub style: ChartStyle,
}

impl ChartConfig {
    /// Reject values that would make the geometry meaningless.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("tree.siblingSeparation", self.tree.sibling_separation),
            ("tree.levelSeparation", self.tree.level_separation),
            ("cylinder.circumferenceRatio", self.cylinder.circumference_ratio),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ChartError::Config(format!("`{name}` must be positive, got {value}")));
            }
        }
        if !self.cylinder.arc_sweep.is_finite() || !self.cylinder.arc_start.is_finite() {
            return Err(ChartError::Config("arc angles must be finite".to_string()));
        }
        Ok(())
    }
}
