//! VROC Org Chart - WASM Module
//!
//! This module turns a flat table of positions into a 3D org chart laid out on
//! the inside of a half-cylinder. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen; the host (A-Frame / three.js)
//! fetches the data, draws the primitives and delivers pointer events.
//!
//! # Architecture
//!
//! - `data`: Row normalization and the CSV row source
//! - `hierarchy`: Arena tree built from parent references, with validation
//! - `layout`: Tidy tree ranks, cylindrical projection, edge arcs
//! - `visibility`: Collapse/expand state and derived node/edge visibility
//! - `spatial`: R-tree spatial indexing for O(log n) picking
//! - `chart`: The loaded chart, render views and event dispatch

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod chart;
pub mod data;
pub mod error;
pub mod hierarchy;
pub mod layout;
pub mod spatial;
pub mod visibility;

pub use chart::{ChartConfig, ChartEvent, NodeDetails, OrgChart, OverlaySink, RenderFrame};
pub use error::{ChartError, Result};

use visibility::CollapseState;

/// Initialize the WASM module: panic messages and `tracing` output go to the
/// browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }
}

fn to_js(err: ChartError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Decode an optional config object; `undefined`/`null` means defaults.
fn parse_config(config: JsValue) -> std::result::Result<ChartConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(ChartConfig::default());
    }
    serde_wasm_bindgen::from_value(config).map_err(|e| to_js(ChartError::Config(e.to_string())))
}

/// Overlay backed by a JS callback `(kind, details) => void`.
#[derive(Default)]
struct JsOverlay {
    callback: Option<js_sys::Function>,
}

impl OverlaySink for JsOverlay {
    fn forward(&mut self, event: &ChartEvent, details: &NodeDetails) {
        let Some(callback) = &self.callback else {
            return;
        };
        let kind = match event {
            ChartEvent::HoverEnter(_) => "hoverenter",
            ChartEvent::HoverExit(_) => "hoverexit",
            ChartEvent::Click(_) => "click",
        };
        let details = match serde_wasm_bindgen::to_value(details) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode node details");
                return;
            }
        };
        if let Err(err) = callback.call2(&JsValue::NULL, &JsValue::from_str(kind), &details) {
            web_sys::console::warn_2(&"vroc: overlay callback threw".into(), &err);
        }
    }
}

/// Main entry point for the org chart.
///
/// This struct wraps the internal OrgChart and provides the public API
/// exposed to JavaScript.
#[wasm_bindgen]
pub struct VrocChart {
    chart: OrgChart,
    overlay: JsOverlay,
}

#[wasm_bindgen]
impl VrocChart {
    /// Load a chart from CSV text (header line + one row per position).
    ///
    /// Throws if the data is malformed or does not form a single tree.
    #[wasm_bindgen(js_name = fromCsv)]
    pub fn from_csv(text: &str, config: JsValue) -> std::result::Result<VrocChart, JsValue> {
        let config = parse_config(config)?;
        let chart = OrgChart::from_csv(text, config).map_err(to_js)?;
        Ok(Self {
            chart,
            overlay: JsOverlay::default(),
        })
    }

    /// Load a chart from an array of `{ PositionID, ParentPositionID, ... }`
    /// objects with string values.
    #[wasm_bindgen(js_name = fromRows)]
    pub fn from_rows(rows: JsValue, config: JsValue) -> std::result::Result<VrocChart, JsValue> {
        let config = parse_config(config)?;
        let rows: Vec<data::Row> = serde_wasm_bindgen::from_value(rows).map_err(|e| {
            to_js(ChartError::DataFormat {
                row: 0,
                message: e.to_string(),
            })
        })?;
        let chart = OrgChart::from_rows(rows, config).map_err(to_js)?;
        Ok(Self {
            chart,
            overlay: JsOverlay::default(),
        })
    }

    /// Get the number of nodes in the chart.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.chart.hierarchy().len() as u32
    }

    /// Radius of the projection cylinder.
    pub fn radius(&self) -> f32 {
        self.chart.radius()
    }

    // =========================================================================
    // Collapse / Expand
    // =========================================================================

    /// Toggle a node. Returns true if the node is now collapsed.
    pub fn toggle(&mut self, position_id: &str) -> std::result::Result<bool, JsValue> {
        self.chart
            .toggle(position_id)
            .map(|state| state == CollapseState::Collapsed)
            .map_err(to_js)
    }

    /// Expand every node.
    #[wasm_bindgen(js_name = expandAll)]
    pub fn expand_all(&mut self) {
        self.chart.expand_all();
    }

    /// Whether no ancestor of the node is collapsed.
    #[wasm_bindgen(js_name = isVisible)]
    pub fn is_visible(&self, position_id: &str) -> std::result::Result<bool, JsValue> {
        self.chart.is_visible(position_id).map_err(to_js)
    }

    #[wasm_bindgen(js_name = isCollapsed)]
    pub fn is_collapsed(&self, position_id: &str) -> std::result::Result<bool, JsValue> {
        self.chart.is_collapsed(position_id).map_err(to_js)
    }

    // =========================================================================
    // Interaction Events
    // =========================================================================

    /// Set the overlay callback `(kind, details) => void` for hover events.
    #[wasm_bindgen(js_name = setOverlayCallback)]
    pub fn set_overlay_callback(&mut self, callback: Option<js_sys::Function>) {
        self.overlay.callback = callback;
    }

    pub fn click(&mut self, position_id: &str) -> std::result::Result<(), JsValue> {
        self.dispatch(ChartEvent::Click(position_id.to_string()))
    }

    #[wasm_bindgen(js_name = hoverEnter)]
    pub fn hover_enter(&mut self, position_id: &str) -> std::result::Result<(), JsValue> {
        self.dispatch(ChartEvent::HoverEnter(position_id.to_string()))
    }

    #[wasm_bindgen(js_name = hoverExit)]
    pub fn hover_exit(&mut self, position_id: &str) -> std::result::Result<(), JsValue> {
        self.dispatch(ChartEvent::HoverExit(position_id.to_string()))
    }

    fn dispatch(&mut self, event: ChartEvent) -> std::result::Result<(), JsValue> {
        self.chart
            .handle_event(&event, &mut self.overlay)
            .map(|_| ())
            .map_err(to_js)
    }

    /// Position id of the nearest visible node within `max_distance`.
    pub fn pick(&self, x: f32, y: f32, z: f32, max_distance: f32) -> Option<String> {
        self.chart
            .pick([x, y, z], max_distance)
            .map(|id| self.chart.hierarchy().node(id).position().position_id.clone())
    }

    // =========================================================================
    // Render Data
    // =========================================================================

    /// Visible nodes, visible edge segments and styling for this frame.
    #[wasm_bindgen(js_name = renderFrame)]
    pub fn render_frame(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.chart.render_frame()).map_err(JsValue::from)
    }

    /// Visible edge segments as [x0, y0, z0, x1, y1, z1, ...].
    #[wasm_bindgen(js_name = segmentBuffer)]
    pub fn segment_buffer(&self) -> Float32Array {
        Float32Array::from(&self.chart.segment_buffer()[..])
    }

    /// Department, work location and image key for the detail overlay.
    pub fn details(&self, position_id: &str) -> std::result::Result<JsValue, JsValue> {
        let details = self.chart.details(position_id).map_err(to_js)?;
        serde_wasm_bindgen::to_value(&details).map_err(JsValue::from)
    }
}
