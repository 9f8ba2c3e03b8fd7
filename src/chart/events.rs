//! Decoded interaction events and the overlay they are forwarded to.

use super::view::NodeDetails;
use crate::visibility::CollapseState;

/// Pointer events delivered by the host, keyed by position id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartEvent {
    HoverEnter(String),
    HoverExit(String),
    Click(String),
}

impl ChartEvent {
    pub fn position_id(&self) -> &str {
        match self {
            Self::HoverEnter(id) | Self::HoverExit(id) | Self::Click(id) => id,
        }
    }
}

/// What the chart did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// A click toggled the node into this state.
    Toggled(CollapseState),
    /// A hover event was handed to the overlay.
    Forwarded,
}

/// Receiver for hover events (the detail overlay).
pub trait OverlaySink {
    /// Called with the unmodified event and the node's detail data.
    fn forward(&mut self, event: &ChartEvent, details: &NodeDetails);
}

impl<F> OverlaySink for F
where
    F: FnMut(&ChartEvent, &NodeDetails),
{
    fn forward(&mut self, event: &ChartEvent, details: &NodeDetails) {
        self(event, details)
    }
}
