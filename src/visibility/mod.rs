//! Collapse/expand controller.
//!
//! Owns the set of collapsed nodes and the node and edge visibility derived
//! from it. Layout is never recomputed on collapse; only visibility changes.

mod state;

pub use state::{CollapseState, VisibilityState};
