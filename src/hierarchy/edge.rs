//! Edge type and related structures.
//!
//! Every non-root node has exactly one incoming edge, so an edge is keyed by
//! its child endpoint.

use std::fmt;

use super::node::NodeId;

/// A parent → child connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
}

impl Edge {
    #[inline]
    pub fn new(parent: NodeId, child: NodeId) -> Self {
        Self { parent, child }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({} -> {})", self.parent.0, self.child.0)
    }
}

/// Edge state flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeState {
    flags: u8,
}

impl EdgeState {
    const HIDDEN: u8 = 0b0000_0001;

    /// Create a new default edge state.
    #[inline]
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    /// Check if the edge is hidden.
    #[inline]
    pub fn is_hidden(self) -> bool {
        self.flags & Self::HIDDEN != 0
    }

    /// Set the hidden state.
    #[inline]
    pub fn set_hidden(&mut self, hidden: bool) {
        if hidden {
            self.flags |= Self::HIDDEN;
        } else {
            self.flags &= !Self::HIDDEN;
        }
    }
}
