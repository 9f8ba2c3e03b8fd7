//! Tidy tree layout for org chart hierarchies.
//!
//! Produces a `(rank, depth)` pair per node: leaves occupy evenly spaced rank
//! slots, every parent sits at the mean of its children, and sibling subtrees
//! never overlap.
//!
//! # Algorithm Overview
//!
//! 1. **First walk (bottom-up):** Post-order traversal. Leaves take the next
//!    free slot. After each child subtree is placed, its left contour is
//!    compared with the right contour of the siblings already placed (one
//!    extent per depth); if they come closer than the separation, the subtree
//!    is shifted right through its modifier and later slots move with it.
//!    Parents are centered once all of their children are placed.
//! 2. **Second walk (top-down):** Apply accumulated modifiers to turn
//!    preliminary ranks into final ranks.
//!
//! Children are walked in their stored order, so the result is deterministic.

use serde::{Deserialize, Serialize};

use crate::hierarchy::{Hierarchy, NodeId};

/// Shifts below this are float noise from centering, not real overlap.
const SHIFT_EPSILON: f32 = 1e-4;

/// Configuration for the tidy tree layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TidyTreeConfig {
    /// Rank distance between adjacent leaves (and minimum distance between
    /// any two nodes on the same level).
    pub sibling_separation: f32,
    /// Vertical spacing between tree levels.
    pub level_separation: f32,
}

impl Default for TidyTreeConfig {
    fn default() -> Self {
        Self {
            sibling_separation: 3.0,
            level_separation: 2.5,
        }
    }
}

/// Layout coordinate of one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutPoint {
    /// Horizontal position.
    pub rank: f32,
    /// Tree depth (root = 0).
    pub depth: u32,
}

/// Result of the tidy tree layout computation.
#[derive(Debug, Clone)]
pub struct TidyTreeResult {
    /// One point per node, indexed by `NodeId`.
    pub points: Vec<LayoutPoint>,
    /// Separation the layout was computed with.
    pub sibling_separation: f32,
    /// Level spacing the layout was computed with.
    pub level_separation: f32,
}

impl TidyTreeResult {
    pub fn point(&self, id: NodeId) -> LayoutPoint {
        self.points[id.index()]
    }

    /// Vertical distance of a node below the root level.
    pub fn level_offset(&self, id: NodeId) -> f32 {
        self.points[id.index()].depth as f32 * self.level_separation
    }

    /// Smallest and largest rank.
    pub fn rank_bounds(&self) -> (f32, f32) {
        self.points.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(min, max), p| (min.min(p.rank), max.max(p.rank)),
        )
    }
}

/// Per-depth horizontal extent of a placed subtree.
///
/// Levels are stored deepest first, so the subtree root is the last entry and
/// putting a parent on top is a push. Stored values are relative to `offset`,
/// which makes shifting a whole subtree O(1).
#[derive(Debug, Clone)]
struct Contour {
    left: Vec<f32>,
    right: Vec<f32>,
    offset: f32,
}

impl Contour {
    fn single(rank: f32) -> Self {
        Self {
            left: vec![rank],
            right: vec![rank],
            offset: 0.0,
        }
    }

    fn depth(&self) -> usize {
        self.left.len()
    }

    fn shift(&mut self, amount: f32) {
        self.offset += amount;
    }

    /// Minimum shift that keeps `next` at least `separation` right of `self`
    /// on every shared level.
    fn separation(&self, next: &Contour, separation: f32) -> f32 {
        self.right
            .iter()
            .rev()
            .zip(next.left.iter().rev())
            .map(|(right, left)| (right + self.offset) + separation - (left + next.offset))
            .fold(0.0, f32::max)
    }

    /// Fold a subtree placed to the right of `self` into the extents.
    ///
    /// The shorter contour is folded into the longer one, so a merge costs
    /// the number of shared levels.
    fn merge(&mut self, mut next: Contour) {
        if next.depth() > self.depth() {
            std::mem::swap(self, &mut next);
        }
        let delta = next.offset - self.offset;
        let base = self.depth() - next.depth();
        let levels = next.left.iter().zip(&next.right).enumerate();
        for (i, (left, right)) in levels {
            let slot = base + i;
            self.left[slot] = self.left[slot].min(left + delta);
            self.right[slot] = self.right[slot].max(right + delta);
        }
    }

    /// Put a parent at `rank` on top of the merged children.
    fn above(rank: f32, mut children: Contour) -> Self {
        children.left.push(rank - children.offset);
        children.right.push(rank - children.offset);
        children
    }
}

/// A node whose children are still being placed by the first walk.
struct Frame {
    node: NodeId,
    /// Index of the next child to descend into.
    next: usize,
    /// Merged contour of the children placed so far.
    placed: Option<Contour>,
}

impl Frame {
    fn new(node: NodeId) -> Self {
        Self {
            node,
            next: 0,
            placed: None,
        }
    }
}

/// Mutable state of one layout run, in Structure of Arrays form.
struct Walk<'a> {
    tree: &'a Hierarchy,
    separation: f32,
    /// Preliminary rank (from first walk).
    prelim: Vec<f32>,
    /// Shift applied to the node's descendants in the second walk.
    modifier: Vec<f32>,
    /// Rank of the next free leaf slot.
    next_slot: f32,
}

/// The tidy tree layout engine.
#[derive(Debug, Clone, Default)]
pub struct TidyTreeLayout {
    config: TidyTreeConfig,
}

impl TidyTreeLayout {
    /// Create a new tidy tree layout with the given configuration.
    pub fn new(config: TidyTreeConfig) -> Self {
        Self { config }
    }

    /// Create a tidy tree layout with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TidyTreeConfig::default())
    }

    pub fn config(&self) -> &TidyTreeConfig {
        &self.config
    }

    /// Compute `(rank, depth)` for every node of the hierarchy.
    pub fn compute(&self, tree: &Hierarchy) -> TidyTreeResult {
        let separation = self.config.sibling_separation.max(f32::EPSILON);
        let mut walk = Walk {
            tree,
            separation,
            prelim: vec![0.0; tree.len()],
            modifier: vec![0.0; tree.len()],
            next_slot: 0.0,
        };

        let root = tree.root();
        walk.first_walk(root);

        let mut points = vec![LayoutPoint { rank: 0.0, depth: 0 }; tree.len()];
        walk.second_walk(root, &mut points);

        tracing::debug!(
            nodes = points.len(),
            slots = walk.next_slot / separation,
            "tidy tree layout computed"
        );

        TidyTreeResult {
            points,
            sibling_separation: separation,
            level_separation: self.config.level_separation,
        }
    }
}

impl Walk<'_> {
    /// Bottom-up assignment of preliminary ranks, in post-order.
    fn first_walk(&mut self, root: NodeId) {
        let tree = self.tree;
        let mut stack = vec![Frame::new(root)];
        let mut finished: Option<Contour> = None;

        while let Some(frame) = stack.last_mut() {
            if let Some(contour) = finished.take() {
                let child = tree.node(frame.node).children()[frame.next - 1];
                self.place_child(&mut frame.placed, child, contour);
            }

            if let Some(&child) = tree.node(frame.node).children().get(frame.next) {
                frame.next += 1;
                stack.push(Frame::new(child));
            } else if let Some(done) = stack.pop() {
                finished = Some(self.finish(done));
            }
        }
    }

    /// Merge a finished child subtree into its siblings, shifting it right
    /// if it comes too close.
    fn place_child(&mut self, placed: &mut Option<Contour>, child: NodeId, mut contour: Contour) {
        match placed.as_mut() {
            None => *placed = Some(contour),
            Some(placed) => {
                let shift = placed.separation(&contour, self.separation);
                if shift > SHIFT_EPSILON {
                    self.prelim[child.index()] += shift;
                    self.modifier[child.index()] += shift;
                    self.next_slot += shift;
                    contour.shift(shift);
                }
                placed.merge(contour);
            }
        }
    }

    /// Rank a node once all of its children are placed. Returns its contour.
    fn finish(&mut self, frame: Frame) -> Contour {
        let v = frame.node;
        let Some(below) = frame.placed else {
            let rank = self.next_slot;
            self.prelim[v.index()] = rank;
            self.next_slot += self.separation;
            return Contour::single(rank);
        };

        // Center over the children
        let children = self.tree.node(v).children();
        let sum: f32 = children.iter().map(|c| self.prelim[c.index()]).sum();
        let rank = sum / children.len() as f32;
        self.prelim[v.index()] = rank;
        Contour::above(rank, below)
    }

    /// Top-down application of accumulated modifiers.
    fn second_walk(&self, root: NodeId, points: &mut [LayoutPoint]) {
        let mut stack = vec![(root, 0.0_f32)];
        while let Some((v, modifier_sum)) = stack.pop() {
            let node = self.tree.node(v);
            points[v.index()] = LayoutPoint {
                rank: self.prelim[v.index()] + modifier_sum,
                depth: node.depth(),
            };

            let child_sum = modifier_sum + self.modifier[v.index()];
            stack.extend(node.children().iter().map(|&child| (child, child_sum)));
        }
    }
}
