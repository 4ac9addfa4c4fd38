//! A single searchable grid cell with its cost metadata.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use voxelnav_core::{BlockPos, PathType};

/// One searchable grid cell: coordinate, classification, and traversal malus.
///
/// A node's coordinate uniquely identifies it within one search; type and
/// malus are assigned once by the evaluator at expansion time and only change
/// through explicit path post-processing ([`crate::Path::replace_node`]).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Node {
    /// Grid cell coordinate.
    pub pos: BlockPos,
    /// Terrain classification baked in at creation.
    pub path_type: PathType,
    /// Traversal penalty; negative forbids the cell.
    pub cost_malus: f32,
}

impl Node {
    /// Create a node at `pos` with the given classification and malus.
    pub fn new(pos: BlockPos, path_type: PathType, cost_malus: f32) -> Self {
        Self {
            pos,
            path_type,
            cost_malus,
        }
    }

    /// Euclidean distance to another node.
    pub fn distance_to(&self, other: &Node) -> f32 {
        self.pos.distance(other.pos) as f32
    }

    /// Euclidean distance to a raw grid position.
    pub fn distance_to_pos(&self, pos: BlockPos) -> f32 {
        self.pos.distance(pos) as f32
    }

    /// Manhattan distance to another node.
    pub fn manhattan_to(&self, other: &Node) -> i32 {
        self.pos.manhattan(other.pos)
    }

    /// Copy of this node at a new coordinate, preserving type and malus.
    ///
    /// Used by terrain-driven path correction (basin step-up).
    pub fn cloned_move_to(&self, pos: BlockPos) -> Self {
        Self { pos, ..*self }
    }
}

// Identity is the coordinate; type and malus are derived data.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pos.hash(state);
    }
}
