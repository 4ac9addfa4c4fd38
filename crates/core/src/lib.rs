#![warn(missing_docs)]
//! Core primitives shared across the workspace.

mod aabb;
mod path_type;
mod pos;
mod terrain;
mod window;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use aabb::Aabb;
pub use path_type::{FluidMode, PathType, MALUS_IMPASSABLE};
pub use pos::BlockPos;
pub use terrain::TerrainQuery;
pub use window::TerrainWindow;

/// Fixed tick type (20 TPS => 50 ms per tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Errors raised by terrain-window construction and bounds checks.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested window does not intersect the terrain bounds.
    #[error("terrain window around {center} (radius {radius}) lies outside the world")]
    EmptyWindow {
        /// Requested window center.
        center: BlockPos,
        /// Requested window radius in blocks.
        radius: i32,
    },
    /// A position lies outside the terrain bounds.
    #[error("position {pos} outside world bounds")]
    OutOfBounds {
        /// The offending position.
        pos: BlockPos,
    },
}
