//! Optional diagnostics side channels.
//!
//! Nothing here is required for correctness; search debug capture is off
//! unless a test (or tool) asks for it, and telemetry frames are dropped on
//! the floor when no sink is attached.

use crate::Path;
use serde::Serialize;
use voxelnav_core::BlockPos;

/// Open/closed sets captured from one search, for diagnostics only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchDebug {
    /// Cells discovered but not fully expanded when the search ended.
    pub open: Vec<BlockPos>,
    /// Cells fully expanded during the search.
    pub closed: Vec<BlockPos>,
}

/// One fire-and-forget telemetry frame emitted per navigation tick.
#[derive(Debug, Serialize)]
pub struct NavDebugFrame<'a> {
    /// Tick counter of the owning navigation.
    pub tick: u64,
    /// The live path, if any.
    pub path: Option<&'a Path>,
    /// Waypoint-advance tolerance derived from the agent's width.
    pub tolerance: f64,
}
