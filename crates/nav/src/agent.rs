//! Agent-facing collaborator surfaces: state snapshot in, movement intent out.

use glam::DVec3;
use serde::Serialize;
use voxelnav_core::{Aabb, BlockPos};

/// Snapshot of the navigating agent consumed each tick.
///
/// Navigation never mutates the agent; the host simulation applies the
/// returned [`MoveIntent`] through its own motion controller.
#[derive(Debug, Clone, Copy)]
pub struct AgentState {
    /// Feet position in continuous space.
    pub pos: DVec3,
    /// Bounding-box width (X/Z extent).
    pub width: f64,
    /// Bounding-box height.
    pub height: f64,
    /// Base movement speed in blocks per tick.
    pub speed: f64,
    /// Whether the agent currently stands on solid ground.
    pub on_ground: bool,
    /// Whether the agent is currently in water.
    pub in_water: bool,
    /// Whether the agent is riding something and cannot steer itself.
    pub mounted: bool,
}

impl AgentState {
    /// The grid cell containing the agent's feet.
    pub fn feet_block(&self) -> BlockPos {
        BlockPos::containing(self.pos)
    }

    /// The agent's collision box.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_agent(self.pos, self.width, self.height)
    }

    /// Center of the agent's body.
    pub fn center(&self) -> DVec3 {
        self.pos + DVec3::new(0.0, self.height / 2.0, 0.0)
    }
}

/// Desired-position intent handed to the agent's motion controller each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoveIntent {
    /// Target position in continuous space.
    pub target: [f64; 3],
    /// Speed multiplier relative to the agent's base speed attribute.
    pub speed: f64,
}

impl MoveIntent {
    pub(crate) fn new(target: DVec3, speed: f64) -> Self {
        Self {
            target: [target.x, target.y, target.z],
            speed,
        }
    }

    /// Target as a vector.
    pub fn target_vec(&self) -> DVec3 {
        DVec3::from_array(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feet_block_floors_the_position() {
        let agent = AgentState {
            pos: DVec3::new(2.7, 0.0, -0.3),
            width: 0.6,
            height: 1.8,
            speed: 0.25,
            on_ground: true,
            in_water: false,
            mounted: false,
        };
        assert_eq!(agent.feet_block(), BlockPos::new(2, 0, -1));
    }
}
