//! Locomotion strategies: one family of navigators, several behaviors.
//!
//! Instead of a subclass per movement style, the mode-specific predicates live
//! here as data selected at agent construction time and consulted by both the
//! node evaluator and the navigation state machine.

use crate::AgentState;
use bitflags::bitflags;
use glam::DVec3;
use voxelnav_core::{BlockPos, FluidMode, TerrainQuery};

bitflags! {
    /// Capability toggles consumed by neighbor expansion and path following.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MobilityFlags: u8 {
        /// Stays afloat instead of sinking; water does not gate path updates.
        const CAN_FLOAT = 1 << 0;
        /// May walk through doors that stand open.
        const CAN_PASS_DOORS = 1 << 1;
        /// May path through closed wooden doors (opens them on contact).
        const CAN_OPEN_DOORS = 1 << 2;
        /// Refuses to enter water cells at all.
        const AVOIDS_WATER = 1 << 3;
        /// Refuses to enter burning or fire-adjacent cells at all.
        const AVOIDS_FIRE = 1 << 4;
    }
}

/// Movement style of the navigating agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobilityMode {
    /// Walks on surfaces, steps up one block, falls a bounded distance.
    Ground,
    /// Moves through any open cell in three dimensions.
    Flying,
    /// Moves through water cells; cannot leave the liquid.
    Swimming,
    /// Ground rules plus vertical movement along solid faces.
    WallClimbing,
}

/// The full locomotion strategy for one agent.
#[derive(Debug, Clone, Copy)]
pub struct Locomotion {
    /// Movement style.
    pub mode: MobilityMode,
    /// Capability toggles.
    pub flags: MobilityFlags,
    /// Maximum number of blocks a ground agent will drop off an edge.
    pub max_fall: i32,
}

impl Locomotion {
    /// Ground walker with sensible defaults.
    pub fn ground() -> Self {
        Self {
            mode: MobilityMode::Ground,
            flags: MobilityFlags::CAN_PASS_DOORS,
            max_fall: 3,
        }
    }

    /// Free flyer.
    pub fn flying() -> Self {
        Self {
            mode: MobilityMode::Flying,
            flags: MobilityFlags::CAN_PASS_DOORS,
            max_fall: 0,
        }
    }

    /// Water-bound swimmer.
    pub fn swimming() -> Self {
        Self {
            mode: MobilityMode::Swimming,
            flags: MobilityFlags::CAN_FLOAT,
            max_fall: 0,
        }
    }

    /// Wall climber (spider-style).
    pub fn wall_climbing() -> Self {
        Self {
            mode: MobilityMode::WallClimbing,
            flags: MobilityFlags::CAN_PASS_DOORS,
            max_fall: 3,
        }
    }

    /// Add capability flags, builder-style.
    pub fn with_flags(mut self, flags: MobilityFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Whether this tick permits proper path following.
    pub fn can_update_path(&self, agent: &AgentState) -> bool {
        if agent.mounted {
            return false;
        }
        match self.mode {
            MobilityMode::Ground | MobilityMode::WallClimbing => {
                agent.on_ground
                    || agent.in_water && self.flags.contains(MobilityFlags::CAN_FLOAT)
            }
            MobilityMode::Flying => true,
            MobilityMode::Swimming => agent.in_water,
        }
    }

    /// Position used for stuck/progress comparisons.
    pub fn progress_pos(&self, agent: &AgentState, terrain: &impl TerrainQuery) -> DVec3 {
        match self.mode {
            MobilityMode::Ground | MobilityMode::WallClimbing => {
                let floor = terrain.floor_height(agent.feet_block());
                DVec3::new(agent.pos.x, floor, agent.pos.z)
            }
            MobilityMode::Swimming => agent.center(),
            MobilityMode::Flying => agent.pos,
        }
    }

    /// Fluid policy for straight-line traversability checks.
    pub fn fluid_mode(&self) -> FluidMode {
        match self.mode {
            MobilityMode::Swimming => FluidMode::Any,
            MobilityMode::Ground | MobilityMode::WallClimbing
                if self.flags.contains(MobilityFlags::CAN_FLOAT) =>
            {
                FluidMode::Water
            }
            _ => FluidMode::None,
        }
    }

    /// Straight-line traversability check used by corner cutting.
    pub fn can_move_directly(
        &self,
        from: DVec3,
        to: DVec3,
        agent: &AgentState,
        terrain: &impl TerrainQuery,
    ) -> bool {
        terrain.clear_line(from, to, agent.width / 2.0, self.fluid_mode())
    }

    /// Whether a candidate goal cell has footing worth pathing to.
    pub fn is_stable_destination(&self, pos: BlockPos, terrain: &impl TerrainQuery) -> bool {
        match self.mode {
            MobilityMode::Ground => terrain.is_stable_destination(pos),
            MobilityMode::Flying => !terrain.is_solid(pos),
            MobilityMode::Swimming => !terrain.is_solid(pos.below()) && !terrain.is_solid(pos),
            MobilityMode::WallClimbing => {
                terrain.is_stable_destination(pos) || has_adjacent_face(pos, terrain)
            }
        }
    }

    /// Vertical correction applied to waypoints before they become intents.
    pub fn ground_y(&self, target: DVec3, terrain: &impl TerrainQuery) -> f64 {
        match self.mode {
            MobilityMode::Ground | MobilityMode::WallClimbing => {
                terrain.floor_height(BlockPos::containing(target))
            }
            MobilityMode::Flying | MobilityMode::Swimming => target.y,
        }
    }
}

/// Any horizontally adjacent solid face a climber could grip.
pub(crate) fn has_adjacent_face(pos: BlockPos, terrain: &impl TerrainQuery) -> bool {
    [(1, 0), (-1, 0), (0, 1), (0, -1)]
        .iter()
        .any(|&(dx, dz)| terrain.is_solid(pos.offset(dx, 0, dz)))
}
