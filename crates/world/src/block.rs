//! Block kinds and the properties navigation cares about.

use serde::{Deserialize, Serialize};

/// Types of blocks a navigation-relevant world can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockKind {
    /// Empty cell.
    Air,
    /// Generic solid rock.
    Stone,
    /// Soil.
    Dirt,
    /// Grass-topped soil.
    Grass,
    /// Sand.
    Sand,
    /// Still or flowing water.
    Water,
    /// Lava.
    Lava,
    /// Burning fire block.
    Fire,
    /// Cactus column; damages agents that brush against it.
    Cactus,
    /// Wooden door.
    WoodDoor {
        /// Whether the door currently stands open.
        open: bool,
    },
    /// Iron door; agents cannot open these themselves.
    IronDoor {
        /// Whether the door currently stands open.
        open: bool,
    },
    /// Trapdoor.
    Trapdoor,
    /// Fence post; taller than a one-block step.
    Fence,
    /// Minecart rail.
    Rail,
    /// Leaf block.
    Leaves,
    /// Cauldron; an agent stepping in gets caught on the rim.
    Cauldron,
    /// Climbable vines.
    Vine,
}

impl BlockKind {
    /// Canonical lowercase string key for configs/logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            BlockKind::Air => "air",
            BlockKind::Stone => "stone",
            BlockKind::Dirt => "dirt",
            BlockKind::Grass => "grass",
            BlockKind::Sand => "sand",
            BlockKind::Water => "water",
            BlockKind::Lava => "lava",
            BlockKind::Fire => "fire",
            BlockKind::Cactus => "cactus",
            BlockKind::WoodDoor { .. } => "wood_door",
            BlockKind::IronDoor { .. } => "iron_door",
            BlockKind::Trapdoor => "trapdoor",
            BlockKind::Fence => "fence",
            BlockKind::Rail => "rail",
            BlockKind::Leaves => "leaves",
            BlockKind::Cauldron => "cauldron",
            BlockKind::Vine => "vine",
        }
    }

    /// Whether the block fills its cell for collision purposes.
    pub fn is_solid(self) -> bool {
        matches!(
            self,
            BlockKind::Stone
                | BlockKind::Dirt
                | BlockKind::Grass
                | BlockKind::Sand
                | BlockKind::Leaves
                | BlockKind::Fence
                | BlockKind::Cactus
                | BlockKind::WoodDoor { open: false }
                | BlockKind::IronDoor { open: false }
        )
    }

    /// Whether an agent brushing this block takes damage.
    pub fn is_hazard(self) -> bool {
        matches!(self, BlockKind::Lava | BlockKind::Fire | BlockKind::Cactus)
    }
}
