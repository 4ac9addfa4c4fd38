use serde::{Deserialize, Serialize};

/// Terrain classification of a single cell as seen by the path search.
///
/// Classification is geometric only; per-agent preferences are expressed as a
/// cost malus on top of it (see [`PathType::default_malus`]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PathType {
    /// Empty cell with nothing to stand on.
    Open,
    /// Empty cell with solid footing below.
    Walkable,
    /// Cell an agent cannot occupy.
    Blocked,
    /// Cell filled with water.
    Water,
    /// Cell filled with lava.
    Lava,
    /// Cell in or directly above fire.
    DangerFire,
    /// Cell adjacent to some other hazard (cactus and the like).
    DangerOther,
    /// Open doorway.
    DoorOpen,
    /// Closed wooden door (openable by some agents).
    DoorWoodClosed,
    /// Closed iron door (never openable by agents).
    DoorIronClosed,
    /// Trapdoor cell.
    Trapdoor,
    /// Fence cell; too tall to step over.
    Fence,
    /// Rail cell.
    Rail,
    /// Leaf cell; solid to most agents.
    Leaves,
    /// Raised basin (cauldron-style) an agent would get caught standing in.
    StickyBasin,
    /// Climbable surface (vines, adjacent wall face).
    Climbable,
}

/// Sentinel malus that forbids a cell regardless of geometry.
pub const MALUS_IMPASSABLE: f32 = -1.0;

impl PathType {
    /// Default traversal penalty for this classification.
    ///
    /// Negative means impassable; positive biases the search away without
    /// forbidding outright.
    pub fn default_malus(self) -> f32 {
        match self {
            PathType::Open => 0.0,
            PathType::Walkable => 0.0,
            PathType::Blocked => MALUS_IMPASSABLE,
            PathType::Water => 8.0,
            PathType::Lava => MALUS_IMPASSABLE,
            PathType::DangerFire => 16.0,
            PathType::DangerOther => 8.0,
            PathType::DoorOpen => 0.0,
            PathType::DoorWoodClosed => MALUS_IMPASSABLE,
            PathType::DoorIronClosed => MALUS_IMPASSABLE,
            PathType::Trapdoor => 0.0,
            PathType::Fence => MALUS_IMPASSABLE,
            PathType::Rail => 0.0,
            PathType::Leaves => MALUS_IMPASSABLE,
            PathType::StickyBasin => 0.0,
            PathType::Climbable => 0.0,
        }
    }

    /// Whether this classification marks hazardous terrain.
    pub fn is_dangerous(self) -> bool {
        matches!(
            self,
            PathType::Lava | PathType::DangerFire | PathType::DangerOther
        )
    }
}

/// Fluid policy for straight-line traversability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluidMode {
    /// Any fluid cell blocks the line.
    None,
    /// Water is transparent to the line; lava still blocks.
    Water,
    /// No fluid blocks the line.
    Any,
}

#[cfg(test)]
mod tests {
    use super::{PathType, MALUS_IMPASSABLE};

    #[test]
    fn blocked_terrain_is_forbidden_by_default() {
        assert_eq!(PathType::Blocked.default_malus(), MALUS_IMPASSABLE);
        assert_eq!(PathType::Lava.default_malus(), MALUS_IMPASSABLE);
        assert!(PathType::Walkable.default_malus() >= 0.0);
    }

    #[test]
    fn water_is_penalized_but_passable() {
        let malus = PathType::Water.default_malus();
        assert!(malus > 0.0);
    }
}
