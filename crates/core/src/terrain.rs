use crate::{BlockPos, FluidMode, PathType};
use glam::DVec3;

/// Read-only terrain query surface consumed by the navigation core.
///
/// Implementations answer purely from terrain state and must be deterministic
/// for a given position. The navigation core never mutates terrain; the host
/// simulation is expected to serialize terrain edits outside the tick phase in
/// which navigation runs.
pub trait TerrainQuery {
    /// Path-type classification of the cell an agent's feet would occupy.
    fn classify(&self, pos: BlockPos) -> PathType;

    /// Whether the cell itself is solid (cannot be occupied).
    fn is_solid(&self, pos: BlockPos) -> bool;

    /// Whether the cell offers solid footing (solid below, occupiable itself).
    fn is_stable_destination(&self, pos: BlockPos) -> bool;

    /// Height of the walkable surface at or below `pos`, as a continuous Y.
    ///
    /// Falls back to the cell's own base when no surface is found within the
    /// terrain bounds.
    fn floor_height(&self, pos: BlockPos) -> f64;

    /// Inclusive world bounds as (min, max) corners.
    fn bounds(&self) -> (BlockPos, BlockPos);

    /// Collision raycast: can an agent of the given half-width travel the
    /// straight segment `from -> to` without clipping impassable terrain?
    ///
    /// Samples three parallel lanes across the agent's width at quarter-cell
    /// steps. `fluid` selects which fluids block the line.
    fn clear_line(&self, from: DVec3, to: DVec3, half_width: f64, fluid: FluidMode) -> bool {
        let delta = to - from;
        let length = delta.length();
        if length < 1e-7 {
            return true;
        }
        let steps = (length / 0.25).ceil() as i32;
        let side = DVec3::new(-delta.z, 0.0, delta.x).normalize_or_zero() * half_width;
        for lane in [-1.0, 0.0, 1.0] {
            for step in 0..=steps {
                let point = from + delta * (step as f64 / steps as f64) + side * lane;
                if blocks_line(self.classify(BlockPos::containing(point)), fluid) {
                    return false;
                }
            }
        }
        true
    }
}

fn blocks_line(path_type: PathType, fluid: FluidMode) -> bool {
    match path_type {
        PathType::Blocked
        | PathType::Fence
        | PathType::Leaves
        | PathType::DoorWoodClosed
        | PathType::DoorIronClosed => true,
        PathType::Lava => !matches!(fluid, FluidMode::Any),
        PathType::Water => matches!(fluid, FluidMode::None),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Flat floor at y = 0 with an optional set of solid pillars.
    struct Slab {
        walls: BTreeSet<BlockPos>,
    }

    impl TerrainQuery for Slab {
        fn classify(&self, pos: BlockPos) -> PathType {
            if pos.y < 0 || self.walls.contains(&pos) {
                PathType::Blocked
            } else if pos.y == 0 {
                PathType::Walkable
            } else {
                PathType::Open
            }
        }

        fn is_solid(&self, pos: BlockPos) -> bool {
            pos.y < 0 || self.walls.contains(&pos)
        }

        fn is_stable_destination(&self, pos: BlockPos) -> bool {
            self.is_solid(pos.below()) && !self.is_solid(pos)
        }

        fn floor_height(&self, pos: BlockPos) -> f64 {
            let _ = pos;
            0.0
        }

        fn bounds(&self) -> (BlockPos, BlockPos) {
            (BlockPos::new(-64, -1, -64), BlockPos::new(64, 64, 64))
        }
    }

    #[test]
    fn clear_line_passes_over_open_floor() {
        let slab = Slab {
            walls: BTreeSet::new(),
        };
        assert!(slab.clear_line(
            DVec3::new(0.5, 0.0, 0.5),
            DVec3::new(6.5, 0.0, 0.5),
            0.3,
            FluidMode::None,
        ));
    }

    #[test]
    fn clear_line_rejects_a_wall_in_the_way() {
        let mut walls = BTreeSet::new();
        walls.insert(BlockPos::new(3, 0, 0));
        let slab = Slab { walls };
        assert!(!slab.clear_line(
            DVec3::new(0.5, 0.0, 0.5),
            DVec3::new(6.5, 0.0, 0.5),
            0.3,
            FluidMode::None,
        ));
    }
}
