//! Sparse bounded voxel world implementing the terrain query surface.

use crate::{scoped_rng, BlockKind};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;
use voxelnav_core::{BlockPos, PathType, TerrainQuery};

/// A bounded voxel world stored sparsely over a uniform solid floor.
///
/// Every cell below `floor_y` is solid stone; everything else defaults to air
/// unless explicitly set. Uses `BTreeMap` so iteration order is deterministic.
#[derive(Debug, Clone)]
pub struct VoxelWorld {
    min: BlockPos,
    max: BlockPos,
    floor_y: i32,
    blocks: BTreeMap<BlockPos, BlockKind>,
}

impl VoxelWorld {
    /// Create an empty world spanning `min..=max` with solid ground below `floor_y`.
    pub fn new(min: BlockPos, max: BlockPos, floor_y: i32) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
        debug_assert!(floor_y > min.y);
        Self {
            min,
            max,
            floor_y,
            blocks: BTreeMap::new(),
        }
    }

    /// Flat square world of `half_extent` blocks around the origin, standing
    /// level at `floor_y`.
    pub fn flat(half_extent: i32, floor_y: i32) -> Self {
        Self::new(
            BlockPos::new(-half_extent, floor_y - 2, -half_extent),
            BlockPos::new(half_extent, floor_y + 32, half_extent),
            floor_y,
        )
    }

    /// Standing level of the uniform floor.
    pub fn floor_y(&self) -> i32 {
        self.floor_y
    }

    /// Block at `pos`. Out-of-bounds reads answer as stone.
    pub fn block(&self, pos: BlockPos) -> BlockKind {
        if !self.in_bounds(pos) {
            return BlockKind::Stone;
        }
        if pos.y < self.floor_y {
            return *self.blocks.get(&pos).unwrap_or(&BlockKind::Stone);
        }
        *self.blocks.get(&pos).unwrap_or(&BlockKind::Air)
    }

    /// Place a block.
    pub fn set(&mut self, pos: BlockPos, kind: BlockKind) {
        debug_assert!(self.in_bounds(pos), "set outside world bounds: {pos}");
        self.blocks.insert(pos, kind);
    }

    /// Fill an inclusive box with a block kind.
    pub fn fill(&mut self, min: BlockPos, max: BlockPos, kind: BlockKind) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    self.set(BlockPos::new(x, y, z), kind);
                }
            }
        }
    }

    fn in_bounds(&self, pos: BlockPos) -> bool {
        pos.x >= self.min.x
            && pos.x <= self.max.x
            && pos.y >= self.min.y
            && pos.y <= self.max.y
            && pos.z >= self.min.z
            && pos.z <= self.max.z
    }

    fn classify_air_cell(&self, pos: BlockPos) -> PathType {
        let below = self.block(pos.below());
        match below {
            BlockKind::Lava | BlockKind::Fire => return PathType::DangerFire,
            BlockKind::Cactus => return PathType::DangerOther,
            _ => {}
        }
        // Brushing distance: a hazard in any horizontally adjacent cell taints
        // this one rather than forbidding it.
        for (dx, dz) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            match self.block(pos.offset(dx, 0, dz)) {
                BlockKind::Fire => return PathType::DangerFire,
                BlockKind::Cactus | BlockKind::Lava => return PathType::DangerOther,
                _ => {}
            }
        }
        if below.is_solid() || below == BlockKind::Cauldron {
            PathType::Walkable
        } else {
            PathType::Open
        }
    }
}

impl TerrainQuery for VoxelWorld {
    fn classify(&self, pos: BlockPos) -> PathType {
        match self.block(pos) {
            BlockKind::Water => PathType::Water,
            BlockKind::Lava => PathType::Lava,
            BlockKind::Fire => PathType::DangerFire,
            BlockKind::WoodDoor { open: false } => PathType::DoorWoodClosed,
            BlockKind::IronDoor { open: false } => PathType::DoorIronClosed,
            BlockKind::WoodDoor { open: true } | BlockKind::IronDoor { open: true } => {
                PathType::DoorOpen
            }
            BlockKind::Trapdoor => PathType::Trapdoor,
            BlockKind::Rail => PathType::Rail,
            BlockKind::Leaves => PathType::Leaves,
            BlockKind::Fence => PathType::Fence,
            BlockKind::Cauldron => PathType::StickyBasin,
            BlockKind::Vine => PathType::Climbable,
            kind if kind.is_solid() => PathType::Blocked,
            BlockKind::Air => self.classify_air_cell(pos),
            _ => PathType::Open,
        }
    }

    fn is_solid(&self, pos: BlockPos) -> bool {
        self.block(pos).is_solid()
    }

    fn is_stable_destination(&self, pos: BlockPos) -> bool {
        !self.is_solid(pos) && self.is_solid(pos.below())
    }

    fn floor_height(&self, pos: BlockPos) -> f64 {
        let mut y = pos.y;
        while y > self.min.y {
            if self.is_solid(BlockPos::new(pos.x, y - 1, pos.z)) {
                return y as f64;
            }
            y -= 1;
        }
        self.min.y as f64
    }

    fn bounds(&self) -> (BlockPos, BlockPos) {
        (self.min, self.max)
    }
}

/// Scatter two-block-tall stone pillars across the floor with the given
/// per-column probability. Deterministic for a fixed seed.
pub fn scatter_obstacles(world: &mut VoxelWorld, seed: u64, density: f64) {
    let mut rng = scoped_rng(seed, 0x6f62_7374); // "obst"
    let (min, max) = world.bounds();
    let floor = world.floor_y();
    let mut placed = 0usize;
    for x in min.x..=max.x {
        for z in min.z..=max.z {
            if rng.gen_bool(density.clamp(0.0, 1.0)) {
                world.set(BlockPos::new(x, floor, z), BlockKind::Stone);
                world.set(BlockPos::new(x, floor + 1, z), BlockKind::Stone);
                placed += 1;
            }
        }
    }
    debug!(placed, density, "scattered obstacle pillars");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_world_is_walkable_at_floor_level() {
        let world = VoxelWorld::flat(8, 0);
        assert_eq!(world.classify(BlockPos::new(0, 0, 0)), PathType::Walkable);
        assert_eq!(world.classify(BlockPos::new(0, 1, 0)), PathType::Open);
        assert_eq!(world.classify(BlockPos::new(0, -1, 0)), PathType::Blocked);
    }

    #[test]
    fn lava_and_fire_classify_as_hazards() {
        let mut world = VoxelWorld::flat(8, 0);
        world.set(BlockPos::new(2, 0, 0), BlockKind::Lava);
        world.set(BlockPos::new(4, 0, 0), BlockKind::Fire);
        assert_eq!(world.classify(BlockPos::new(2, 0, 0)), PathType::Lava);
        assert_eq!(world.classify(BlockPos::new(4, 0, 0)), PathType::DangerFire);
        // Standing next to lava is tainted, not forbidden.
        assert_eq!(
            world.classify(BlockPos::new(3, 0, 0)),
            PathType::DangerOther
        );
    }

    #[test]
    fn cauldron_cell_reports_sticky_basin() {
        let mut world = VoxelWorld::flat(8, 0);
        world.set(BlockPos::new(1, 0, 1), BlockKind::Cauldron);
        assert_eq!(
            world.classify(BlockPos::new(1, 0, 1)),
            PathType::StickyBasin
        );
        // The rim is a standing surface for the cell above.
        assert_eq!(world.classify(BlockPos::new(1, 1, 1)), PathType::Walkable);
    }

    #[test]
    fn floor_height_sees_through_open_air() {
        let mut world = VoxelWorld::flat(8, 0);
        world.set(BlockPos::new(3, 0, 3), BlockKind::Stone);
        assert_eq!(world.floor_height(BlockPos::new(3, 4, 3)), 1.0);
        assert_eq!(world.floor_height(BlockPos::new(0, 4, 0)), 0.0);
    }

    #[test]
    fn obstacle_scatter_is_deterministic() {
        let mut a = VoxelWorld::flat(12, 0);
        let mut b = VoxelWorld::flat(12, 0);
        scatter_obstacles(&mut a, 42, 0.1);
        scatter_obstacles(&mut b, 42, 0.1);
        for x in -12..=12 {
            for z in -12..=12 {
                let pos = BlockPos::new(x, 0, z);
                assert_eq!(a.block(pos), b.block(pos));
            }
        }
    }
}
