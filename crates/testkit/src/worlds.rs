//! Prefab worlds shared across navigation scenario tests.
//!
//! Each prefab is a small, fully deterministic terrain built once per test.
//! Keeping them here stops every integration test from hand-rolling its own
//! slightly different arena.

use voxelnav_core::BlockPos;
use voxelnav_world::{BlockKind, VoxelWorld};

/// Open flat plane, standing level at y = 0.
pub fn flat_plane(half_extent: i32) -> VoxelWorld {
    VoxelWorld::flat(half_extent, 0)
}

/// Flat plane with a sealed stone pocket around (10, 0, 10).
///
/// The pocket interior is reachable only by editing the walls, which makes it
/// the canonical unreachable-target arena.
pub fn walled_pocket() -> VoxelWorld {
    let mut world = VoxelWorld::flat(16, 0);
    world.fill(
        BlockPos::new(8, 0, 8),
        BlockPos::new(12, 3, 12),
        BlockKind::Stone,
    );
    world.fill(
        BlockPos::new(9, 0, 9),
        BlockPos::new(11, 2, 11),
        BlockKind::Air,
    );
    world
}

/// Flat plane with two parallel walls forming a straight lane along x,
/// three blocks wide, from x = 0 to x = 10.
pub fn corridor() -> VoxelWorld {
    let mut world = VoxelWorld::flat(16, 0);
    for side in [-2, 2] {
        world.fill(
            BlockPos::new(0, 0, side),
            BlockPos::new(10, 2, side),
            BlockKind::Stone,
        );
    }
    world
}

/// Flat plane with a cauldron sitting in the direct lane at (3, 0, 0).
pub fn basin_path() -> VoxelWorld {
    let mut world = VoxelWorld::flat(16, 0);
    world.set(BlockPos::new(3, 0, 0), BlockKind::Cauldron);
    world
}

/// Flat plane with a water trench along x: the column at z = 0 from
/// x = 0..=8 is water three cells deep, dug into the floor.
pub fn water_channel() -> VoxelWorld {
    let mut world = VoxelWorld::new(BlockPos::new(-16, -6, -16), BlockPos::new(16, 32, 16), 0);
    world.fill(
        BlockPos::new(0, -3, -1),
        BlockPos::new(8, 0, 1),
        BlockKind::Water,
    );
    world
}
