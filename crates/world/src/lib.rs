#![warn(missing_docs)]
//! Concrete voxel terrain backing the navigation core in demos and tests.

mod block;
mod voxel;

pub use block::*;
pub use voxel::*;

use rand::{rngs::StdRng, SeedableRng};

/// Helper to derive a reproducible RNG seeded by world + salt domains.
pub fn scoped_rng(world_seed: u64, salt: u64) -> StdRng {
    StdRng::seed_from_u64(world_seed ^ salt)
}
