use crate::{BlockPos, CoreError, FluidMode, PathType, TerrainQuery};
use glam::DVec3;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Bounded axis-aligned terrain snapshot used for the duration of one search.
///
/// Classifications are cached on first query so a search never pays for the
/// same world lookup twice. Cells outside the window answer as [`PathType::Blocked`],
/// which also bounds the search spatially.
pub struct TerrainWindow<'a, T: TerrainQuery + ?Sized> {
    source: &'a T,
    min: BlockPos,
    max: BlockPos,
    cache: RefCell<BTreeMap<BlockPos, PathType>>,
}

impl<T: TerrainQuery + ?Sized> std::fmt::Debug for TerrainWindow<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainWindow")
            .field("min", &self.min)
            .field("max", &self.max)
            .finish_non_exhaustive()
    }
}

impl<'a, T: TerrainQuery + ?Sized> TerrainWindow<'a, T> {
    /// Snapshot a cube of `radius` blocks around `center`, clamped to the
    /// source's bounds.
    ///
    /// A center outside those bounds is [`CoreError::OutOfBounds`]; a negative
    /// radius is [`CoreError::EmptyWindow`].
    pub fn new(source: &'a T, center: BlockPos, radius: i32) -> Result<Self, CoreError> {
        let (world_min, world_max) = source.bounds();
        if center.x < world_min.x
            || center.x > world_max.x
            || center.y < world_min.y
            || center.y > world_max.y
            || center.z < world_min.z
            || center.z > world_max.z
        {
            return Err(CoreError::OutOfBounds { pos: center });
        }
        let min = BlockPos::new(
            (center.x - radius).max(world_min.x),
            (center.y - radius).max(world_min.y),
            (center.z - radius).max(world_min.z),
        );
        let max = BlockPos::new(
            (center.x + radius).min(world_max.x),
            (center.y + radius).min(world_max.y),
            (center.z + radius).min(world_max.z),
        );
        if radius < 0 || min.x > max.x || min.y > max.y || min.z > max.z {
            return Err(CoreError::EmptyWindow { center, radius });
        }
        Ok(Self {
            source,
            min,
            max,
            cache: RefCell::new(BTreeMap::new()),
        })
    }

    /// Whether `pos` lies inside the snapshot box.
    pub fn contains(&self, pos: BlockPos) -> bool {
        pos.x >= self.min.x
            && pos.x <= self.max.x
            && pos.y >= self.min.y
            && pos.y <= self.max.y
            && pos.z >= self.min.z
            && pos.z <= self.max.z
    }

    /// Number of distinct cells classified so far (test instrumentation).
    pub fn cached_cells(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<T: TerrainQuery + ?Sized> TerrainQuery for TerrainWindow<'_, T> {
    fn classify(&self, pos: BlockPos) -> PathType {
        if !self.contains(pos) {
            return PathType::Blocked;
        }
        if let Some(cached) = self.cache.borrow().get(&pos) {
            return *cached;
        }
        let classified = self.source.classify(pos);
        self.cache.borrow_mut().insert(pos, classified);
        classified
    }

    fn is_solid(&self, pos: BlockPos) -> bool {
        !self.contains(pos) || self.source.is_solid(pos)
    }

    fn is_stable_destination(&self, pos: BlockPos) -> bool {
        self.contains(pos) && self.source.is_stable_destination(pos)
    }

    fn floor_height(&self, pos: BlockPos) -> f64 {
        self.source.floor_height(pos)
    }

    fn bounds(&self) -> (BlockPos, BlockPos) {
        (self.min, self.max)
    }

    fn clear_line(&self, from: DVec3, to: DVec3, half_width: f64, fluid: FluidMode) -> bool {
        self.source.clear_line(from, to, half_width, fluid)
    }
}
