use glam::DVec3;

/// Axis-aligned bounding box used for agent extents and overlap tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
        Self { min, max }
    }

    /// Box for an agent standing at `feet` with the given horizontal width and height.
    pub fn from_agent(feet: DVec3, width: f64, height: f64) -> Self {
        let half = width / 2.0;
        Self::new(
            DVec3::new(feet.x - half, feet.y, feet.z - half),
            DVec3::new(feet.x + half, feet.y + height, feet.z + half),
        )
    }

    /// Tests intersection with another AABB.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}
