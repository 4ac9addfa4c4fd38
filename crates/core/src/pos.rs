use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer voxel coordinate (X, Y, Z).
///
/// Implements `Ord` for deterministic iteration in `BTreeMap`/`BTreeSet`
/// (sorts by x, then y, then z).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BlockPos {
    /// East-west coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
    /// North-south coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Construct from coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Offset by per-axis deltas.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The cell directly below.
    pub const fn below(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// The cell directly above.
    pub const fn above(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// Squared Euclidean distance to another cell.
    pub fn distance_sqr(self, other: Self) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        let dz = (self.z - other.z) as f64;
        dx * dx + dy * dy + dz * dz
    }

    /// Euclidean distance to another cell.
    pub fn distance(self, other: Self) -> f64 {
        self.distance_sqr(other).sqrt()
    }

    /// Squared horizontal (XZ-plane) distance to another cell.
    pub fn horizontal_distance_sqr(self, other: Self) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dz = (self.z - other.z) as f64;
        dx * dx + dz * dz
    }

    /// Manhattan distance to another cell.
    pub fn manhattan(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }

    /// The cell containing a continuous-space point (per-axis floor).
    pub fn containing(point: DVec3) -> Self {
        Self::new(
            point.x.floor() as i32,
            point.y.floor() as i32,
            point.z.floor() as i32,
        )
    }

    /// Bottom-center of the cell in continuous space.
    pub fn bottom_center(self) -> DVec3 {
        DVec3::new(self.x as f64 + 0.5, self.y as f64, self.z as f64 + 0.5)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::BlockPos;
    use glam::DVec3;

    #[test]
    fn ord_sorts_by_x_then_y_then_z() {
        let mut cells = vec![
            BlockPos::new(1, 0, 0),
            BlockPos::new(0, 2, 5),
            BlockPos::new(0, 2, 1),
            BlockPos::new(0, 1, 9),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![
                BlockPos::new(0, 1, 9),
                BlockPos::new(0, 2, 1),
                BlockPos::new(0, 2, 5),
                BlockPos::new(1, 0, 0),
            ]
        );
    }

    #[test]
    fn containing_floors_negative_coordinates() {
        let pos = BlockPos::containing(DVec3::new(-0.25, 3.9, -1.0));
        assert_eq!(pos, BlockPos::new(-1, 3, -1));
    }

    #[test]
    fn bottom_center_is_cell_center_in_xz() {
        let center = BlockPos::new(2, 5, -3).bottom_center();
        assert_eq!(center, DVec3::new(2.5, 5.0, -2.5));
    }
}
