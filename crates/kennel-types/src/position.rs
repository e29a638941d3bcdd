//! Block coordinates, continuous positions, and axis-aligned boxes.
//!
//! Block coordinates saturate instead of wrapping so that offset math near
//! the edge of the coordinate space can never overflow.

use serde::{Deserialize, Serialize};

/// Integer coordinates of a single block cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct BlockPos {
    /// East-west axis.
    pub x: i32,
    /// Vertical axis.
    pub y: i32,
    /// North-south axis.
    pub z: i32,
}

impl BlockPos {
    /// The origin. Also used as the "unset" sentinel for work locations.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Build a block position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Whether this is the unset sentinel.
    pub const fn is_unset(self) -> bool {
        self.x == 0 && self.y == 0 && self.z == 0
    }

    /// Shift by the given deltas, saturating at the coordinate bounds.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            z: self.z.saturating_add(dz),
        }
    }

    /// The cell directly above.
    pub const fn above(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// The cell `n` blocks above.
    pub const fn above_by(self, n: i32) -> Self {
        self.offset(0, n, 0)
    }

    /// The cell directly below.
    pub const fn below(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// Negative z.
    pub const fn north(self) -> Self {
        self.offset(0, 0, -1)
    }

    /// Positive z.
    pub const fn south(self) -> Self {
        self.offset(0, 0, 1)
    }

    /// Positive x.
    pub const fn east(self) -> Self {
        self.offset(1, 0, 0)
    }

    /// Negative x.
    pub const fn west(self) -> Self {
        self.offset(-1, 0, 0)
    }

    /// The four horizontal neighbors (north, south, east, west).
    pub const fn horizontal_neighbors(self) -> [Self; 4] {
        [self.north(), self.south(), self.east(), self.west()]
    }

    /// The eight horizontal cells surrounding this one on the same layer.
    pub const fn ring8(self) -> [Self; 8] {
        [
            self.offset(-1, 0, -1),
            self.offset(0, 0, -1),
            self.offset(1, 0, -1),
            self.offset(-1, 0, 0),
            self.offset(1, 0, 0),
            self.offset(-1, 0, 1),
            self.offset(0, 0, 1),
            self.offset(1, 0, 1),
        ]
    }

    /// Squared euclidean distance between two cells.
    pub fn dist_sqr(self, other: Self) -> i64 {
        let dx = i64::from(self.x).saturating_sub(i64::from(other.x));
        let dy = i64::from(self.y).saturating_sub(i64::from(other.y));
        let dz = i64::from(self.z).saturating_sub(i64::from(other.z));
        dx.saturating_mul(dx)
            .saturating_add(dy.saturating_mul(dy))
            .saturating_add(dz.saturating_mul(dz))
    }

    /// Centre of the cell.
    pub fn center(self) -> Vec3 {
        Vec3::new(
            f64::from(self.x) + 0.5,
            f64::from(self.y) + 0.5,
            f64::from(self.z) + 0.5,
        )
    }

    /// Centre of the cell's floor face.
    pub fn bottom_center(self) -> Vec3 {
        Vec3::new(
            f64::from(self.x) + 0.5,
            f64::from(self.y),
            f64::from(self.z) + 0.5,
        )
    }

    /// Whether `point` lies strictly within `radius` of this cell's centre.
    pub fn is_closer_to_center_than(self, point: Vec3, radius: f64) -> bool {
        point.distance_sqr(self.center()) < radius * radius
    }
}

impl core::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A continuous position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// East-west axis.
    pub x: f64,
    /// Vertical axis.
    pub y: f64,
    /// North-south axis.
    pub z: f64,
}

impl Vec3 {
    /// Build a vector.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared distance to another point.
    pub fn distance_sqr(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx.mul_add(dx, dy.mul_add(dy, dz * dz))
    }

    /// Distance to another point.
    pub fn distance(self, other: Self) -> f64 {
        self.distance_sqr(other).sqrt()
    }

    /// Shift by the given deltas.
    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The block cell containing this point.
    #[allow(clippy::cast_possible_truncation)]
    pub fn block_pos(self) -> BlockPos {
        // Clamped to the i32 range before the cast, so truncation is the floor.
        let clamp = |v: f64| v.floor().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32;
        BlockPos::new(clamp(self.x), clamp(self.y), clamp(self.z))
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner (inclusive).
    pub min: Vec3,
    /// Maximum corner (inclusive).
    pub max: Vec3,
}

impl Aabb {
    /// The unit box occupied by a block cell.
    pub fn of_block(pos: BlockPos) -> Self {
        let min = Vec3::new(f64::from(pos.x), f64::from(pos.y), f64::from(pos.z));
        Self {
            min,
            max: min.offset(1.0, 1.0, 1.0),
        }
    }

    /// Grow the box by `amount` in every direction.
    pub fn inflate(self, amount: f64) -> Self {
        Self {
            min: self.min.offset(-amount, -amount, -amount),
            max: self.max.offset(amount, amount, amount),
        }
    }

    /// Whether `point` lies inside the box.
    pub fn contains(&self, point: Vec3) -> bool {
        (self.min.x..=self.max.x).contains(&point.x)
            && (self.min.y..=self.max.y).contains(&point.y)
            && (self.min.z..=self.max.z).contains(&point.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_unset_sentinel() {
        assert!(BlockPos::ZERO.is_unset());
        assert!(!BlockPos::new(0, 1, 0).is_unset());
    }

    #[test]
    fn offsets_saturate() {
        let edge = BlockPos::new(i32::MAX, 0, 0);
        assert_eq!(edge.east().x, i32::MAX);
    }

    #[test]
    fn center_distance_check() {
        let anchor = BlockPos::new(4, 60, 4);
        assert!(anchor.is_closer_to_center_than(Vec3::new(5.0, 60.0, 5.0), 2.25));
        assert!(!anchor.is_closer_to_center_than(Vec3::new(8.0, 60.0, 4.5), 2.25));
    }

    #[test]
    fn block_pos_floors_negative_coordinates() {
        assert_eq!(
            Vec3::new(-0.5, 63.9, 2.0).block_pos(),
            BlockPos::new(-1, 63, 2)
        );
    }

    #[test]
    fn inflated_box_contains_neighbors() {
        let area = Aabb::of_block(BlockPos::new(0, 0, 0)).inflate(1.0);
        assert!(area.contains(Vec3::new(-0.5, 1.5, 1.9)));
        assert!(!area.contains(Vec3::new(2.5, 0.5, 0.5)));
    }

    #[test]
    fn ring8_excludes_self() {
        let p = BlockPos::new(3, 3, 3);
        assert!(!p.ring8().contains(&p));
        assert_eq!(p.dist_sqr(p.offset(1, 2, 2)), 9);
    }
}
