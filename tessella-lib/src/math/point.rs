use std::{fmt, ops::Index};

use glam::IVec3;

use super::enums::Axis3;

/// An immutable point with integer coordinates.
///
/// Coordinates are stored as-is; in practice they are 8-bit color channels, but nothing here
/// enforces that range.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct Point3(IVec3);

impl Point3 {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(IVec3::new(x, y, z))
    }

    pub const fn x(self) -> i32 {
        self.0.x
    }

    pub const fn y(self) -> i32 {
        self.0.y
    }

    pub const fn z(self) -> i32 {
        self.0.z
    }

    pub const fn as_ivec3(self) -> IVec3 {
        self.0
    }

    /// The squared Euclidean distance to `other`.
    ///
    /// Computed in [`i64`], so it cannot overflow for points anywhere near the color cube.
    pub fn distance_squared(self, other: Self) -> i64 {
        let delta = self.0.as_i64vec3() - other.0.as_i64vec3();
        delta.dot(delta)
    }

    /// The Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }
}

impl From<IVec3> for Point3 {
    fn from(value: IVec3) -> Self {
        Self(value)
    }
}

impl From<Point3> for IVec3 {
    fn from(value: Point3) -> Self {
        value.0
    }
}

impl Index<Axis3> for Point3 {
    type Output = i32;

    fn index(&self, axis: Axis3) -> &Self::Output {
        &self.0[axis]
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let point = Point3::new(12, 200, 37);
        assert_eq!(point.distance_squared(point), 0);
        assert_eq!(point.distance(point), 0.0);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point3::new(0, 0, 0);
        let b = Point3::new(3, 4, 12);
        assert_eq!(a.distance_squared(b), 169);
        assert_eq!(a.distance(b), 13.0);
        assert_eq!(b.distance(a), 13.0);
    }

    #[test]
    fn distance_across_color_cube() {
        let black = Point3::new(0, 0, 0);
        let white = Point3::new(255, 255, 255);
        assert_eq!(black.distance_squared(white), 3 * 255 * 255);
    }

    #[test]
    fn distance_beyond_i32_range() {
        let a = Point3::new(-100_000, 0, 0);
        let b = Point3::new(100_000, 0, 0);
        assert_eq!(a.distance_squared(b), 40_000_000_000);
        assert_eq!(a.distance(b), 200_000.0);
    }

    #[test]
    fn coordinates_are_not_clamped() {
        let point = Point3::new(-5, 300, 1000);
        assert_eq!((point.x(), point.y(), point.z()), (-5, 300, 1000));
        assert_eq!(point[Axis3::Y], 300);
        assert_eq!(point.to_string(), "(-5, 300, 1000)");
    }
}
