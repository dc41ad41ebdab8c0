use std::fmt;

use glam::{I64Vec3, IVec3};

use super::{
    enums::{Axes3, Corner3},
    point::Point3,
};

/// A cube given by its center and half its side length.
///
/// Both bounds are inclusive, i.e. a cube with center `c` and half extent `h` covers `c - h` up to
/// and including `c + h` along each axis. Neighboring octants therefore share their faces.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct CubeBounds {
    center: IVec3,
    half_extent: i32,
}

impl CubeBounds {
    /// Bounds covering every 8-bit RGB color, i.e. `[0, 255]` along each axis.
    pub const COLORS: Self = Self {
        center: IVec3::splat(128),
        half_extent: 128,
    };

    /// Constructs [`CubeBounds`] from the given `center` and `half_extent`.
    ///
    /// # Panics
    ///
    /// Panics if `half_extent` is negative.
    pub const fn new(center: IVec3, half_extent: i32) -> Self {
        assert!(half_extent >= 0, "half extent must not be negative");
        Self {
            center,
            half_extent,
        }
    }

    pub const fn center(self) -> Point3 {
        Point3::new(self.center.x, self.center.y, self.center.z)
    }

    pub const fn half_extent(self) -> i32 {
        self.half_extent
    }

    /// Whether the cube still has room to be split into octants with a non-zero extent.
    pub const fn can_split(self) -> bool {
        self.half_extent > 1
    }

    /// Whether the `point` lies within the cube, including its faces.
    pub fn contains(self, point: Point3) -> bool {
        (point.as_ivec3().as_i64vec3() - self.center.as_i64vec3())
            .abs()
            .cmple(I64Vec3::splat(self.half_extent.into()))
            .all()
    }

    /// Returns the octant that `point` is routed into.
    ///
    /// An axis counts as upper only if the point is strictly greater than the center along it, so
    /// points on the center plane go to the lower octant.
    pub fn corner_of(self, point: Point3) -> Corner3 {
        let upper = point.as_ivec3().cmpgt(self.center);
        Corner3::from_axes(Axes3::all().iter().filter(|&axis| upper[axis]).collect())
    }

    /// Returns the bounds of the octant at the given `corner`.
    pub fn child(self, corner: Corner3) -> Self {
        let half_extent = self.half_extent / 2;
        Self {
            center: self.center + corner.direction() * half_extent,
            half_extent,
        }
    }

    /// The squared distance between `point` and the closest point within the cube.
    ///
    /// Zero if the `point` lies within the cube.
    pub fn distance_squared_to(self, point: Point3) -> i64 {
        let outside = ((point.as_ivec3().as_i64vec3() - self.center.as_i64vec3()).abs()
            - i64::from(self.half_extent))
        .max(I64Vec3::ZERO);
        outside.dot(outside)
    }
}

impl fmt::Display for CubeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ± {}",
            Point3::from(self.center),
            self.half_extent
        )
    }
}
