use std::ops::{Index, IndexMut};

use enum_map::Enum;
use enumset::{EnumSet, EnumSetType};
use glam::{BVec3, I64Vec3, IVec3};

macro_rules! impl_from_for_vec {
    { $enum_type:ident for $value_type:ident {
        $( $variant:ident => ( $( $value:expr ),* ), )*
    } } => {
        impl From<$enum_type> for $value_type {
            fn from(value: $enum_type) -> Self {
                match value {
                    $( <$enum_type>::$variant => Self::new( $( $value as _ ),* ), )*
                }
            }
        }
    };
    { $enum_type:ident for [ $( $value_type:ident ),* ] $values:tt } => { $(
        impl_from_for_vec! {
            $enum_type for $value_type
            $values
        }
    )* };
}

macro_rules! impl_index_for_vec {
    { $axis_type:ident for $base_type:ident: $vector_type:ident {
        $( $axis_name:ident => $axis_field:ident, )*
    } } => {
        impl Index<$axis_type> for $vector_type {
            type Output = $base_type;

            fn index(&self, index: $axis_type) -> &Self::Output {
                match index {
                    $( $axis_type::$axis_name => &self.$axis_field, )*
                }
            }
        }

        impl IndexMut<$axis_type> for $vector_type {
            fn index_mut(&mut self, index: $axis_type) -> &mut Self::Output {
                match index {
                    $( $axis_type::$axis_name => &mut self.$axis_field, )*
                }
            }
        }
    };
    { $axis_type:ident for [
        $( $base_type:ident: $( $vector_type:ident ),* ; )*
    ] $axes:tt } => { $( $(
        impl_index_for_vec! {
            $axis_type for $base_type: $vector_type
            $axes
        }
    )* )* };
}

/// A three-dimensional axis; `X`, `Y`, or `Z`.
///
/// For colors, `X` is red, `Y` is green and `Z` is blue.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Enum, EnumSetType)]
#[enumset(no_super_impls)]
pub enum Axis3 {
    X,
    Y,
    Z,
}

impl_from_for_vec! {
    Axis3 for [IVec3, I64Vec3] {
        X => (1, 0, 0),
        Y => (0, 1, 0),
        Z => (0, 0, 1),
    }
}

impl_index_for_vec! {
    Axis3 for [
        i32: IVec3;
        i64: I64Vec3;
        bool: BVec3;
    ] {
        X => x,
        Y => y,
        Z => z,
    }
}

/// A set of three-dimensional axes.
pub type Axes3 = EnumSet<Axis3>;

/// A corner of a 3D cube, which doubles as the octant of a split octree node.
///
/// The discriminant is the octant index: bit `0` is set for the upper half along [`Axis3::X`], bit
/// `1` for [`Axis3::Y`] and bit `2` for [`Axis3::Z`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Enum, EnumSetType)]
#[enumset(no_super_impls)]
pub enum Corner3 {
    X0Y0Z0,
    X1Y0Z0,
    X0Y1Z0,
    X1Y1Z0,
    X0Y0Z1,
    X1Y0Z1,
    X0Y1Z1,
    X1Y1Z1,
}

impl Corner3 {
    /// Returns the corner that lies on the upper side of exactly the given `axes`.
    pub fn from_axes(axes: Axes3) -> Self {
        let index = axes
            .iter()
            .fold(0, |index, axis| index | 1 << axis as usize);
        Self::from_usize(index)
    }

    /// Returns the axes along which this corner lies on the upper side.
    pub fn axes(self) -> Axes3 {
        Axes3::all()
            .iter()
            .filter(|&axis| self.is_upper(axis))
            .collect()
    }

    /// Whether the corner lies on the upper side along the given `axis`.
    pub fn is_upper(self, axis: Axis3) -> bool {
        (self as u8) & (1 << axis as u8) != 0
    }

    /// Returns `1` or `-1` per axis, pointing from the center of a cube towards this corner.
    pub fn direction(self) -> IVec3 {
        IVec3::from(self) * 2 - IVec3::ONE
    }
}

impl_from_for_vec! {
    Corner3 for [IVec3, I64Vec3] {
        X0Y0Z0 => (0, 0, 0),
        X1Y0Z0 => (1, 0, 0),
        X0Y1Z0 => (0, 1, 0),
        X1Y1Z0 => (1, 1, 0),
        X0Y0Z1 => (0, 0, 1),
        X1Y0Z1 => (1, 0, 1),
        X0Y1Z1 => (0, 1, 1),
        X1Y1Z1 => (1, 1, 1),
    }
}

pub type Corners3 = EnumSet<Corner3>;
