//! Integer math primitives and the color-space octree used to pick mosaic tiles.

pub mod math;
pub mod octree;
