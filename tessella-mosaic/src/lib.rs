//! Photomosaic assembly: tiles are reduced to their average color, indexed in an octree and painted
//! over an enlarged canvas wherever their color best matches the source image.

pub mod assemble;
pub mod color;
pub mod composite;
pub mod grid;
pub mod mode;
pub mod tile;
