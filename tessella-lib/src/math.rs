pub mod bounds;
pub mod enums;
pub mod point;
