//! Bounding volumes and box/box separation for the hover-drone demo.

pub mod aabb;
pub mod collision;

pub use aabb::*;
pub use collision::*;
