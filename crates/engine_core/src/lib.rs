//! Core engine types and utilities for the hover-drone demo.
//!
//! This crate provides the foundational types shared by every other crate:
//! - Transform and pose composition
//! - Frame time management
//! - CPU mesh buffers and the append-only render sink contract
//! - Capability traits the scene composes instead of a renderable hierarchy

pub mod capabilities;
pub mod mesh;
pub mod time;
pub mod transform;

pub use capabilities::*;
pub use mesh::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
