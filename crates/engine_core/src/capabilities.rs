//! Capabilities a scene object can offer to the renderer and to other systems.
//!
//! Objects compose these instead of deriving from a shared renderable base.

use glam::{Mat4, Vec3};

use crate::mesh::MeshBuffers;

/// Object that owns renderable mesh buffers.
pub trait ProvidesMeshBuffers {
    /// `None` until a mesh has been built.
    fn mesh_buffers(&self) -> Option<&MeshBuffers>;
}

/// Object placed in the world by a single affine transform.
pub trait ProvidesWorldTransform {
    fn world_transform(&self) -> Mat4;
}

/// Surface height lookup in world space.
pub trait HeightQuery {
    /// Surface height (world Y) under `(x, z)`.
    fn height_at_world(&self, x: f32, z: f32) -> f32;

    /// Signed vertical distance from `point` to the surface; positive above ground.
    fn distance_to_surface(&self, point: Vec3) -> f32 {
        point.y - self.height_at_world(point.x, point.z)
    }
}

/// Height of `surface` under `(x, z)`, or `0.0` when there is no surface.
pub fn height_or_zero(surface: Option<&dyn HeightQuery>, x: f32, z: f32) -> f32 {
    surface.map_or(0.0, |s| s.height_at_world(x, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plateau(f32);

    impl HeightQuery for Plateau {
        fn height_at_world(&self, _x: f32, _z: f32) -> f32 {
            self.0
        }
    }

    #[test]
    fn distance_is_positive_above_ground() {
        let ground = Plateau(5.0);
        assert_eq!(ground.distance_to_surface(Vec3::new(1.0, 7.5, 2.0)), 2.5);
        assert_eq!(ground.distance_to_surface(Vec3::new(1.0, 4.0, 2.0)), -1.0);
    }

    #[test]
    fn missing_surface_reads_as_zero() {
        assert_eq!(height_or_zero(None, 10.0, -3.0), 0.0);
        let ground = Plateau(2.0);
        assert_eq!(height_or_zero(Some(&ground), 10.0, -3.0), 2.0);
    }
}
