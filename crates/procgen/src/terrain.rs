//! Terrain entity: owns the published heightfield, its mesh and its world placement.
//!
//! Both entry points (diamond-square synthesis and heightmap images) converge on
//! [`Terrain::publish`], which rebuilds the mesh wholesale. A failed entry point
//! leaves the previously published state untouched.

use std::path::Path;

use engine_core::{HeightQuery, MeshBuffers, ProvidesMeshBuffers, ProvidesWorldTransform};
use glam::{Mat4, Vec3};

use crate::diamond_square::{self, DiamondSquareParams};
use crate::error::TerrainError;
use crate::heightfield::Heightfield;
use crate::mesh_builder::build_mesh;

/// A single fixed-size terrain grid placed in the world by an affine transform.
#[derive(Debug, Clone)]
pub struct Terrain {
    heightfield: Option<Heightfield>,
    mesh: Option<MeshBuffers>,
    transform: Mat4,
    inverse: Mat4,
    /// Free scaling vector forwarded to the terrain material.
    size: Vec3,
}

impl Default for Terrain {
    fn default() -> Self {
        Self::new()
    }
}

impl Terrain {
    /// An unbuilt terrain at the origin. Height queries read `0` until something is published.
    pub fn new() -> Self {
        Self {
            heightfield: None,
            mesh: None,
            transform: Mat4::IDENTITY,
            inverse: Mat4::IDENTITY,
            size: Vec3::ONE,
        }
    }

    /// Synthesize a diamond-square heightfield and publish it.
    pub fn generate(&mut self, params: &DiamondSquareParams) -> Result<(), TerrainError> {
        let field = diamond_square::generate(params)?;
        log::info!(
            "Generated {}x{} terrain (roughness={}, seed={}, wrap={})",
            params.size,
            params.size,
            params.roughness,
            params.seed,
            params.wrap_edges
        );
        self.publish(field);
        Ok(())
    }

    /// Decode a heightmap image and publish it.
    pub fn load_heightmap(
        &mut self,
        path: impl AsRef<Path>,
        world_scale: f32,
        height_scale: f32,
    ) -> Result<(), TerrainError> {
        let field = Heightfield::load_image(path, world_scale, height_scale)?;
        self.publish(field);
        Ok(())
    }

    /// Replace the heightfield and rebuild the mesh from it.
    pub fn publish(&mut self, field: Heightfield) {
        self.mesh = Some(build_mesh(&field));
        self.heightfield = Some(field);
    }

    pub fn heightfield(&self) -> Option<&Heightfield> {
        self.heightfield.as_ref()
    }

    pub fn is_built(&self) -> bool {
        self.heightfield.is_some()
    }

    /// Place the terrain in the world. `transform` must be invertible.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        self.inverse = transform.inverse();
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Translate the terrain so its grid is centred on the world origin in X/Z.
    pub fn center_on_origin(&mut self) {
        let Some(field) = &self.heightfield else {
            return;
        };
        let (extent_x, extent_z) = field.extent();
        let offset = Vec3::new(-extent_x * 0.5, 0.0, -extent_z * 0.5);
        self.set_transform(Mat4::from_translation(offset) * self.transform);
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn set_size(&mut self, size: Vec3) {
        self.size = size;
    }

    /// Height (local Y) at object-space `(lx, lz)`; `0` while unbuilt.
    pub fn sample_local(&self, lx: f32, lz: f32) -> f32 {
        self.heightfield
            .as_ref()
            .map_or(0.0, |field| field.sample_local(lx, lz))
    }
}

impl HeightQuery for Terrain {
    /// World `(x, z)` is taken to object space with `y = 0`, sampled there.
    fn height_at_world(&self, x: f32, z: f32) -> f32 {
        let local = self.inverse.transform_point3(Vec3::new(x, 0.0, z));
        self.sample_local(local.x, local.z)
    }
}

impl ProvidesMeshBuffers for Terrain {
    fn mesh_buffers(&self) -> Option<&MeshBuffers> {
        self.mesh.as_ref()
    }
}

impl ProvidesWorldTransform for Terrain {
    fn world_transform(&self) -> Mat4 {
        self.transform
    }
}
