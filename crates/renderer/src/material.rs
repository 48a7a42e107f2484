//! Terrain material parameters, packed for a uniform buffer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Terrain shader uniform (must match the terrain shader's `TerrainMaterial`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TerrainMaterial {
    /// xyz = albedo tint, w = use mix texture (0 or 1)
    pub tint: [f32; 4],
    /// x = triplanar texture scale, y = triplanar sharpness, z = rock threshold, w = rock softness
    pub surface: [f32; 4],
    /// x = fog start, y = fog end, zw unused
    pub fog: [f32; 4],
    /// xyz = fog colour, w unused
    pub fog_color: [f32; 4],
    /// xyz = terrain scaling vector, w unused
    pub scaling: [f32; 4],
}

impl Default for TerrainMaterial {
    fn default() -> Self {
        Self {
            tint: [1.06, 0.95, 0.90, 1.0],
            surface: [0.08, 4.0, 0.45, 0.10],
            fog: [80.0, 300.0, 0.0, 0.0],
            fog_color: [0.95, 0.95, 1.0, 0.0],
            scaling: [1.0, 1.0, 1.0, 0.0],
        }
    }
}

impl TerrainMaterial {
    pub fn set_triplanar(&mut self, tex_scale: f32, sharpness: f32) {
        self.surface[0] = tex_scale;
        self.surface[1] = sharpness;
    }

    pub fn set_rock(&mut self, threshold: f32, softness: f32) {
        self.surface[2] = threshold;
        self.surface[3] = softness;
    }

    pub fn set_tint(&mut self, tint: Vec3) {
        self.tint = tint.extend(self.tint[3]).to_array();
    }

    pub fn set_use_mix_texture(&mut self, enabled: bool) {
        self.tint[3] = if enabled { 1.0 } else { 0.0 };
    }

    pub fn uses_mix_texture(&self) -> bool {
        self.tint[3] > 0.5
    }

    pub fn set_fog(&mut self, start: f32, end: f32, color: Vec3) {
        self.fog[0] = start;
        self.fog[1] = end;
        self.fog_color = color.extend(0.0).to_array();
    }

    pub fn set_scaling(&mut self, scaling: Vec3) {
        self.scaling = scaling.extend(0.0).to_array();
    }
}
