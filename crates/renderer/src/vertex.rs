//! GPU vertex buffer layouts.

use engine_core::MeshVertex;

/// Types with a fixed GPU vertex buffer layout.
pub trait VertexLayout {
    fn layout() -> wgpu::VertexBufferLayout<'static>;
}

/// position, normal, uv0 (whole terrain), uv1 (tiled detail).
const MESH_VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Float32x2,
    3 => Float32x2
];

impl VertexLayout for MeshVertex {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &MESH_VERTEX_ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_vertex_layout_matches_struct() {
        let layout = MeshVertex::layout();
        assert_eq!(layout.array_stride, 40);
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24, 32]);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
    }

    #[test]
    fn attribute_locations_are_sequential() {
        let locations: Vec<u32> = MeshVertex::layout()
            .attributes
            .iter()
            .map(|a| a.shader_location)
            .collect();
        assert_eq!(locations, vec![0, 1, 2, 3]);
    }
}
