//! CPU-side mesh buffers and the append-only sink contract mesh builders write to.
//!
//! A vertex is assembled attribute by attribute: normal, texcoord set 0,
//! texcoord set 1, then the position, which commits the vertex. Index data goes
//! to a separate sink. Both sinks are opened with `begin` and closed with `end`.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Interleaved mesh vertex with two texture-coordinate sets.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Texcoord set 0 (spans the whole mesh once).
    pub uv0: [f32; 2],
    /// Texcoord set 1 (tiled detail texturing).
    pub uv1: [f32; 2],
}

/// Append-only vertex sink.
pub trait VertexSink {
    fn begin(&mut self);
    fn add_normal(&mut self, normal: Vec3);
    fn add_texcoord0(&mut self, uv: Vec2);
    fn add_texcoord1(&mut self, uv: Vec2);
    /// Commit a vertex at `position` using the attributes added since the last commit.
    fn add_vertex(&mut self, position: Vec3);
    fn end(&mut self);
}

/// Append-only index sink.
pub trait IndexSink {
    fn begin(&mut self);
    fn add_index(&mut self, index: u32);
    fn end(&mut self);
}

/// Growable vertex buffer implementing [`VertexSink`].
#[derive(Debug, Clone, Default)]
pub struct VertexBuffer {
    vertices: Vec<MeshVertex>,
    pending: MeshVertex,
    open: bool,
}

impl VertexBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// True once `end` has closed the buffer.
    pub fn is_finished(&self) -> bool {
        !self.open
    }
}

impl VertexSink for VertexBuffer {
    fn begin(&mut self) {
        self.vertices.clear();
        self.pending = MeshVertex::zeroed();
        self.open = true;
    }

    fn add_normal(&mut self, normal: Vec3) {
        debug_assert!(self.open, "vertex buffer written outside begin/end");
        self.pending.normal = normal.to_array();
    }

    fn add_texcoord0(&mut self, uv: Vec2) {
        debug_assert!(self.open, "vertex buffer written outside begin/end");
        self.pending.uv0 = uv.to_array();
    }

    fn add_texcoord1(&mut self, uv: Vec2) {
        debug_assert!(self.open, "vertex buffer written outside begin/end");
        self.pending.uv1 = uv.to_array();
    }

    fn add_vertex(&mut self, position: Vec3) {
        debug_assert!(self.open, "vertex buffer written outside begin/end");
        self.pending.position = position.to_array();
        self.vertices.push(self.pending);
    }

    fn end(&mut self) {
        self.open = false;
    }
}

/// Growable `u32` index buffer implementing [`IndexSink`].
#[derive(Debug, Clone, Default)]
pub struct IndexBuffer {
    indices: Vec<u32>,
    open: bool,
}

impl IndexBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        !self.open
    }
}

impl IndexSink for IndexBuffer {
    fn begin(&mut self) {
        self.indices.clear();
        self.open = true;
    }

    fn add_index(&mut self, index: u32) {
        debug_assert!(self.open, "index buffer written outside begin/end");
        self.indices.push(index);
    }

    fn end(&mut self) {
        self.open = false;
    }
}

/// Vertex + index buffers of one renderable mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    pub vertices: VertexBuffer,
    pub indices: IndexBuffer,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Every index references an existing vertex.
    pub fn indices_in_bounds(&self) -> bool {
        let count = self.vertices.len() as u32;
        self.indices.indices().iter().all(|&i| i < count)
    }
}
