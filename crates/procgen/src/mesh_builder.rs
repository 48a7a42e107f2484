//! Triangulated mesh derivation shared by procedural and image-loaded heightfields.

use engine_core::{IndexSink, MeshBuffers, VertexSink};
use glam::{Vec2, Vec3};

use crate::heightfield::Heightfield;

/// Repeat count of texcoord set 1 across the grid.
pub const DETAIL_UV_REPEAT: f32 = 100.0;

/// Build a fresh [`MeshBuffers`] for `field`.
pub fn build_mesh(field: &Heightfield) -> MeshBuffers {
    let mut mesh = MeshBuffers::new();
    write_mesh(field, &mut mesh.vertices, &mut mesh.indices);
    log::debug!(
        "Built terrain mesh: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    mesh
}

/// Stream the mesh of `field` into the given sinks.
///
/// Per vertex the sink receives the smoothed normal, texcoord set 0 spanning `[0, 1]`,
/// texcoord set 1 (`set 0 * DETAIL_UV_REPEAT`) and finally the position. Two
/// triangles per grid cell go to the index sink in row-major cell order.
pub fn write_mesh(field: &Heightfield, vertices: &mut impl VertexSink, indices: &mut impl IndexSink) {
    let (width, depth) = (field.width(), field.depth());
    let positions = grid_positions(field);
    let normals = smooth_normals(&accumulate_face_normals(&positions, width, depth), width, depth);

    let u_span = width.saturating_sub(1).max(1) as f32;
    let v_span = depth.saturating_sub(1).max(1) as f32;

    vertices.begin();
    for z in 0..depth {
        for x in 0..width {
            let i = x + z * width;
            let uv = Vec2::new(x as f32 / u_span, z as f32 / v_span);
            vertices.add_normal(normals[i]);
            vertices.add_texcoord0(uv);
            vertices.add_texcoord1(uv * DETAIL_UV_REPEAT);
            vertices.add_vertex(positions[i]);
        }
    }
    vertices.end();

    indices.begin();
    for z in 0..depth.saturating_sub(1) {
        for x in 0..width.saturating_sub(1) {
            let i = (x + z * width) as u32;
            let w = width as u32;
            indices.add_index(i);
            indices.add_index(i + w + 1);
            indices.add_index(i + 1);

            indices.add_index(i);
            indices.add_index(i + w);
            indices.add_index(i + w + 1);
        }
    }
    indices.end();
}

fn grid_positions(field: &Heightfield) -> Vec<Vec3> {
    let ws = field.world_scale();
    let hs = field.height_scale();
    let mut positions = Vec::with_capacity(field.samples().len());
    for z in 0..field.depth() {
        for x in 0..field.width() {
            positions.push(Vec3::new(x as f32 * ws, field.get(x, z) * hs, z as f32 * ws));
        }
    }
    positions
}

/// Sum (not average) of the face normals of every triangle touching each vertex.
fn accumulate_face_normals(positions: &[Vec3], width: usize, depth: usize) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for z in 0..depth.saturating_sub(1) {
        for x in 0..width.saturating_sub(1) {
            let tl = x + z * width;
            let tr = tl + 1;
            let bl = tl + width;
            let br = bl + 1;

            // Diagonal runs from bottom-left to top-right.
            let n1 = (positions[bl] - positions[tl]).cross(positions[tr] - positions[tl]);
            normals[tl] += n1;
            normals[bl] += n1;
            normals[tr] += n1;

            let n2 = (positions[bl] - positions[tr]).cross(positions[br] - positions[tr]);
            normals[tr] += n2;
            normals[bl] += n2;
            normals[br] += n2;
        }
    }

    normals
}

/// 3x3 box blur in normal space followed by normalisation.
///
/// The vertex's own normal seeds the sum and is added again by the window, so it
/// carries twice the weight of each neighbour.
fn smooth_normals(accumulated: &[Vec3], width: usize, depth: usize) -> Vec<Vec3> {
    let mut smoothed = Vec::with_capacity(accumulated.len());
    for z in 0..depth {
        for x in 0..width {
            let mut acc = accumulated[x + z * width];
            for nz in z.saturating_sub(1)..=(z + 1).min(depth - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                    acc += accumulated[nx + nz * width];
                }
            }
            smoothed.push(acc.try_normalize().unwrap_or(Vec3::Y));
        }
    }
    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diamond_square::{generate, DiamondSquareParams};

    fn flat(width: usize, depth: usize, level: f32) -> Heightfield {
        Heightfield::from_samples(width, depth, vec![level; width * depth], 2.0, 4.0).unwrap()
    }

    #[test]
    fn counts_cover_the_full_cell_grid() {
        let mesh = build_mesh(&flat(4, 3, 0.5));
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.index_count(), 3 * 2 * 6);
        assert!(mesh.indices_in_bounds());
        assert!(mesh.vertices.is_finished());
        assert!(mesh.indices.is_finished());
    }

    #[test]
    fn first_cell_emits_the_fixed_diagonal_triangles() {
        let mesh = build_mesh(&flat(3, 3, 0.0));
        assert_eq!(&mesh.indices.indices()[..6], &[0, 4, 1, 0, 3, 4]);
        // Second cell in the same row follows directly.
        assert_eq!(&mesh.indices.indices()[6..12], &[1, 5, 2, 1, 4, 5]);
    }

    #[test]
    fn positions_and_texcoords_follow_the_grid() {
        let mesh = build_mesh(&flat(3, 5, 0.5));
        let v = mesh.vertices.vertices();
        let last = v[v.len() - 1];
        assert_eq!(last.position, [4.0, 2.0, 8.0]);
        assert_eq!(last.uv0, [1.0, 1.0]);
        assert_eq!(last.uv1, [100.0, 100.0]);
        assert_eq!(v[1].uv0, [0.5, 0.0]);
        assert_eq!(v[1].uv1, [50.0, 0.0]);
    }

    #[test]
    fn flat_terrain_normals_point_up() {
        let mesh = build_mesh(&flat(5, 5, 0.25));
        for vertex in mesh.vertices.vertices() {
            assert!((glam::Vec3::from(vertex.normal) - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn slope_normals_lean_downhill() {
        // Height rises with x, so normals tilt towards -x.
        let samples: Vec<f32> = (0..16).map(|i| (i % 4) as f32 / 3.0).collect();
        let field = Heightfield::from_samples(4, 4, samples, 1.0, 3.0).unwrap();
        let mesh = build_mesh(&field);
        for vertex in mesh.vertices.vertices() {
            let n = Vec3::from(vertex.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(n.x < 0.0 && n.y > 0.0);
            assert!(n.z.abs() < 1e-5);
        }
    }

    #[test]
    fn own_normal_weighs_double_in_smoothing() {
        #[rustfmt::skip]
        let samples = vec![
            0.0, 0.3, 0.9,
            0.2, 0.5, 0.1,
            0.7, 0.4, 0.8,
        ];
        let field = Heightfield::from_samples(3, 3, samples, 1.0, 3.0).unwrap();
        let acc = accumulate_face_normals(&grid_positions(&field), 3, 3);
        let expected = (acc[0] * 2.0 + acc[1] + acc[3] + acc[4]).normalize();

        let mesh = build_mesh(&field);
        let corner = Vec3::from(mesh.vertices.vertices()[0].normal);
        assert!((corner - expected).length() < 1e-5);
        assert!((corner - Vec3::new(-0.48847, 0.81412, -0.31402)).length() < 1e-4);

        let single = (acc[0] + acc[1] + acc[3] + acc[4]).normalize();
        assert!((corner - single).length() > 1e-2);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let field = generate(&DiamondSquareParams {
            size: 17,
            ..Default::default()
        })
        .unwrap();
        let a = build_mesh(&field);
        let b = build_mesh(&field);
        assert_eq!(a.vertices.vertices(), b.vertices.vertices());
        assert_eq!(a.indices.indices(), b.indices.indices());
    }

    #[test]
    fn single_row_has_no_triangles() {
        let mesh = build_mesh(&flat(4, 1, 0.5));
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 0);
        assert!(mesh.vertices.vertices().iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
    }
}
