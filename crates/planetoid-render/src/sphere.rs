//! UV-sphere mesh generation.
//!
//! Vertices are laid out in `rings + 1` rows of `segments + 1` columns, north
//! pole first. The seam column is duplicated so UVs wrap cleanly, and the pole
//! rows emit one triangle per quad instead of two.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Minimum horizontal segment count.
pub const MIN_SEGMENTS: u32 = 3;
/// Minimum vertical ring count.
pub const MIN_RINGS: u32 = 2;

/// Vertex layout shared by every sphere material.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl SphereVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side sphere mesh, ready to upload with [`crate::MeshBuffer::from_sphere`].
#[derive(Debug, Clone)]
pub struct SphereGeometry {
    pub radius: f32,
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereGeometry {
    /// Build a full sphere centered at the origin. Segment and ring counts
    /// below the minimum are raised to it.
    pub fn new(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(MIN_SEGMENTS);
        let rings = rings.max(MIN_RINGS);

        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
        let mut grid = Vec::with_capacity((rings + 1) as usize);

        for iy in 0..=rings {
            let v = iy as f32 / rings as f32;
            // Pole vertices sit in the middle of their quad in U.
            let u_offset = if iy == 0 {
                0.5 / segments as f32
            } else if iy == rings {
                -0.5 / segments as f32
            } else {
                0.0
            };

            let theta = v * std::f32::consts::PI;
            let mut row = Vec::with_capacity((segments + 1) as usize);
            for ix in 0..=segments {
                let u = ix as f32 / segments as f32;
                let phi = u * std::f32::consts::TAU;

                let position = Vec3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                let normal = position.normalize_or_zero();

                row.push(vertices.len() as u32);
                vertices.push(SphereVertex {
                    position: position.to_array(),
                    normal: normal.to_array(),
                    uv: [u + u_offset, 1.0 - v],
                });
            }
            grid.push(row);
        }

        let mut indices = Vec::with_capacity((segments * (rings - 1) * 6) as usize);
        for iy in 0..rings as usize {
            for ix in 0..segments as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != rings as usize - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self {
            radius,
            vertices,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_and_triangle_counts() {
        let sphere = SphereGeometry::new(100.0, 128, 128);
        assert_eq!(sphere.vertex_count(), 129 * 129);
        assert_eq!(sphere.triangle_count(), 2 * 128 * 127);
    }

    #[test]
    fn test_star_sphere_counts() {
        let star = SphereGeometry::new(1.0, 4, 4);
        assert_eq!(star.vertex_count(), 25);
        assert_eq!(star.triangle_count(), 24);
    }

    #[test]
    fn test_vertices_lie_on_radius() {
        let sphere = SphereGeometry::new(20.0, 16, 12);
        for v in &sphere.vertices {
            let len = Vec3::from(v.position).length();
            assert!((len - 20.0).abs() < 1e-3, "vertex at distance {len}");
        }
    }

    #[test]
    fn test_normals_are_unit_and_outward() {
        let sphere = SphereGeometry::new(100.0, 24, 16);
        for v in &sphere.vertices {
            let n = Vec3::from(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(n.dot(Vec3::from(v.position)) > 0.0);
        }
    }

    #[test]
    fn test_poles_first_and_last() {
        let sphere = SphereGeometry::new(1.0, 8, 6);
        let first = Vec3::from(sphere.vertices[0].position);
        let last = Vec3::from(sphere.vertices[sphere.vertex_count() - 1].position);
        assert!((first - Vec3::Y).length() < 1e-5);
        assert!((last - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_indices_in_bounds() {
        let sphere = SphereGeometry::new(5.0, 10, 7);
        let count = sphere.vertex_count() as u32;
        assert!(sphere.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn test_triangles_wind_outward() {
        let sphere = SphereGeometry::new(1.0, 12, 8);
        for tri in sphere.indices.chunks(3) {
            let p = |i: u32| Vec3::from(sphere.vertices[i as usize].position);
            let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
            let face_normal = (b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            assert!(face_normal.dot(center) > 0.0);
        }
    }

    #[test]
    fn test_degenerate_counts_are_raised() {
        let sphere = SphereGeometry::new(1.0, 0, 0);
        assert_eq!(sphere.vertex_count(), 4 * 3);
        assert_eq!(sphere.triangle_count(), 2 * 3);
    }
}
