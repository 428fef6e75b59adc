//! CPU-side geometry for the primitives the scene draws.
//!
//! Everything here is plain vertex/index data. [`RawGeometry::upload`] turns it into a GPU
//! [`Mesh`]; the view-volume mesh is rebuilt as a [`RawGeometry`] every frame and written
//! into an existing mesh instead.
//!
//! | Primitive | Extent | Notes |
//! |-----------|--------|-------|
//! | [`RawGeometry::cube`] | unit cube centered at the origin | 4 vertices per face |
//! | [`RawGeometry::sphere`] | radius 1 | latitude/longitude grid |
//! | [`RawGeometry::floor`] | `2 * half_extent` square on XZ | tiled UVs |

use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex3d};

/// Raw geometry data before GPU upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawGeometry {
    /// Vertex positions, normals, and UVs.
    pub vertices: Vec<Vertex3d>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

impl RawGeometry {
    /// Creates raw geometry from vertices and indices.
    pub fn new(vertices: Vec<Vertex3d>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Unit cube centered at the origin, one quad per face with flat normals.
    pub fn cube() -> Self {
        #[rustfmt::skip]
        let vertices = vec![
            // Front face (Z+)
            Vertex3d::new([-0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 1.0]),
            Vertex3d::new([ 0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 1.0]),
            Vertex3d::new([ 0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 0.0]),
            Vertex3d::new([-0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 0.0]),
            // Back face (Z-)
            Vertex3d::new([ 0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 1.0]),
            Vertex3d::new([-0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 1.0]),
            Vertex3d::new([-0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 0.0]),
            Vertex3d::new([ 0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 0.0]),
            // Top face (Y+)
            Vertex3d::new([-0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [0.0, 1.0]),
            Vertex3d::new([ 0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [1.0, 1.0]),
            Vertex3d::new([ 0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [1.0, 0.0]),
            Vertex3d::new([-0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [0.0, 0.0]),
            // Bottom face (Y-)
            Vertex3d::new([-0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [0.0, 1.0]),
            Vertex3d::new([ 0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [1.0, 1.0]),
            Vertex3d::new([ 0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [1.0, 0.0]),
            Vertex3d::new([-0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [0.0, 0.0]),
            // Right face (X+)
            Vertex3d::new([ 0.5, -0.5,  0.5], [ 1.0,  0.0,  0.0], [0.0, 1.0]),
            Vertex3d::new([ 0.5, -0.5, -0.5], [ 1.0,  0.0,  0.0], [1.0, 1.0]),
            Vertex3d::new([ 0.5,  0.5, -0.5], [ 1.0,  0.0,  0.0], [1.0, 0.0]),
            Vertex3d::new([ 0.5,  0.5,  0.5], [ 1.0,  0.0,  0.0], [0.0, 0.0]),
            // Left face (X-)
            Vertex3d::new([-0.5, -0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 1.0]),
            Vertex3d::new([-0.5, -0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 1.0]),
            Vertex3d::new([-0.5,  0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 0.0]),
            Vertex3d::new([-0.5,  0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 0.0]),
        ];

        let indices = (0..6u32)
            .flat_map(|face| quad_indices(face * 4))
            .collect();

        Self::new(vertices, indices)
    }

    /// Sphere of radius 1 centered at the origin.
    ///
    /// `segments` divides the equator, `rings` divides pole to pole.
    pub fn sphere(segments: u32, rings: u32) -> Self {
        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
        let mut indices = Vec::with_capacity((segments * rings * 6) as usize);

        for ring in 0..=rings {
            let theta = std::f32::consts::PI * ring as f32 / rings as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            for seg in 0..=segments {
                let phi = std::f32::consts::TAU * seg as f32 / segments as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();
                let p = [cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
                let uv = [
                    1.0 - seg as f32 / segments as f32,
                    ring as f32 / rings as f32,
                ];
                vertices.push(Vertex3d::new(p, p, uv));
            }
        }

        for ring in 0..rings {
            for seg in 0..segments {
                let current = ring * (segments + 1) + seg;
                let next = current + segments + 1;

                indices.extend_from_slice(&[current, current + 1, next]);
                indices.extend_from_slice(&[current + 1, next + 1, next]);
            }
        }

        Self::new(vertices, indices)
    }

    /// Horizontal square on the XZ plane with normals facing up.
    ///
    /// The texture repeats `uv_repeat` times along each side.
    pub fn floor(half_extent: f32, uv_repeat: f32) -> Self {
        let h = half_extent;
        let r = uv_repeat;
        let vertices = vec![
            Vertex3d::new([-h, 0.0, h], [0.0, 1.0, 0.0], [r, 0.0]),
            Vertex3d::new([h, 0.0, h], [0.0, 1.0, 0.0], [r, r]),
            Vertex3d::new([h, 0.0, -h], [0.0, 1.0, 0.0], [0.0, r]),
            Vertex3d::new([-h, 0.0, -h], [0.0, 1.0, 0.0], [0.0, 0.0]),
        ];
        Self::new(vertices, vec![0, 1, 2, 0, 2, 3])
    }

    /// Uploads this geometry to the GPU as a [`Mesh`].
    pub fn upload(&self, gpu: &GpuContext, label: &str) -> Mesh {
        Mesh::new(gpu, &self.vertices, &self.indices, label)
    }
}

/// Two triangles covering the quad that starts at vertex `base`.
pub(crate) fn quad_indices(base: u32) -> [u32; 6] {
    [base, base + 1, base + 2, base + 2, base + 3, base]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn extent(geometry: &RawGeometry) -> (Vec3, Vec3) {
        geometry.vertices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), v| (min.min(v.position.into()), max.max(v.position.into())),
        )
    }

    #[test]
    fn cube_is_unit_and_centered() {
        let cube = RawGeometry::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_eq!(extent(&cube), (Vec3::splat(-0.5), Vec3::splat(0.5)));
    }

    #[test]
    fn cube_faces_wind_outward() {
        let cube = RawGeometry::cube();
        for tri in cube.indices.chunks(3) {
            let p: Vec<Vec3> = tri
                .iter()
                .map(|&i| Vec3::from(cube.vertices[i as usize].position))
                .collect();
            let n = Vec3::from(cube.vertices[tri[0] as usize].normal);
            assert!((p[1] - p[0]).cross(p[2] - p[0]).dot(n) > 0.0);
        }
    }

    #[test]
    fn sphere_vertices_lie_on_unit_radius() {
        let sphere = RawGeometry::sphere(30, 30);
        assert_eq!(sphere.vertices.len(), 31 * 31);
        assert_eq!(sphere.indices.len(), 30 * 30 * 6);
        for v in &sphere.vertices {
            assert!((Vec3::from(v.position).length() - 1.0).abs() < 1e-5);
        }
        let (min, max) = extent(&sphere);
        assert!((min + max).length() < 1e-4);
    }

    #[test]
    fn floor_spans_requested_extent() {
        let floor = RawGeometry::floor(100.0, 25.0);
        let (min, max) = extent(&floor);
        assert_eq!(min, Vec3::new(-100.0, 0.0, -100.0));
        assert_eq!(max, Vec3::new(100.0, 0.0, 100.0));
        assert!(floor.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
    }
}
