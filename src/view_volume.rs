//! World-space reconstruction of the main camera's view volume.
//!
//! The corners are built in camera space from [`ProjectionState`] and carried into world
//! space by the inverse view matrix. The near plane is pulled `EPSILON` toward the camera
//! and the far plane pushed `EPSILON` away so the visualization never z-fights with the
//! clip planes of the camera it depicts.

use glam::{Mat4, Vec3};

use crate::geometry::{RawGeometry, quad_indices};
use crate::mesh::Vertex3d;
use crate::projection::ProjectionState;

/// Offset applied to the near and far planes of the reconstructed volume.
pub const EPSILON: f32 = 0.01;

/// Number of vertices in the view-volume mesh.
pub const VERTEX_COUNT: usize = 24;
/// Number of indices in the view-volume mesh.
pub const INDEX_COUNT: usize = 36;

/// Corner order within a plane.
const RT: usize = 0;
const LT: usize = 1;
const RB: usize = 2;
const LB: usize = 3;

/// The eight corners of a view volume.
///
/// Each plane stores its corners in the order right-top, left-top, right-bottom,
/// left-bottom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewVolume {
    pub near: [Vec3; 4],
    pub far: [Vec3; 4],
}

impl ViewVolume {
    /// Corners in camera space for the given projection.
    pub fn camera_space(projection: &ProjectionState) -> Self {
        let (rn, tn) = (projection.right, projection.top);
        let (rf, tf) = projection.far_extents();
        let zn = -(projection.near - EPSILON);
        let zf = -(projection.far + EPSILON);

        Self {
            near: plane(rn, tn, zn),
            far: plane(rf, tf, zf),
        }
    }

    /// Corners in world space for a camera with the given view matrix.
    pub fn reconstruct(projection: &ProjectionState, view: Mat4) -> Self {
        Self::camera_space(projection).transformed(view.inverse())
    }

    /// Applies `matrix` to every corner.
    pub fn transformed(&self, matrix: Mat4) -> Self {
        Self {
            near: self.near.map(|p| matrix.transform_point3(p)),
            far: self.far.map(|p| matrix.transform_point3(p)),
        }
    }

    /// All eight corners, near plane first.
    pub fn corners(&self) -> [Vec3; 8] {
        let [a, b, c, d] = self.near;
        let [e, f, g, h] = self.far;
        [a, b, c, d, e, f, g, h]
    }

    /// Mean of the eight corners.
    pub fn centroid(&self) -> Vec3 {
        self.corners().iter().copied().sum::<Vec3>() / 8.0
    }

    /// The six faces of the volume as a 24-vertex, 36-index mesh.
    ///
    /// Every quad is wound counter-clockwise when seen from outside the volume and
    /// carries a flat normal pointing away from it.
    pub fn geometry(&self) -> RawGeometry {
        let (n, f) = (&self.near, &self.far);
        let faces: [[Vec3; 4]; 6] = [
            // front (near plane)
            [n[LB], n[RB], n[RT], n[LT]],
            // back (far plane)
            [f[RB], f[LB], f[LT], f[RT]],
            // left
            [f[LB], n[LB], n[LT], f[LT]],
            // right
            [n[RB], f[RB], f[RT], n[RT]],
            // top
            [n[LT], n[RT], f[RT], f[LT]],
            // bottom
            [f[LB], f[RB], n[RB], n[LB]],
        ];

        let centroid = self.centroid();
        let mut vertices = Vec::with_capacity(VERTEX_COUNT);
        let mut indices = Vec::with_capacity(INDEX_COUNT);

        for (i, quad) in faces.iter().enumerate() {
            let mut normal = (quad[1] - quad[0])
                .cross(quad[3] - quad[0])
                .normalize_or_zero();
            let face_center = quad.iter().copied().sum::<Vec3>() / 4.0;
            if normal.dot(face_center - centroid) < 0.0 {
                normal = -normal;
            }

            let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
            for (corner, uv) in quad.iter().zip(uvs) {
                vertices.push(Vertex3d::new(corner.to_array(), normal.to_array(), uv));
            }
            indices.extend_from_slice(&quad_indices(i as u32 * 4));
        }

        RawGeometry::new(vertices, indices)
    }
}

fn plane(right: f32, top: f32, z: f32) -> [Vec3; 4] {
    let mut corners = [Vec3::ZERO; 4];
    corners[RT] = Vec3::new(right, top, z);
    corners[LT] = Vec3::new(-right, top, z);
    corners[RB] = Vec3::new(right, -top, z);
    corners[LB] = Vec3::new(-right, -top, z);
    corners
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square_perspective() -> ProjectionState {
        let mut projection = ProjectionState::new(0.1, 250.0);
        projection.update(45.0, 1.0);
        projection
    }

    #[test]
    fn near_corners_are_symmetric() {
        let volume = ViewVolume::camera_space(&square_perspective());
        assert_eq!(volume.near[RT].x, -volume.near[LT].x);
        assert_eq!(volume.near[RT].y, -volume.near[RB].y);
        assert_abs_diff_eq!(volume.near[RT].z, -(0.1 - EPSILON), epsilon = 1e-7);
        assert_abs_diff_eq!(volume.far[LB].z, -(250.0 + EPSILON), epsilon = 1e-4);
    }

    #[test]
    fn perspective_far_plane_scales_with_distance() {
        let projection = square_perspective();
        let volume = ViewVolume::camera_space(&projection);
        let hn = (22.5f32).to_radians().tan() * 0.1;
        assert_abs_diff_eq!(volume.near[RT].y, hn, epsilon = 1e-6);
        assert_abs_diff_eq!(volume.far[RT].y, hn * 2500.0, epsilon = 1e-2);
    }

    #[test]
    fn orthographic_planes_share_extents() {
        let mut projection = square_perspective();
        projection.toggle();
        let volume = ViewVolume::camera_space(&projection);
        for i in 0..4 {
            assert_eq!(volume.near[i].x, volume.far[i].x);
            assert_eq!(volume.near[i].y, volume.far[i].y);
        }
    }

    #[test]
    fn reconstruct_uses_inverse_view() {
        let projection = square_perspective();
        let eye = Vec3::new(3.0, 1.0, 7.0);
        let view = Mat4::look_at_rh(eye, eye + Vec3::NEG_Z, Vec3::Y);
        let world = ViewVolume::reconstruct(&projection, view);
        let local = ViewVolume::camera_space(&projection);
        for (w, l) in world.corners().iter().zip(local.corners()) {
            assert!(w.abs_diff_eq(l + eye, 1e-3));
        }
    }

    #[test]
    fn geometry_has_fixed_size_and_outward_normals() {
        let volume = ViewVolume::camera_space(&square_perspective());
        let geometry = volume.geometry();
        assert_eq!(geometry.vertices.len(), VERTEX_COUNT);
        assert_eq!(geometry.indices.len(), INDEX_COUNT);

        let centroid = volume.centroid();
        for face in geometry.vertices.chunks(4) {
            let center = face
                .iter()
                .map(|v| Vec3::from(v.position))
                .sum::<Vec3>()
                / 4.0;
            let normal = Vec3::from(face[0].normal);
            assert_abs_diff_eq!(normal.length(), 1.0, epsilon = 1e-4);
            assert!(normal.dot(center - centroid) > 0.0);
        }
    }
}
