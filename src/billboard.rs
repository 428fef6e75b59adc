//! Camera-facing sprite quads.
//!
//! A billboard's orientation is read from `view * model`: the rows of that matrix's upper
//! 3×3 are the camera axes expressed in the sprite's model space. Y-locked sprites only
//! turn about world up; full sprites face the camera exactly.

use glam::{Mat4, Vec2, Vec3};

use crate::mesh::Vertex3d;

/// How a billboard follows the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BillboardMode {
    /// Upright sprite rotating about world up (grass, banana).
    #[default]
    YLocked,
    /// Sprite facing the camera exactly (fish).
    Full,
}

/// Right and up vectors of a billboard quad in model space.
///
/// With billboarding disabled the sprite keeps a fixed orientation facing `+Z`.
pub fn basis(view_model: Mat4, mode: BillboardMode, enabled: bool) -> (Vec3, Vec3) {
    let z = if enabled {
        view_model.row(2).truncate()
    } else {
        Vec3::NEG_Z
    };

    match mode {
        BillboardMode::YLocked => (Vec3::new(z.z, 0.0, -z.x), Vec3::Y),
        BillboardMode::Full if enabled => (
            view_model.row(0).truncate(),
            view_model.row(1).truncate(),
        ),
        BillboardMode::Full => (Vec3::new(z.z, 0.0, -z.x), Vec3::Y),
    }
}

/// Two triangles for a sprite whose bottom edge is centered at `anchor`.
pub fn quad(anchor: Vec3, size: Vec2, right: Vec3, up: Vec3) -> [Vertex3d; 6] {
    let half = right * (size.x / 2.0);
    let v0 = anchor - half;
    let v1 = anchor + half;
    let v2 = v1 + up * size.y;
    let v3 = v0 + up * size.y;
    let normal = right.cross(up).normalize_or_zero().to_array();

    let vertex = |p: Vec3, uv: [f32; 2]| Vertex3d::new(p.to_array(), normal, uv);
    [
        vertex(v0, [0.0, 1.0]),
        vertex(v3, [0.0, 0.0]),
        vertex(v2, [1.0, 0.0]),
        vertex(v0, [0.0, 1.0]),
        vertex(v2, [1.0, 0.0]),
        vertex(v1, [1.0, 1.0]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn y_locked_stays_upright() {
        let eye = Vec3::new(4.0, 6.0, 4.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let (right, up) = basis(view, BillboardMode::YLocked, true);
        assert_eq!(up, Vec3::Y);
        assert_abs_diff_eq!(right.y, 0.0);
        assert_abs_diff_eq!(right.dot(Vec3::new(eye.x, 0.0, eye.z)), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn full_matches_camera_axes() {
        let view = Mat4::look_at_rh(Vec3::new(1.0, 5.0, 3.0), Vec3::ZERO, Vec3::Y);
        let (right, up) = basis(view, BillboardMode::Full, true);
        let inv = view.inverse();
        assert!(right.abs_diff_eq(inv.x_axis.truncate(), 1e-5));
        assert!(up.abs_diff_eq(inv.y_axis.truncate(), 1e-5));
    }

    #[test]
    fn disabled_uses_fixed_orientation() {
        let view = Mat4::look_at_rh(Vec3::new(9.0, 2.0, 1.0), Vec3::ZERO, Vec3::Y);
        for mode in [BillboardMode::YLocked, BillboardMode::Full] {
            let (right, up) = basis(view, mode, false);
            assert_eq!(right, Vec3::new(-1.0, 0.0, 0.0));
            assert_eq!(up, Vec3::Y);
        }
    }

    #[test]
    fn quad_spans_size_above_anchor() {
        let vertices = quad(Vec3::new(0.0, -5.0, 0.0), Vec2::new(2.0, 3.0), Vec3::X, Vec3::Y);
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        assert_eq!(ys.iter().copied().fold(f32::INFINITY, f32::min), -5.0);
        assert_eq!(ys.iter().copied().fold(f32::NEG_INFINITY, f32::max), -2.0);
        assert_eq!(xs.iter().copied().fold(f32::INFINITY, f32::min), -1.0);
        assert_eq!(xs.iter().copied().fold(f32::NEG_INFINITY, f32::max), 1.0);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
    }
}
