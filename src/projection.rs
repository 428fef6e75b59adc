//! Projection matrices and the shared projection state of the main viewport.
//!
//! [`perspective`] and [`orthographic`] are pure OpenGL-style builders (right-handed, clip
//! depth in `[-1, 1]`). [`ProjectionState`] owns the near/far planes and the frustum
//! extents that both the main viewport and the view-volume mesh read every frame.

use glam::{Mat4, Vec4};

/// Near plane used by the axis-aligned monitor views.
pub const AXIS_NEAR: f32 = 0.1;
/// Far plane used by the axis-aligned monitor views.
pub const AXIS_FAR: f32 = 250.0;

/// Scale that turns the zoom angle into an orthographic half extent.
const ORTHO_ZOOM_SCALE: f32 = 50.0;

/// Right-handed perspective projection with clip depth in `[-1, 1]`.
///
/// `fov_y` is the vertical field of view in radians.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    debug_assert!(fov_y > 0.0 && fov_y < std::f32::consts::PI, "fov out of range");
    debug_assert!(aspect > 0.0, "aspect must be positive");
    debug_assert!(near > 0.0 && far > near, "degenerate clip planes");

    let f = 1.0 / (fov_y / 2.0).tan();
    let depth = near - far;
    Mat4::from_cols(
        Vec4::new(f / aspect, 0.0, 0.0, 0.0),
        Vec4::new(0.0, f, 0.0, 0.0),
        Vec4::new(0.0, 0.0, (far + near) / depth, -1.0),
        Vec4::new(0.0, 0.0, 2.0 * far * near / depth, 0.0),
    )
}

/// Right-handed orthographic projection with clip depth in `[-1, 1]`.
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    debug_assert!(left != right && bottom != top && near != far, "degenerate ortho box");

    let w = right - left;
    let h = top - bottom;
    let d = far - near;
    Mat4::from_cols(
        Vec4::new(2.0 / w, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 / h, 0.0, 0.0),
        Vec4::new(0.0, 0.0, -2.0 / d, 0.0),
        Vec4::new(-(right + left) / w, -(top + bottom) / h, -(far + near) / d, 1.0),
    )
}

/// Half extents `(right, top)` of an orthographic box whose larger side is `length`.
pub fn ortho_half_extents(length: f32, aspect: f32) -> (f32, f32) {
    if aspect > 1.0 {
        (length, length / aspect)
    } else {
        (length * aspect, length)
    }
}

/// Orthographic projection of an axis-aligned monitor that frames `distance` units.
pub fn axis_projection(distance: f32, aspect: f32) -> Mat4 {
    let (r, t) = ortho_half_extents(distance, aspect);
    orthographic(-r, r, -t, t, AXIS_NEAR, AXIS_FAR)
}

/// Projection parameters of the main viewport.
///
/// The extents (`left`, `right`, `bottom`, `top`) describe the near plane and are
/// refreshed by [`ProjectionState::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionState {
    /// Perspective when `true`, orthographic otherwise.
    pub perspective: bool,
    pub near: f32,
    pub far: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    /// Width over height.
    pub aspect: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Default for ProjectionState {
    fn default() -> Self {
        let mut state = Self {
            perspective: true,
            near: 0.1,
            far: 250.0,
            zoom: 45.0,
            aspect: 800.0 / 600.0,
            left: 0.0,
            right: 0.0,
            bottom: 0.0,
            top: 0.0,
        };
        state.update(45.0, 800.0 / 600.0);
        state
    }
}

impl ProjectionState {
    /// Creates a perspective state with the given clip planes.
    pub fn new(near: f32, far: f32) -> Self {
        let mut state = Self {
            near,
            far,
            ..Self::default()
        };
        state.update(state.zoom, state.aspect);
        state
    }

    /// Recomputes the near-plane extents from the active camera zoom and the aspect ratio.
    ///
    /// In orthographic mode the zoom angle stands in for a scale: the box spans
    /// `tan(zoom / 2) * near * 50` along its larger side.
    pub fn update(&mut self, zoom_degrees: f32, aspect: f32) {
        debug_assert!(self.near > 0.0 && self.far > self.near, "degenerate clip planes");

        self.zoom = zoom_degrees;
        self.aspect = aspect;

        let half_angle = (zoom_degrees / 2.0).to_radians().tan();
        let (r, t) = if self.perspective {
            let t = half_angle * self.near;
            (t * aspect, t)
        } else {
            ortho_half_extents(half_angle * self.near * ORTHO_ZOOM_SCALE, aspect)
        };

        self.left = -r;
        self.right = r;
        self.bottom = -t;
        self.top = t;
    }

    /// Half extents `(right, top)` of the far plane.
    pub fn far_extents(&self) -> (f32, f32) {
        if self.perspective {
            let ratio = self.far / self.near;
            (self.right * ratio, self.top * ratio)
        } else {
            (self.right, self.top)
        }
    }

    /// Flips between perspective and orthographic, keeping the extents current.
    pub fn toggle(&mut self) -> bool {
        self.perspective = !self.perspective;
        self.update(self.zoom, self.aspect);
        self.perspective
    }

    /// Projection matrix of the main viewport.
    pub fn matrix(&self) -> Mat4 {
        if self.perspective {
            perspective(self.zoom.to_radians(), self.aspect, self.near, self.far)
        } else {
            orthographic(
                self.left,
                self.right,
                self.bottom,
                self.top,
                self.near,
                self.far,
            )
        }
    }
}
