//! Shared camera capabilities and the ghost/follow camera pair.
//!
//! Both camera variants implement [`ViewCamera`]. The viewer owns one of each inside a
//! [`CameraRig`] and resolves the active one once per frame instead of branching on a
//! mode flag at every call site.
//!
//! Angles are in degrees. Yaw `-90°` looks down `-Z`; positive pitch looks up.

use glam::{Mat4, Vec3};

use crate::freelook_camera::FreelookCamera;
use crate::orbit_camera::OrbitCamera;

/// Pitch limit applied when mouse movement is constrained.
pub const PITCH_LIMIT: f32 = 89.0;
/// Narrowest field of view reachable by scrolling.
pub const MIN_ZOOM: f32 = 1.0;
/// Widest field of view reachable by scrolling.
pub const MAX_ZOOM: f32 = 45.0;

/// Directions for keyboard-driven camera movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Orthonormal camera basis derived from yaw and pitch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Basis {
    /// Builds the basis for the given angles in degrees.
    pub fn from_angles(yaw: f32, pitch: f32) -> Self {
        let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
        let front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        // Straight up or down the cross product vanishes; fall back to the yaw-only right.
        let right = front
            .cross(Vec3::Y)
            .normalize_or(Vec3::new(-yaw.sin(), 0.0, yaw.cos()));
        let up = right.cross(front).normalize();
        Self { front, right, up }
    }
}

/// Wraps an angle into `(-360, 360)` without discontinuity in direction.
pub(crate) fn wrap_degrees(angle: f32) -> f32 {
    angle % 360.0
}

/// Capabilities shared by every camera the viewer can look through.
pub trait ViewCamera {
    fn position(&self) -> Vec3;
    fn front(&self) -> Vec3;
    fn right(&self) -> Vec3;
    fn up(&self) -> Vec3;
    fn yaw(&self) -> f32;
    fn pitch(&self) -> f32;
    /// Vertical field of view in degrees.
    fn zoom(&self) -> f32;

    /// Applies a mouse delta scaled by the camera's sensitivity.
    fn process_mouse_movement(&mut self, dx: f32, dy: f32, constrain_pitch: bool);

    /// Narrows (positive `dy`) or widens the field of view, clamped to
    /// [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    fn process_mouse_scroll(&mut self, dy: f32);

    fn view_matrix(&self) -> Mat4 {
        let position = self.position();
        Mat4::look_at_rh(position, position + self.front(), self.up())
    }
}

/// Which camera drives the main viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraMode {
    /// Free-flying camera.
    Ghost,
    /// Orbit camera tracking the ROV.
    #[default]
    Follow,
}

/// The ghost and follow cameras plus the selector between them.
#[derive(Clone, Debug)]
pub struct CameraRig {
    pub ghost: FreelookCamera,
    pub follow: OrbitCamera,
    pub mode: CameraMode,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            ghost: FreelookCamera::new().at([0.0, 2.0, 10.0]),
            follow: OrbitCamera::new().looking_from([0.0, 0.0, 6.0], Vec3::ZERO),
            mode: CameraMode::Follow,
        }
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ghost(&self) -> bool {
        self.mode == CameraMode::Ghost
    }

    /// Switches between ghost and follow and returns the new mode.
    pub fn toggle(&mut self) -> CameraMode {
        self.mode = match self.mode {
            CameraMode::Ghost => CameraMode::Follow,
            CameraMode::Follow => CameraMode::Ghost,
        };
        self.mode
    }

    /// The camera currently driving the main viewport.
    pub fn active(&self) -> &dyn ViewCamera {
        match self.mode {
            CameraMode::Ghost => &self.ghost,
            CameraMode::Follow => &self.follow,
        }
    }

    pub fn active_mut(&mut self) -> &mut dyn ViewCamera {
        match self.mode {
            CameraMode::Ghost => &mut self.ghost,
            CameraMode::Follow => &mut self.follow,
        }
    }
}
