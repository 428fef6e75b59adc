//! The free-flying "ghost" camera.
//!
//! [`FreelookCamera`] moves along its own basis and turns with mouse deltas. Holding the
//! boost key raises the movement speed from [`FreelookCamera::speed`] to
//! [`FreelookCamera::boost_speed`].
//!
//! # Example
//!
//! ```
//! use bathyscope::{CameraMovement, FreelookCamera, ViewCamera};
//!
//! let mut camera = FreelookCamera::new().at([0.0, 2.0, 10.0]);
//! camera.process_keyboard(CameraMovement::Forward, 0.5);
//! camera.process_mouse_movement(15.0, -4.0, true);
//!
//! assert!(camera.position().z < 10.0);
//! ```

use glam::Vec3;

use crate::camera::{
    Basis, CameraMovement, MAX_ZOOM, MIN_ZOOM, PITCH_LIMIT, ViewCamera, wrap_degrees,
};

/// A first-person camera driven by absolute position and Euler angles.
#[derive(Clone, Debug)]
pub struct FreelookCamera {
    /// World position.
    pub position: Vec3,
    /// Horizontal angle in degrees.
    pub yaw: f32,
    /// Vertical angle in degrees.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    /// Degrees per unit of mouse delta.
    pub sensitivity: f32,
    /// Units per second.
    pub speed: f32,
    /// Units per second while boosting.
    pub boost_speed: f32,
    boosting: bool,
    basis: Basis,
}

impl Default for FreelookCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: -90.0,
            pitch: 0.0,
            zoom: MAX_ZOOM,
            sensitivity: 0.1,
            speed: 10.0,
            boost_speed: 25.0,
            boosting: false,
            basis: Basis::from_angles(-90.0, 0.0),
        }
    }
}

impl FreelookCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the camera position.
    pub fn at(mut self, position: impl Into<Vec3>) -> Self {
        self.position = position.into();
        self
    }

    /// Set yaw and pitch in degrees.
    pub fn angles(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = wrap_degrees(yaw);
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
        self
    }

    /// Set mouse sensitivity in degrees per pixel.
    pub fn sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Set cruising and boosted speeds.
    pub fn speeds(mut self, speed: f32, boost_speed: f32) -> Self {
        self.speed = speed;
        self.boost_speed = boost_speed;
        self
    }

    /// Enable or disable the speed boost.
    pub fn set_boost(&mut self, boosting: bool) {
        self.boosting = boosting;
    }

    /// Speed currently applied to keyboard movement.
    pub fn movement_speed(&self) -> f32 {
        if self.boosting {
            self.boost_speed
        } else {
            self.speed
        }
    }

    /// Move along the camera basis by `movement_speed() * dt`.
    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.movement_speed() * dt;
        let offset = match direction {
            CameraMovement::Forward => self.basis.front,
            CameraMovement::Backward => -self.basis.front,
            CameraMovement::Left => -self.basis.right,
            CameraMovement::Right => self.basis.right,
            CameraMovement::Up => self.basis.up,
            CameraMovement::Down => -self.basis.up,
        };
        self.position += offset * velocity;
    }

    fn update_vectors(&mut self) {
        self.basis = Basis::from_angles(self.yaw, self.pitch);
    }
}

impl ViewCamera for FreelookCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn front(&self) -> Vec3 {
        self.basis.front
    }

    fn right(&self) -> Vec3 {
        self.basis.right
    }

    fn up(&self) -> Vec3 {
        self.basis.up
    }

    fn yaw(&self) -> f32 {
        self.yaw
    }

    fn pitch(&self) -> f32 {
        self.pitch
    }

    fn zoom(&self) -> f32 {
        self.zoom
    }

    fn process_mouse_movement(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw = wrap_degrees(self.yaw + dx * self.sensitivity);
        self.pitch += dy * self.sensitivity;
        self.pitch = if constrain_pitch {
            self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT)
        } else {
            wrap_degrees(self.pitch)
        };
        self.update_vectors();
    }

    fn process_mouse_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}
