//! The remotely operated vehicle the follow camera tracks.

use glam::{Mat3, Vec3};

use crate::camera::wrap_degrees;

/// Horizontal extent of the navigable area on X and Z.
pub const BOUNDS: f32 = 98.0;
/// Lowest height the ROV can dive to.
pub const MIN_DEPTH: f32 = -3.0;
/// Highest height the ROV can surface to.
pub const MAX_HEIGHT: f32 = 0.7;
/// Range the speed slider accepts.
pub const SPEED_RANGE: (f32, f32) = (1.0, 20.0);

/// Degrees of yaw per unit of velocity.
const TURN_RATE: f32 = 8.0;
/// Degrees of propeller spin per unit of speed and velocity.
const PROPELLER_RATE: f32 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RovMovement {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    Ascend,
    Descend,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rov {
    pub position: Vec3,
    /// Heading in degrees about world up.
    pub yaw: f32,
    /// Propeller angle in degrees.
    pub engine_angle: f32,
    pub front: Vec3,
    pub right: Vec3,
    /// Units per second.
    pub speed: f32,
}

impl Default for Rov {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            engine_angle: 0.0,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            speed: 5.0,
        }
    }
}

impl Rov {
    pub fn new(speed: f32) -> Self {
        let mut rov = Self::default();
        rov.set_speed(speed);
        rov
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(SPEED_RANGE.0, SPEED_RANGE.1);
    }

    /// Applies one movement for `dt` seconds.
    ///
    /// Returns `true` when the position changed, so the caller can re-target cameras
    /// that follow the ROV.
    pub fn process(&mut self, movement: RovMovement, dt: f32) -> bool {
        let velocity = self.speed * dt;
        let before = self.position;

        match movement {
            RovMovement::Forward => {
                self.position += self.front * velocity;
                self.spin(velocity);
            }
            RovMovement::Backward => {
                self.position -= self.front * velocity;
                self.spin(-velocity);
            }
            RovMovement::StrafeLeft => self.position -= self.right * velocity,
            RovMovement::StrafeRight => self.position += self.right * velocity,
            RovMovement::TurnLeft => self.turn(TURN_RATE * velocity),
            RovMovement::TurnRight => self.turn(-TURN_RATE * velocity),
            RovMovement::Ascend => self.climb(velocity),
            RovMovement::Descend => self.climb(-velocity),
        }

        self.position.x = self.position.x.clamp(-BOUNDS, BOUNDS);
        self.position.z = self.position.z.clamp(-BOUNDS, BOUNDS);
        self.position != before
    }

    fn spin(&mut self, velocity: f32) {
        self.engine_angle = wrap_degrees(self.engine_angle + self.speed * PROPELLER_RATE * velocity);
    }

    fn turn(&mut self, degrees: f32) {
        self.yaw = wrap_degrees(self.yaw + degrees);
        self.front = Mat3::from_rotation_y(self.yaw.to_radians()) * Vec3::NEG_Z;
        self.right = self.front.cross(Vec3::Y).normalize();
    }

    fn climb(&mut self, velocity: f32) {
        let y = self.position.y;
        if (MIN_DEPTH..=MAX_HEIGHT).contains(&y) {
            self.position.y = (y + velocity).clamp(MIN_DEPTH, MAX_HEIGHT);
        }
    }
}
