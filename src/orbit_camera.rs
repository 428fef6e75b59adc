use glam::Vec3;

use crate::camera::{Basis, MAX_ZOOM, MIN_ZOOM, PITCH_LIMIT, ViewCamera, wrap_degrees};

/// A camera that orbits a tracked target point.
///
/// Position is derived on every query as `target - distance * front`, so moving the
/// target drags the camera along without any extra bookkeeping.
///
/// # Example
/// ```
/// use bathyscope::{OrbitCamera, Vec3, ViewCamera};
///
/// let mut orbit = OrbitCamera::new().looking_from([0.0, 0.0, 6.0], Vec3::ZERO);
/// orbit.update_target_position(Vec3::new(1.0, 0.0, 0.0));
/// assert!(orbit.position().abs_diff_eq(Vec3::new(1.0, 0.0, 6.0), 1e-5));
/// ```
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Distance from target.
    pub distance: f32,
    /// Horizontal angle in degrees.
    pub yaw: f32,
    /// Vertical angle in degrees.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    /// Degrees per unit of mouse delta.
    pub sensitivity: f32,
    /// Minimum distance from target.
    pub min_distance: f32,
    /// Maximum distance from target.
    pub max_distance: f32,
    basis: Basis,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 6.0,
            yaw: -90.0,
            pitch: 0.0,
            zoom: MAX_ZOOM,
            sensitivity: 0.1,
            min_distance: 1.0,
            max_distance: 100.0,
            basis: Basis::from_angles(-90.0, 0.0),
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the camera at `position` looking at `target`.
    ///
    /// Distance and angles are derived from the offset between the two points.
    pub fn looking_from(mut self, position: impl Into<Vec3>, target: impl Into<Vec3>) -> Self {
        let position = position.into();
        self.target = target.into();

        let offset = self.target - position;
        let distance = offset.length();
        if distance > 0.0 {
            let dir = offset / distance;
            self.distance = distance.clamp(self.min_distance, self.max_distance);
            self.yaw = dir.z.atan2(dir.x).to_degrees();
            self.pitch = dir
                .y
                .asin()
                .to_degrees()
                .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
        self.update_vectors();
        self
    }

    /// Set the target point to orbit around.
    pub fn target(mut self, target: impl Into<Vec3>) -> Self {
        self.target = target.into();
        self
    }

    /// Set the distance from target.
    pub fn distance(mut self, distance: f32) -> Self {
        self.distance = distance.clamp(self.min_distance, self.max_distance);
        self
    }

    /// Set mouse sensitivity in degrees per pixel.
    pub fn sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Set distance limits.
    pub fn distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self.distance = self.distance.clamp(min, max);
        self
    }

    /// Recenter the orbit on a new target.
    pub fn update_target_position(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Move toward (negative) or away from (positive) the target.
    pub fn adjust_distance(&mut self, delta: f32) {
        self.distance = (self.distance + delta).clamp(self.min_distance, self.max_distance);
    }

    fn update_vectors(&mut self) {
        self.basis = Basis::from_angles(self.yaw, self.pitch);
    }
}

impl ViewCamera for OrbitCamera {
    fn position(&self) -> Vec3 {
        self.target - self.basis.front * self.distance
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn looking_from_derives_spherical_state() {
        let orbit = OrbitCamera::new().looking_from([0.0, 0.0, 6.0], Vec3::ZERO);
        assert_abs_diff_eq!(orbit.distance, 6.0, epsilon = 1e-5);
        assert_abs_diff_eq!(orbit.yaw, -90.0, epsilon = 1e-4);
        assert_abs_diff_eq!(orbit.pitch, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn position_is_derived_from_target() {
        let mut orbit = OrbitCamera::new().looking_from([0.0, 0.0, 6.0], Vec3::ZERO);
        orbit.update_target_position(Vec3::new(10.0, -2.0, 3.0));
        assert!(orbit.position().abs_diff_eq(Vec3::new(10.0, -2.0, 9.0), 1e-4));
        assert!(orbit.front().abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn orbit_keeps_distance_while_turning() {
        let mut orbit = OrbitCamera::new().looking_from([0.0, 0.0, 6.0], Vec3::ZERO);
        orbit.process_mouse_movement(350.0, 200.0, true);
        assert_abs_diff_eq!(orbit.position().distance(orbit.target), 6.0, epsilon = 1e-4);
        assert!(orbit.view_matrix().transform_point3(orbit.target).z < 0.0);
    }

    #[test]
    fn adjust_distance_respects_minimum() {
        let mut orbit = OrbitCamera::new();
        for _ in 0..100 {
            orbit.adjust_distance(-0.5);
        }
        assert_eq!(orbit.distance, orbit.min_distance);
        assert!(orbit.distance > 0.0);
        orbit.adjust_distance(0.5);
        assert_eq!(orbit.distance, orbit.min_distance + 0.5);
    }

    #[test]
    fn pitch_unconstrained_wraps() {
        let mut orbit = OrbitCamera::new();
        orbit.process_mouse_movement(0.0, 4000.0, false);
        assert!(orbit.pitch.abs() < 360.0);
        assert_abs_diff_eq!(orbit.front().length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn unconstrained_pitch_through_the_pole_keeps_a_basis() {
        let mut orbit = OrbitCamera::new();
        orbit.pitch = 90.0;
        orbit.process_mouse_movement(0.0, 0.0, false);
        assert!(orbit.right().is_finite());
        assert!(orbit.up().is_finite());
        assert!(orbit.position().is_finite());
    }
}
