//! Mutable viewer state owned by the frame loop.
//!
//! Everything the control surface and the per-frame rules touch lives in one
//! [`SceneState`], handed by reference to the composer and the renderer.

use glam::{Mat4, Vec3};
use tracing::info;
use winit::keyboard::KeyCode;

use crate::camera::{CameraMode, CameraRig, ViewCamera};
use crate::config::ViewerConfig;
use crate::controls::{BOOST_KEY, Command, FOLLOW_DISTANCE_KEYS, GHOST_KEYS, ROV_KEYS};
use crate::fog::Fog;
use crate::light::{DirectionalLight, GHOST_SPOT, Lights, ROV_LAMP, ROV_SPOT};
use crate::projection::{ProjectionState, axis_projection};
use crate::rov::{Rov, RovMovement};
use crate::scene::scenery::Scenery;
use crate::scene::viewport::{Monitor, ScreenMode};
use crate::view_volume::ViewVolume;

/// Shading switches forwarded to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderToggles {
    /// Blinn-Phong specular instead of Phong.
    pub blinn_phong: bool,
    /// Per-fragment lighting instead of per-vertex.
    pub phong_shading: bool,
    /// Spot falloff by exponent instead of the smooth cutoff band.
    pub spot_exponent: bool,
    pub lighting: bool,
    pub diffuse_map: bool,
    pub specular_map: bool,
    pub emission: bool,
    pub gamma: bool,
    pub gamma_value: f32,
    pub billboard: bool,
}

impl Default for RenderToggles {
    fn default() -> Self {
        Self {
            blinn_phong: true,
            phong_shading: true,
            spot_exponent: false,
            lighting: true,
            diffuse_map: true,
            specular_map: true,
            emission: true,
            gamma: false,
            gamma_value: 1.0 / 2.2,
            billboard: true,
        }
    }
}

pub struct SceneState {
    pub cameras: CameraRig,
    pub projection: ProjectionState,
    pub screen: ScreenMode,
    /// Distance of the side-view cameras from the active camera.
    pub ortho_distance: f32,
    pub rov: Rov,
    pub lights: Lights,
    pub fog: Fog,
    pub toggles: RenderToggles,
    pub scenery: Scenery,
    pub show_axis: bool,
    pub fullscreen: bool,
    /// Freezes the directional light colour instead of cycling it.
    pub sky_color_manual: bool,
    /// Frames per second of sprite animations.
    pub key_frame_rate: u32,
    pub width: u32,
    pub height: u32,
    /// Seconds since start.
    pub time: f32,
}

impl SceneState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self::with_scenery(config, Scenery::generate(&config.scenery))
    }

    /// State around an already generated set of scenery instances.
    pub fn with_scenery(config: &ViewerConfig, scenery: Scenery) -> Self {
        let near = config.projection.near;
        let far = config.projection.far;
        let rov = Rov::new(config.rov.speed);

        let mut cameras = CameraRig::new();
        cameras.follow.update_target_position(rov.position);

        let mut state = Self {
            cameras,
            projection: ProjectionState::new(near, far),
            screen: ScreenMode::default(),
            ortho_distance: config.ortho_distance,
            rov,
            lights: Lights::default(),
            fog: Fog::new(near, far),
            toggles: RenderToggles::default(),
            scenery,
            show_axis: false,
            fullscreen: config.window.fullscreen,
            sky_color_manual: false,
            key_frame_rate: config.key_frame_rate,
            width: config.window.width,
            height: config.window.height,
            time: 0.0,
        };
        state.update(0.0);
        state
    }

    /// Width over height of the window.
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Applies a control-surface command. Returns `false` when the viewer should quit.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => {
                info!("quit requested");
                return false;
            }
            Command::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                info!("fullscreen {}", on_off(self.fullscreen));
            }
            Command::ToggleAxis => {
                self.show_axis = !self.show_axis;
                info!("axis {}", if self.show_axis { "shown" } else { "hidden" });
            }
            Command::ToggleGhost => {
                let mode = self.cameras.toggle();
                let ghost = mode == CameraMode::Ghost;
                self.lights.spots[GHOST_SPOT].enabled = ghost;
                info!("ghost mode {}", if ghost { "enabled" } else { "disabled" });
            }
            Command::ToggleProjection => {
                let perspective = self.projection.toggle();
                info!(
                    "using {} projection",
                    if perspective { "perspective" } else { "orthographic" }
                );
            }
            Command::ToggleSpotLight => {
                let index = if self.cameras.is_ghost() { GHOST_SPOT } else { ROV_SPOT };
                let spot = &mut self.lights.spots[index];
                spot.enabled = !spot.enabled;
                info!("spot light {index} {}", on_off(spot.enabled));
            }
            Command::ToggleBlinnPhong => {
                self.toggles.blinn_phong = !self.toggles.blinn_phong;
                info!(
                    "{} lighting model",
                    if self.toggles.blinn_phong { "Blinn-Phong" } else { "Phong" }
                );
            }
            Command::ToggleShading => {
                self.toggles.phong_shading = !self.toggles.phong_shading;
                info!(
                    "{} shading",
                    if self.toggles.phong_shading { "per-fragment" } else { "per-vertex" }
                );
            }
            Command::SelectScreen(screen) => {
                self.screen = screen;
                info!("switched to {screen}");
            }
        }
        true
    }

    /// Polls held movement keys for one frame of `dt` seconds.
    pub fn drive(&mut self, is_down: impl Fn(KeyCode) -> bool, dt: f32) {
        if self.cameras.is_ghost() {
            self.cameras.ghost.set_boost(is_down(BOOST_KEY));
            for (key, movement) in GHOST_KEYS {
                if is_down(key) {
                    self.cameras.ghost.process_keyboard(movement, dt);
                }
            }
        } else {
            for (key, movement) in ROV_KEYS {
                if is_down(key) {
                    self.drive_rov(movement, dt);
                }
            }
            for (key, delta) in FOLLOW_DISTANCE_KEYS {
                if is_down(key) {
                    self.cameras.follow.adjust_distance(delta);
                }
            }
        }
    }

    /// Moves the ROV and re-targets the follow camera on it.
    pub fn drive_rov(&mut self, movement: RovMovement, dt: f32) {
        if self.rov.process(movement, dt) {
            self.cameras.follow.update_target_position(self.rov.position);
        }
    }

    /// Turns the active camera by a mouse delta (`dy` positive looks up).
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.cameras.active_mut().process_mouse_movement(dx, dy, true);
    }

    /// Zooms the active camera.
    pub fn scroll(&mut self, dy: f32) {
        self.cameras.active_mut().process_mouse_scroll(dy);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        let zoom = self.cameras.active().zoom();
        self.projection.update(zoom, self.aspect());
    }

    /// Per-frame rules: fog density, light tracking, sky colour, projection extents.
    pub fn update(&mut self, time: f32) {
        self.time = time;

        self.fog.apply_auto_rule(self.cameras.follow.position().y);

        self.lights.points[ROV_LAMP].position = self.rov.position;
        self.lights.spots[ROV_SPOT].track(self.rov.position + self.rov.front, self.rov.front);
        let ghost = &self.cameras.ghost;
        self.lights.spots[GHOST_SPOT].track(ghost.position, ghost.front());

        if !self.sky_color_manual {
            self.lights.directional.color.diffuse = DirectionalLight::day_cycle(time);
        }

        let zoom = self.cameras.active().zoom();
        self.projection.update(zoom, self.aspect());
    }

    /// Position of the camera driving the main viewport.
    pub fn eye(&self) -> Vec3 {
        self.cameras.active().position()
    }

    /// View matrix of `monitor`; side views frame the active camera.
    pub fn view_matrix(&self, monitor: Monitor) -> Mat4 {
        let camera = self.cameras.active();
        monitor
            .axis_view(camera.position(), self.ortho_distance)
            .unwrap_or_else(|| camera.view_matrix())
    }

    /// Projection matrix of `monitor`.
    pub fn projection_matrix(&self, monitor: Monitor) -> Mat4 {
        match monitor {
            Monitor::Main => self.projection.matrix(),
            _ => axis_projection(self.ortho_distance, self.aspect()),
        }
    }

    /// World-space view volume of the active camera.
    pub fn view_volume(&self) -> ViewVolume {
        ViewVolume::reconstruct(&self.projection, self.cameras.active().view_matrix())
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneryConfig;
    use approx::assert_abs_diff_eq;

    fn state() -> SceneState {
        let config = ViewerConfig::default();
        SceneState::with_scenery(&config, Scenery::empty())
    }

    #[test]
    fn starts_following_the_rov() {
        let state = state();
        assert!(!state.cameras.is_ghost());
        assert_eq!(state.cameras.follow.target, state.rov.position);
        assert!(!state.lights.spots[GHOST_SPOT].enabled);
        assert_eq!(state.screen, ScreenMode::Single(Monitor::Main));
    }

    #[test]
    fn ghost_toggle_flips_flashlight() {
        let mut state = state();
        assert!(state.apply(Command::ToggleGhost));
        assert!(state.cameras.is_ghost());
        assert!(state.lights.spots[GHOST_SPOT].enabled);
        state.apply(Command::ToggleGhost);
        assert!(!state.lights.spots[GHOST_SPOT].enabled);
    }

    #[test]
    fn spot_toggle_targets_active_mode() {
        let mut state = state();
        state.apply(Command::ToggleSpotLight);
        assert!(!state.lights.spots[ROV_SPOT].enabled);
        state.apply(Command::ToggleGhost);
        state.apply(Command::ToggleSpotLight);
        assert!(!state.lights.spots[GHOST_SPOT].enabled);
        assert!(!state.lights.spots[ROV_SPOT].enabled);
    }

    #[test]
    fn quit_stops_the_loop() {
        assert!(!state().apply(Command::Quit));
    }

    #[test]
    fn driving_moves_rov_and_follow_target() {
        let mut state = state();
        state.drive(|key| key == KeyCode::KeyW, 0.2);
        assert!(state.rov.position.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
        assert_eq!(state.cameras.follow.target, state.rov.position);
        assert_eq!(state.cameras.ghost.position, Vec3::new(0.0, 2.0, 10.0));
    }

    #[test]
    fn ghost_keys_move_camera_not_rov() {
        let mut state = state();
        state.apply(Command::ToggleGhost);
        let start = state.cameras.ghost.position;
        state.drive(|key| key == KeyCode::KeyW || key == KeyCode::ShiftLeft, 0.1);
        assert_abs_diff_eq!(start.distance(state.cameras.ghost.position), 2.5, epsilon = 1e-4);
        assert_eq!(state.rov.position, Vec3::ZERO);
    }

    #[test]
    fn follow_distance_keys_adjust_orbit() {
        let mut state = state();
        let before = state.cameras.follow.distance;
        state.drive(|key| key == KeyCode::KeyP, 0.016);
        assert_abs_diff_eq!(state.cameras.follow.distance, before + 0.5, epsilon = 1e-5);
    }

    #[test]
    fn update_tracks_lights_to_rov() {
        let mut state = state();
        state.drive_rov(RovMovement::StrafeRight, 1.0);
        state.update(1.0);
        assert_eq!(state.lights.points[ROV_LAMP].position, state.rov.position);
        let spot = &state.lights.spots[ROV_SPOT];
        assert_eq!(spot.position, state.rov.position + state.rov.front);
        assert_eq!(spot.direction, state.rov.front);
        assert_eq!(state.lights.directional.color.diffuse, DirectionalLight::day_cycle(1.0));
    }

    #[test]
    fn manual_sky_keeps_colour() {
        let mut state = state();
        state.sky_color_manual = true;
        let before = state.lights.directional.color.diffuse;
        state.update(3.0);
        assert_eq!(state.lights.directional.color.diffuse, before);
    }

    #[test]
    fn side_views_frame_active_camera() {
        let mut state = state();
        state.apply(Command::ToggleGhost);
        let view = state.view_matrix(Monitor::X);
        let p = view.transform_point3(state.cameras.ghost.position);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -state.ortho_distance), 1e-4));
        assert_eq!(state.view_matrix(Monitor::Main), state.cameras.ghost.view_matrix());
    }

    #[test]
    fn resize_updates_aspect() {
        let mut state = state();
        state.resize(1000, 500);
        assert_abs_diff_eq!(state.projection.aspect, 2.0);
    }

    #[test]
    fn new_generates_scenery_from_config() {
        let mut config = ViewerConfig::default().with_seed(3);
        config.scenery = SceneryConfig {
            grass: 4,
            fish: 0,
            banana: 0,
            crates: 1,
            plastic: 0,
            ..config.scenery
        };
        let state = SceneState::new(&config);
        assert_eq!(state.scenery.len(), 5);
    }
}
