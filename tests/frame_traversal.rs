//! End-to-end frame composition without a GPU.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use bathyscope::config::SceneryConfig;
use bathyscope::controls::Command;
use bathyscope::fog::Fog;
use bathyscope::light::{Lights, SpotLight};
use bathyscope::projection::perspective;
use bathyscope::rov::BOUNDS;
use bathyscope::scene::{MeshKind, SceneComposer, SceneState, Scenery, ScreenMode};
use bathyscope::{
    FreelookCamera, KeyCode, Mat4, ProjectionState, Quat, Rov, RovMovement, TransformStack, Vec3,
    Vec4, ViewCamera, ViewVolume, ViewerConfig,
};

fn state() -> SceneState {
    let scenery = Scenery::generate(&SceneryConfig {
        seed: Some(1234),
        grass: 40,
        fish: 12,
        banana: 5,
        crates: 6,
        plastic: 3,
    });
    SceneState::with_scenery(&ViewerConfig::default(), scenery)
}

#[test]
fn traversal_leaves_stack_balanced_in_every_mode() {
    let mut state = state();
    let mut composer = SceneComposer::new();

    for n in 1..=5 {
        let screen = ScreenMode::from_number(n).expect("screens 1 to 5 exist");
        state.apply(Command::SelectScreen(screen));
        for command in [Command::ToggleAxis, Command::ToggleGhost, Command::ToggleProjection] {
            state.apply(command);
            state.update(n as f32 * 0.25);
            let before = composer.depth();
            let plan = composer.compose(&state);
            assert_eq!(composer.depth(), before);
            assert_eq!(plan.passes.len(), screen.monitors().len());
        }
    }
}

#[test]
fn save_composes_like_a_single_product() {
    let t1 = Mat4::from_scale_rotation_translation(
        Vec3::new(1.0, 2.0, 0.5),
        Quat::from_rotation_y(0.7),
        Vec3::new(3.0, -1.0, 2.0),
    );
    let t2 = Mat4::from_rotation_x(-1.1) * Mat4::from_translation(Vec3::new(0.0, 4.0, -2.0));

    let mut a = TransformStack::new();
    a.push();
    a.save(t1);
    a.save(t2);

    let mut b = TransformStack::new();
    b.push();
    b.save(t1 * t2);

    assert!(a.top().abs_diff_eq(b.top(), 1e-5));
}

#[test]
fn perspective_maps_clip_planes_to_unit_depth() {
    let m = perspective(45f32.to_radians(), 1.333, 0.1, 250.0);

    let near = m * Vec4::new(0.0, 0.0, -0.1, 1.0);
    assert_abs_diff_eq!(near.z / near.w, -1.0, epsilon = 1e-4);

    let far = m * Vec4::new(0.0, 0.0, -250.0, 1.0);
    assert_abs_diff_eq!(far.z / far.w, 1.0, epsilon = 1e-4);
}

#[test]
fn near_plane_corners_are_symmetric() {
    let mut projection = ProjectionState::new(0.1, 250.0);
    projection.update(45.0, 1.0);
    let volume = ViewVolume::camera_space(&projection);
    let [rt, lt, rb, _lb] = volume.near;

    assert_eq!(rt.x, -lt.x);
    assert_eq!(rt.y, -rb.y);
    assert_relative_eq!(rt.x, rt.y);
}

#[test]
fn yaw_survives_a_full_turn_and_more() {
    let mut camera = FreelookCamera::new();
    for _ in 0..40 {
        // 100 units at 0.1 degrees per unit
        camera.process_mouse_movement(100.0, 0.0, true);
    }
    assert!(camera.yaw().is_finite());
    assert!(camera.yaw().abs() < 360.0);
    assert_abs_diff_eq!(camera.front().length(), 1.0, epsilon = 1e-5);

    let mut reference = FreelookCamera::new();
    reference.process_mouse_movement(4000.0, 0.0, true);
    assert!(camera.front().abs_diff_eq(reference.front(), 1e-4));
}

#[test]
fn rov_stops_at_world_boundary() {
    let mut rov = Rov {
        position: Vec3::new(97.0, 0.0, 0.0),
        front: Vec3::X,
        speed: 5.0,
        ..Rov::default()
    };
    rov.process(RovMovement::Forward, 1.0);
    assert_eq!(rov.position.x, 98.0);
    assert_eq!(rov.position.x, BOUNDS);
}

#[test]
fn fog_density_follows_the_follow_camera() {
    let mut fog = Fog::default();
    fog.apply_auto_rule(-1.0);
    assert_eq!(fog.density, 0.15);
    fog.apply_auto_rule(1.0);
    assert_eq!(fog.density, 0.01);

    let mut state = state();
    state.cameras.follow.update_target_position(Vec3::new(0.0, -20.0, 0.0));
    assert!(state.cameras.follow.position().y < 0.0);
    state.update(0.0);
    assert_eq!(state.fog.density, 0.15);

    state.cameras.follow.update_target_position(Vec3::new(0.0, 20.0, 0.0));
    state.update(0.0);
    assert_eq!(state.fog.density, 0.01);

    state.fog.manual = true;
    state.fog.density = 0.3;
    state.cameras.follow.update_target_position(Vec3::new(0.0, -20.0, 0.0));
    state.update(0.0);
    assert_eq!(state.fog.density, 0.3);
}

#[test]
fn spot_cutoffs_stay_ordered_for_any_edit_sequence() {
    let mut spots: Vec<SpotLight> = Lights::default().spots.to_vec();
    spots.push(SpotLight::with_cutoffs(45.0, 3.0));

    // deterministic pseudo-random walk over both sliders
    let mut x: u32 = 0x9e37_79b9;
    for _ in 0..500 {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        let value = (x % 1000) as f32 / 10.0 - 30.0;
        for spot in &mut spots {
            if x % 2 == 0 {
                spot.set_cutoff(value);
            } else {
                spot.set_outer_cutoff(value);
            }
            assert!(spot.cutoff() < spot.outer_cutoff());
        }
    }
}

#[test]
fn driving_the_rov_moves_its_draws_and_the_follow_target() {
    let mut state = state();
    let composer_draw = |state: &SceneState| {
        SceneComposer::new().compose(state).passes[0]
            .draws
            .iter()
            .find(|d| d.material.shininess == 256.0)
            .map(|d| d.model.transform_point3(Vec3::ZERO))
    };
    assert_eq!(composer_draw(&state), Some(Vec3::ZERO));

    state.drive(|key| key == KeyCode::KeyW, 0.5);
    let moved = state.rov.position;
    assert_abs_diff_eq!(moved.z, -2.5, epsilon = 1e-5);
    assert_eq!(state.cameras.follow.target, moved);
    assert_eq!(composer_draw(&state), Some(moved));
}

#[test]
fn ghost_keys_leave_the_rov_alone() {
    let mut state = state();
    state.apply(Command::ToggleGhost);
    let ghost_before = state.cameras.ghost.position;
    state.drive(|key| key == KeyCode::KeyW, 0.5);
    assert_eq!(state.rov.position, Vec3::ZERO);
    assert_ne!(state.cameras.ghost.position, ghost_before);
}

#[test]
fn view_volume_is_drawn_around_the_active_camera() {
    let mut state = state();
    state.apply(Command::ToggleGhost);
    state.update(0.0);
    let plan = SceneComposer::new().compose(&state);

    assert!(
        plan.passes[0]
            .draws
            .iter()
            .any(|d| d.mesh == MeshKind::ViewVolume)
    );
    let volume = state.view_volume();
    let eye = state.cameras.ghost.position;
    let front = state.cameras.ghost.front();
    for corner in volume.near {
        assert!((corner - eye).dot(front) > 0.0);
    }
    assert_eq!(plan.view_volume.vertices.len(), 24);
    assert_eq!(plan.view_volume.indices.len(), 36);
}

#[test]
fn all_screen_mode_splits_the_window() {
    let mut state = state();
    state.resize(800, 600);
    state.apply(Command::SelectScreen(ScreenMode::All));
    let plan = SceneComposer::new().compose(&state);

    let area: u32 = plan
        .passes
        .iter()
        .map(|p| p.rect.width * p.rect.height)
        .sum();
    assert_eq!(area, 800 * 600);
    let eyes: Vec<_> = plan.passes.iter().map(|p| p.eye).collect();
    assert!(eyes.iter().all(|&e| e == eyes[0]));
}
