//! Per-frame scene traversal.
//!
//! [`SceneComposer`] walks the scene once per active viewport, composing model matrices
//! on its [`TransformStack`] and recording draws into a [`FramePlan`]. The plan holds
//! values only; the renderer turns it into GPU work.
//!
//! ```
//! use bathyscope::scene::{SceneComposer, SceneState, Scenery};
//! use bathyscope::ViewerConfig;
//!
//! let state = SceneState::with_scenery(&ViewerConfig::default(), Scenery::empty());
//! let mut composer = SceneComposer::new();
//! let plan = composer.compose(&state);
//! assert_eq!(plan.passes.len(), 1);
//! assert_eq!(composer.depth(), 1);
//! ```

use glam::{Mat4, Vec3, Vec4};

use crate::billboard;
use crate::camera::ViewCamera;
use crate::geometry::RawGeometry;
use crate::light::ROV_LAMP;
use crate::material::{Material, TextureSlot};
use crate::mesh::Vertex3d;
use crate::rig::{self, Part, Primitive};
use crate::scene::scenery::{Obstacle, ObstacleKind, SpriteKind};
use crate::scene::state::SceneState;
use crate::scene::viewport::{Monitor, ViewportRect};
use crate::transform_stack::TransformStack;

/// Skybox cube edge per unit of side-view distance.
pub const SKYBOX_SCALE: f32 = 5.34;
/// Distance of the camera marker from the camera it represents.
const CAMERA_MARKER_OFFSET: f32 = 1.4;
/// Offset of the ROV lamp marker below the ROV.
const LAMP_MARKER_DROP: f32 = 0.7;

/// Geometry a draw uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshKind {
    Cube,
    Sphere,
    Floor,
    /// The frame's view-volume mesh.
    ViewVolume,
    /// A range of vertices in [`FramePlan::billboards`].
    Billboards { first: u32, count: u32 },
}

/// One draw with its accumulated model matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Draw {
    pub mesh: MeshKind,
    pub model: Mat4,
    pub material: Material,
}

/// Everything drawn into one viewport.
#[derive(Clone, Debug)]
pub struct ViewportPass {
    pub monitor: Monitor,
    pub rect: ViewportRect,
    pub view: Mat4,
    pub projection: Mat4,
    /// Eye position used for specular and fog.
    pub eye: Vec3,
    pub draws: Vec<Draw>,
}

/// The whole frame: one pass per active viewport plus the streamed geometry they share.
#[derive(Clone, Debug)]
pub struct FramePlan {
    pub passes: Vec<ViewportPass>,
    /// Billboard quads of every pass, six vertices per sprite.
    pub billboards: Vec<Vertex3d>,
    pub view_volume: RawGeometry,
}

impl FramePlan {
    pub fn draw_count(&self) -> usize {
        self.passes.iter().map(|pass| pass.draws.len()).sum()
    }
}

/// Owns the transform stack for the lifetime of the viewer.
#[derive(Debug, Default)]
pub struct SceneComposer {
    stack: TransformStack,
}

impl SceneComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stack depth; `1` between frames.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Records every viewport of the current screen mode.
    pub fn compose(&mut self, state: &SceneState) -> FramePlan {
        let view_volume = state.view_volume().geometry();
        let rov = rig::rov(state.rov.engine_angle);
        let mut billboards = Vec::new();

        let passes = state
            .screen
            .monitors()
            .into_iter()
            .map(|monitor| {
                let mut pass = ViewportPass {
                    monitor,
                    rect: state.screen.viewport(monitor, state.width, state.height),
                    view: state.view_matrix(monitor),
                    projection: state.projection_matrix(monitor),
                    eye: state.eye(),
                    draws: Vec::new(),
                };
                let depth = self.stack.depth();
                self.traverse(state, &rov, &mut pass, &mut billboards);
                debug_assert_eq!(self.stack.depth(), depth, "unbalanced scene traversal");
                pass
            })
            .collect();

        FramePlan {
            passes,
            billboards,
            view_volume,
        }
    }

    fn traverse(
        &mut self,
        state: &SceneState,
        rov: &Part,
        pass: &mut ViewportPass,
        billboards: &mut Vec<Vertex3d>,
    ) {
        let stack = &mut self.stack;
        let axis = rig::axis();

        if state.show_axis {
            emit_part(&axis, stack, pass);
        }

        // skybox
        stack.scoped(|stack| {
            stack.save(Mat4::from_scale(Vec3::splat(state.ortho_distance * SKYBOX_SCALE)));
            pass.draws.push(Draw {
                mesh: MeshKind::Cube,
                model: stack.top(),
                material: Material::skybox(),
            });
        });

        // sea surface
        pass.draws.push(Draw {
            mesh: MeshKind::Floor,
            model: stack.top(),
            material: Material::textured(TextureSlot::Sea),
        });

        // seabed and the grass growing on it
        stack.scoped(|stack| {
            stack.save(Mat4::from_translation(Vec3::Y * SpriteKind::Grass.level()));
            pass.draws.push(Draw {
                mesh: MeshKind::Floor,
                model: stack.top(),
                material: Material::textured(TextureSlot::Sand),
            });
            emit_sprites(state, SpriteKind::Grass, stack, pass, billboards);
        });

        stack.scoped(|stack| {
            stack.save(Mat4::from_translation(Vec3::Y * SpriteKind::Fish.level()));
            emit_sprites(state, SpriteKind::Fish, stack, pass, billboards);
        });

        stack.scoped(|stack| {
            stack.save(Mat4::from_translation(Vec3::Y * SpriteKind::Banana.level()));
            emit_sprites(state, SpriteKind::Banana, stack, pass, billboards);
        });

        for kind in [ObstacleKind::Crate, ObstacleKind::Plastic] {
            let material = kind.material();
            for transform in state.scenery.obstacles(kind) {
                stack.scoped(|stack| {
                    stack.save(Obstacle::matrix(&transform, state.time));
                    pass.draws.push(Draw {
                        mesh: MeshKind::Cube,
                        model: stack.top(),
                        material,
                    });
                });
            }
        }

        stack.scoped(|stack| {
            stack.save(Mat4::from_translation(state.rov.position));
            stack.save(Mat4::from_rotation_y(state.rov.yaw.to_radians()));
            emit_part(rov, stack, pass);
            if state.show_axis {
                emit_part(&axis, stack, pass);
            }
        });

        stack.scoped(|stack| {
            stack.save(camera_marker(state));
            emit_part(&rig::camera(), stack, pass);
            if state.show_axis {
                emit_part(&axis, stack, pass);
            }
        });

        stack.scoped(|stack| {
            pass.draws.push(Draw {
                mesh: MeshKind::ViewVolume,
                model: stack.top(),
                material: view_volume_material(),
            });
        });

        for (i, light) in state.lights.points.iter().enumerate() {
            if !light.enabled {
                continue;
            }
            stack.scoped(|stack| {
                if i == ROV_LAMP {
                    stack.save(Mat4::from_translation(
                        light.position - Vec3::Y * LAMP_MARKER_DROP,
                    ));
                    stack.save(Mat4::from_scale(Vec3::splat(0.1)));
                } else {
                    stack.save(Mat4::from_translation(light.position));
                    stack.save(Mat4::from_scale(Vec3::splat(0.5)));
                }
                let c = &light.color;
                pass.draws.push(Draw {
                    mesh: MeshKind::Sphere,
                    model: stack.top(),
                    material: Material::colored(c.ambient, c.diffuse, c.specular, 32.0).emissive(),
                });
            });
        }
    }
}

/// Walks a part tree, recording one draw per shape.
fn emit_part(part: &Part, stack: &mut TransformStack, pass: &mut ViewportPass) {
    rig::walk(part, stack, &mut |primitive, model, material| {
        let mesh = match primitive {
            Primitive::Cube => MeshKind::Cube,
            Primitive::Sphere => MeshKind::Sphere,
        };
        pass.draws.push(Draw {
            mesh,
            model,
            material: *material,
        });
    });
}

/// Appends the quads of every sprite of `kind` and records them as one draw.
///
/// Quads are built in the model space of the current stack top, so the billboard basis
/// is read from `view * top`.
fn emit_sprites(
    state: &SceneState,
    kind: SpriteKind,
    stack: &TransformStack,
    pass: &mut ViewportPass,
    billboards: &mut Vec<Vertex3d>,
) {
    let sprites = state.scenery.sprites(kind);
    if sprites.is_empty() {
        return;
    }

    let model = stack.top();
    let (right, up) = billboard::basis(pass.view * model, kind.mode(), state.toggles.billboard);
    let first = billboards.len() as u32;
    for (anchor, size) in sprites {
        billboards.extend(billboard::quad(anchor, kind.extent(size), right, up));
    }

    pass.draws.push(Draw {
        mesh: MeshKind::Billboards {
            first,
            count: billboards.len() as u32 - first,
        },
        model,
        material: kind.material(state.time, state.key_frame_rate),
    });
}

/// Placement of the marker drawn near the active camera.
///
/// The ghost camera's marker trails behind it; the follow camera's sits just ahead.
pub fn camera_marker(state: &SceneState) -> Mat4 {
    let (camera, offset): (&dyn ViewCamera, f32) = if state.cameras.is_ghost() {
        (&state.cameras.ghost, -CAMERA_MARKER_OFFSET)
    } else {
        (&state.cameras.follow, CAMERA_MARKER_OFFSET)
    };
    Mat4::from_translation(camera.front() * offset + camera.position())
        * Mat4::from_rotation_y((-camera.yaw()).to_radians())
        * Mat4::from_rotation_x(camera.pitch().to_radians())
}

fn view_volume_material() -> Material {
    Material {
        ambient: Vec4::new(0.2, 0.2, 0.2, 0.6),
        diffuse: Vec4::new(0.6, 0.6, 0.6, 0.6),
        specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
        shininess: 32.0,
        ..Material::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SceneryConfig, ViewerConfig};
    use crate::controls::Command;
    use crate::scene::scenery::Scenery;
    use crate::scene::viewport::ScreenMode;

    fn state_with(scenery: SceneryConfig) -> SceneState {
        let config = ViewerConfig::default();
        SceneState::with_scenery(&config, Scenery::generate(&scenery))
    }

    fn small() -> SceneryConfig {
        SceneryConfig {
            seed: Some(9),
            grass: 3,
            fish: 2,
            banana: 1,
            crates: 2,
            plastic: 1,
        }
    }

    #[test]
    fn default_frame_has_expected_draws() {
        let state = state_with(small());
        let plan = SceneComposer::new().compose(&state);
        let pass = &plan.passes[0];
        // skybox, sea, sand, 3 sprite layers, 3 obstacles, 15 ROV parts,
        // 2 camera parts, view volume, 5 light markers
        assert_eq!(pass.draws.len(), 1 + 2 + 3 + 3 + 15 + 2 + 1 + 5);
        assert_eq!(plan.billboards.len(), 6 * 6);
        assert!(pass.draws[0].material.skybox);
    }

    #[test]
    fn empty_scenery_skips_sprite_draws() {
        let state = state_with(SceneryConfig {
            seed: Some(0),
            grass: 0,
            fish: 0,
            banana: 0,
            crates: 0,
            plastic: 0,
        });
        let plan = SceneComposer::new().compose(&state);
        assert!(plan.billboards.is_empty());
        assert!(
            !plan.passes[0]
                .draws
                .iter()
                .any(|d| matches!(d.mesh, MeshKind::Billboards { .. }))
        );
    }

    #[test]
    fn all_screen_mode_renders_four_passes() {
        let mut state = state_with(small());
        state.apply(Command::SelectScreen(ScreenMode::All));
        let mut composer = SceneComposer::new();
        let plan = composer.compose(&state);
        assert_eq!(plan.passes.len(), 4);
        assert_eq!(composer.depth(), 1);
        let per_pass = plan.passes[0].draws.len();
        assert!(plan.passes.iter().all(|p| p.draws.len() == per_pass));
        assert_eq!(plan.billboards.len(), 4 * 6 * 6);
    }

    #[test]
    fn axis_adds_gizmos() {
        let mut state = state_with(small());
        let plain = SceneComposer::new().compose(&state).draw_count();
        state.apply(Command::ToggleAxis);
        let with_axis = SceneComposer::new().compose(&state).draw_count();
        assert_eq!(with_axis, plain + 3 * 4);
    }

    #[test]
    fn rov_draws_follow_rov_position() {
        let mut state = state_with(small());
        state.rov.position = Vec3::new(4.0, -1.0, 2.0);
        let plan = SceneComposer::new().compose(&state);
        let head = plan.passes[0]
            .draws
            .iter()
            .find(|d| d.material.shininess == 256.0)
            .map(|d| d.model.transform_point3(Vec3::ZERO));
        assert_eq!(head, Some(Vec3::new(4.0, -1.0, 2.0)));
    }

    #[test]
    fn disabled_lights_have_no_marker() {
        let mut state = state_with(small());
        let before = SceneComposer::new().compose(&state).draw_count();
        state.lights.points[0].enabled = false;
        let after = SceneComposer::new().compose(&state).draw_count();
        assert_eq!(after, before - 1);
    }

    #[test]
    fn camera_marker_sits_ahead_of_follow_camera() {
        let state = state_with(small());
        let marker = camera_marker(&state).transform_point3(Vec3::ZERO);
        let follow = &state.cameras.follow;
        let expected = follow.position() + follow.front() * 1.4;
        assert!(marker.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn sprites_share_layer_matrix() {
        let state = state_with(small());
        let plan = SceneComposer::new().compose(&state);
        let layers: Vec<_> = plan.passes[0]
            .draws
            .iter()
            .filter(|d| matches!(d.mesh, MeshKind::Billboards { .. }))
            .map(|d| d.model.transform_point3(Vec3::ZERO).y)
            .collect();
        assert_eq!(layers, vec![-5.0, -2.5, 0.0]);
    }
}
