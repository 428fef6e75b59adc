//! # Bathyscope
//!
//! **An underwater ROV scene viewer built on an explicit transform stack.**
//!
//! Drive a remotely operated vehicle over a sea floor of crates, floating plastic, grass,
//! and fish, watch it from a free-flying ghost camera or a follow camera, and see the
//! active camera's view volume drawn into the scene from four viewports at once.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bathyscope::ViewerConfig;
//!
//! fn main() -> Result<(), bathyscope::ViewerError> {
//!     bathyscope::run(ViewerConfig::new().with_seed(7).with_asset_dir("Resources/Textures"))
//! }
//! ```
//!
//! ## Without a GPU
//!
//! Everything up to the GPU boundary is plain data. A [`SceneState`](scene::SceneState)
//! plus a [`SceneComposer`](scene::SceneComposer) produce a [`FramePlan`](scene::FramePlan)
//! that lists every draw of every viewport with its accumulated model matrix:
//!
//! ```
//! use bathyscope::scene::{SceneComposer, SceneState, Scenery, ScreenMode};
//! use bathyscope::controls::Command;
//! use bathyscope::ViewerConfig;
//!
//! let mut state = SceneState::with_scenery(&ViewerConfig::default(), Scenery::empty());
//! state.apply(Command::SelectScreen(ScreenMode::All));
//! state.update(1.0);
//!
//! let plan = SceneComposer::new().compose(&state);
//! assert_eq!(plan.passes.len(), 4);
//! ```

mod app;
pub mod billboard;
pub mod camera;
pub mod config;
pub mod controls;
mod error;
pub mod fog;
mod freelook_camera;
pub mod geometry;
mod gpu;
pub mod input;
pub mod light;
pub mod material;
mod mesh;
mod orbit_camera;
pub mod projection;
mod renderer;
pub mod rig;
pub mod rov;
pub mod scene;
mod texture;
mod transform_stack;
pub mod view_volume;

pub use app::run;
pub use camera::{CameraMode, CameraMovement, CameraRig, ViewCamera};
pub use config::{ConfigError, ViewerConfig};
pub use error::ViewerError;
pub use freelook_camera::FreelookCamera;
pub use gpu::GpuContext;
pub use mesh::{Mesh, Transform, Vertex3d};
pub use orbit_camera::OrbitCamera;
pub use projection::ProjectionState;
pub use renderer::Renderer;
pub use rov::{Rov, RovMovement};
pub use texture::{Texture, TextureError, TextureWrap};
pub use transform_stack::TransformStack;
pub use view_volume::ViewVolume;

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
