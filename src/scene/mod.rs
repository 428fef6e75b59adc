//! Scene state, viewport layout, and the per-frame traversal.
//!
//! [`SceneState`] holds everything the controls and per-frame rules mutate.
//! [`SceneComposer`] reads it once per frame and produces a [`FramePlan`]: one
//! [`ViewportPass`] per active [`Monitor`], each a list of draws with accumulated model
//! matrices.

pub mod composer;
pub mod scenery;
pub mod state;
pub mod viewport;

pub use composer::{Draw, FramePlan, MeshKind, SceneComposer, ViewportPass};
pub use scenery::{Obstacle, ObstacleKind, Scenery, Sprite, SpriteKind};
pub use state::{RenderToggles, SceneState};
pub use viewport::{Monitor, ScreenMode, ViewportRect};
