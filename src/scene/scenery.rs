//! Randomly scattered scenery stored as `hecs` entities.
//!
//! Sprites (grass, fish, banana) carry a [`Sprite`] component and are drawn as
//! billboards; obstacles (crates, plastic cubes) carry an [`Obstacle`] component and are
//! drawn as bobbing cubes. Both carry a [`Transform`] whose position is the anchor on
//! the ground plane of their layer.

use glam::{Mat4, Vec2, Vec3};
use hecs::World;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::billboard::BillboardMode;
use crate::config::SceneryConfig;
use crate::material::{BANANA_FRAMES, Material, TextureSlot};
use crate::mesh::Transform;

/// Height of the seabed the grass grows on.
pub const SEABED_LEVEL: f32 = -5.0;
/// Height fish swim at.
pub const FISH_LEVEL: f32 = -2.5;

const OBSTACLE_RANGE: f32 = 30.0;
const GRASS_RANGE: f32 = 80.0;
const FISH_RANGE: f32 = 60.0;
const GRASS_SIZE: (f32, f32) = (0.2, 2.0);
const FISH_SIZE: (f32, f32) = (0.5, 1.5);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Grass,
    Fish,
    Banana,
}

impl SpriteKind {
    /// Layer the sprite's anchor is placed in.
    pub fn level(self) -> f32 {
        match self {
            SpriteKind::Grass => SEABED_LEVEL,
            SpriteKind::Fish => FISH_LEVEL,
            SpriteKind::Banana => 0.0,
        }
    }

    pub fn mode(self) -> BillboardMode {
        match self {
            SpriteKind::Fish => BillboardMode::Full,
            SpriteKind::Grass | SpriteKind::Banana => BillboardMode::YLocked,
        }
    }

    /// Width and height of a sprite of this kind with the given base size.
    pub fn extent(self, size: f32) -> Vec2 {
        match self {
            SpriteKind::Fish => Vec2::new(size, size * 0.5),
            SpriteKind::Grass | SpriteKind::Banana => Vec2::splat(size),
        }
    }

    /// Material at time `t`; the banana cycles through its animation frames.
    pub fn material(self, t: f32, frame_rate: u32) -> Material {
        let slot = match self {
            SpriteKind::Grass => TextureSlot::Grass,
            SpriteKind::Fish => TextureSlot::Fish,
            SpriteKind::Banana => TextureSlot::Banana(banana_frame(t, frame_rate)),
        };
        Material {
            shininess: 16.0,
            ..Material::textured(slot)
        }
    }
}

/// Animation frame shown at time `t`.
pub fn banana_frame(t: f32, frame_rate: u32) -> u8 {
    ((t.max(0.0) * frame_rate as f32) as u64 % BANANA_FRAMES as u64) as u8
}

/// A billboard sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub size: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Crate,
    Plastic,
}

impl ObstacleKind {
    pub fn material(self) -> Material {
        match self {
            ObstacleKind::Crate => {
                Material::textured(TextureSlot::Crate).with_specular_map(TextureSlot::CrateSpecular)
            }
            ObstacleKind::Plastic => Material::colored(
                Vec3::splat(0.02),
                Vec3::new(0.1, 0.35, 0.1),
                Vec3::new(0.45, 0.55, 0.45),
                16.0,
            ),
        }
    }
}

/// A cube floating near the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// Model matrix at time `t`: the cube bobs with a phase set by its depth coordinate.
    pub fn matrix(transform: &Transform, t: f32) -> Mat4 {
        let p = transform.position;
        Mat4::from_translation(Vec3::new(p.x, bob(t, p.z), p.z))
    }
}

/// Vertical offset of a floating obstacle.
pub fn bob(t: f32, z: f32) -> f32 {
    (t * 3.0 + z).sin() / 4.0
}

/// All scattered instances.
pub struct Scenery {
    pub world: World,
    pub seed: Option<u64>,
}

impl Scenery {
    /// Scatters the configured number of instances.
    pub fn generate(config: &SceneryConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut world = World::new();

        for kind in [ObstacleKind::Crate, ObstacleKind::Plastic] {
            let count = match kind {
                ObstacleKind::Crate => config.crates,
                ObstacleKind::Plastic => config.plastic,
            };
            for _ in 0..count {
                let x = rng.gen_range(-OBSTACLE_RANGE..=OBSTACLE_RANGE);
                let z = rng.gen_range(-OBSTACLE_RANGE..=OBSTACLE_RANGE);
                world.spawn((Transform::from_position(Vec3::new(x, 0.0, z)), Obstacle { kind }));
            }
        }

        for _ in 0..config.grass {
            let x = rng.gen_range(-GRASS_RANGE..=GRASS_RANGE);
            let z = rng.gen_range(-GRASS_RANGE..=GRASS_RANGE);
            let size = rng.gen_range(GRASS_SIZE.0..=GRASS_SIZE.1);
            spawn_sprite(&mut world, SpriteKind::Grass, Vec3::new(x, 0.0, z), size);
        }

        for _ in 0..config.fish {
            let x = rng.gen_range(-FISH_RANGE..=FISH_RANGE);
            let z = rng.gen_range(-FISH_RANGE..=FISH_RANGE);
            let size = rng.gen_range(FISH_SIZE.0..=FISH_SIZE.1);
            spawn_sprite(&mut world, SpriteKind::Fish, Vec3::new(x, 0.0, z), size);
        }

        for _ in 0..config.banana {
            let x = rng.gen_range(-FISH_RANGE..=FISH_RANGE);
            let z = rng.gen_range(-OBSTACLE_RANGE..=OBSTACLE_RANGE);
            let size = rng.gen_range(FISH_SIZE.0..=FISH_SIZE.1);
            spawn_sprite(&mut world, SpriteKind::Banana, Vec3::new(x, 0.0, z), size);
        }

        debug!(entities = world.len(), seed = ?config.seed, "scenery generated");
        Self {
            world,
            seed: config.seed,
        }
    }

    /// Scenery with no instances.
    pub fn empty() -> Self {
        Self {
            world: World::new(),
            seed: None,
        }
    }

    /// Sprites of one kind as `(anchor, size)` pairs, anchors relative to the sprite's layer.
    pub fn sprites(&self, kind: SpriteKind) -> Vec<(Vec3, f32)> {
        self.world
            .query::<(&Transform, &Sprite)>()
            .iter()
            .filter(|(_, (_, sprite))| sprite.kind == kind)
            .map(|(_, (transform, sprite))| (transform.position, sprite.size))
            .collect()
    }

    /// Obstacles of one kind as their resting transforms.
    pub fn obstacles(&self, kind: ObstacleKind) -> Vec<Transform> {
        self.world
            .query::<(&Transform, &Obstacle)>()
            .iter()
            .filter(|(_, (_, obstacle))| obstacle.kind == kind)
            .map(|(_, (transform, _))| *transform)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }
}

fn spawn_sprite(world: &mut World, kind: SpriteKind, position: Vec3, size: f32) {
    world.spawn((Transform::from_position(position), Sprite { kind, size }));
}
