//! Surface materials attached to every draw.

use glam::{Vec3, Vec4};

/// Number of frames in the banana sprite animation.
pub const BANANA_FRAMES: u8 = 8;

/// Textures the scene can sample, independent of how the renderer stores them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Sea,
    Sand,
    Grass,
    Crate,
    CrateSpecular,
    Fish,
    /// One frame of the banana animation, `0..BANANA_FRAMES`.
    Banana(u8),
}

impl TextureSlot {
    /// Every 2D texture slot, in load order.
    pub fn all() -> impl Iterator<Item = TextureSlot> {
        [
            TextureSlot::Sea,
            TextureSlot::Sand,
            TextureSlot::Grass,
            TextureSlot::Crate,
            TextureSlot::CrateSpecular,
            TextureSlot::Fish,
        ]
        .into_iter()
        .chain((0..BANANA_FRAMES).map(TextureSlot::Banana))
    }

    /// File name relative to the asset directory.
    pub fn file_name(&self) -> String {
        match self {
            TextureSlot::Sea => "sea.jpg".into(),
            TextureSlot::Sand => "sand.jpg".into(),
            TextureSlot::Grass => "grass.png".into(),
            TextureSlot::Crate => "container2.png".into(),
            TextureSlot::CrateSpecular => "container2_specular.png".into(),
            TextureSlot::Fish => "fish.png".into(),
            TextureSlot::Banana(frame) => format!("banana/banana-{frame}.png"),
        }
    }
}

/// Phong material with optional texture maps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub shininess: f32,
    pub diffuse_map: Option<TextureSlot>,
    pub specular_map: Option<TextureSlot>,
    /// Lit by its own colour only.
    pub emissive: bool,
    /// Sampled from the skybox cubemap.
    pub skybox: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec4::ONE,
            diffuse: Vec4::ONE,
            specular: Vec4::ONE,
            shininess: 64.0,
            diffuse_map: None,
            specular_map: None,
            emissive: false,
            skybox: false,
        }
    }
}

impl Material {
    /// Opaque material from RGB colours.
    pub fn colored(ambient: Vec3, diffuse: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            ambient: ambient.extend(1.0),
            diffuse: diffuse.extend(1.0),
            specular: specular.extend(1.0),
            shininess,
            ..Self::default()
        }
    }

    /// Gray material whose ambient and diffuse share `level`.
    pub fn gray(level: f32, specular: f32, shininess: f32) -> Self {
        Self::colored(
            Vec3::splat(level),
            Vec3::splat(level),
            Vec3::splat(specular),
            shininess,
        )
    }

    /// White material sampling `slot`.
    pub fn textured(slot: TextureSlot) -> Self {
        Self {
            diffuse_map: Some(slot),
            ..Self::default()
        }
    }

    pub fn skybox() -> Self {
        Self {
            skybox: true,
            ..Self::default()
        }
    }

    pub fn emissive(mut self) -> Self {
        self.emissive = true;
        self
    }

    pub fn with_specular_map(mut self, slot: TextureSlot) -> Self {
        self.specular_map = Some(slot);
        self
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            ambient: self.ambient.to_array(),
            diffuse: self.diffuse.to_array(),
            specular: self.specular.to_array(),
            params: [self.shininess, 0.0, 0.0, 0.0],
            flags: [
                self.diffuse_map.is_some() as u32,
                self.specular_map.is_some() as u32,
                self.emissive as u32,
                self.skybox as u32,
            ],
        }
    }
}

/// Material as laid out in the model uniform buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// shininess, unused ×3
    pub params: [f32; 4],
    /// diffuse map, specular map, emissive, skybox
    pub flags: [u32; 4],
}
