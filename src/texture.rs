//! GPU textures: 2D surface maps and the skybox cubemap.
//!
//! Loading is fallible but never fatal to the viewer: [`Texture::load_or_white`] and
//! [`Texture::cubemap_or_white`] log the failure and hand back a white stand-in so the
//! scene keeps rendering.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use wgpu::util::DeviceExt;

use crate::gpu::GpuContext;

/// Error type for texture loading.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to load {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cubemap face {index} ({path}) failed: {source}")]
    CubemapFace {
        index: usize,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cubemap faces must be square and equally sized, face {index} is {width}x{height}")]
    CubemapSize { index: usize, width: u32, height: u32 },
}

/// Cubemap face file names in layer order: +X, -X, +Y, -Y, +Z, -Z.
pub const SKYBOX_FACES: [&str; 6] = [
    "skybox/right.jpg",
    "skybox/left.jpg",
    "skybox/top.jpg",
    "skybox/bottom.jpg",
    "skybox/front.jpg",
    "skybox/back.jpg",
];

/// How a 2D texture is sampled past its edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureWrap {
    /// Sprites with transparency stop at their border.
    Clamp,
    /// Opaque surface maps tile without visible seams.
    Mirror,
}

impl TextureWrap {
    fn address_mode(self) -> wgpu::AddressMode {
        match self {
            TextureWrap::Clamp => wgpu::AddressMode::ClampToEdge,
            TextureWrap::Mirror => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

/// A GPU texture that can be bound to shaders.
#[derive(Debug)]
pub struct Texture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Create a texture from raw RGBA data.
    pub fn from_rgba(
        gpu: &GpuContext,
        data: &[u8],
        width: u32,
        height: u32,
        wrap: TextureWrap,
        label: &str,
    ) -> Self {
        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mode = wrap.address_mode();
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label} Sampler")),
            address_mode_u: mode,
            address_mode_v: mode,
            address_mode_w: mode,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }

    /// 1×1 white texture.
    pub fn white(gpu: &GpuContext) -> Self {
        Self::from_rgba(gpu, &[255; 4], 1, 1, TextureWrap::Mirror, "White Texture")
    }

    /// Load a texture from an image file.
    ///
    /// Images with an alpha channel clamp at their edges; opaque ones mirror-repeat.
    pub fn from_file(gpu: &GpuContext, path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let wrap = if img.color().has_alpha() {
            TextureWrap::Clamp
        } else {
            TextureWrap::Mirror
        };
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!(path = %path.display(), width, height, "texture loaded");
        Ok(Self::from_rgba(
            gpu,
            &rgba,
            width,
            height,
            wrap,
            &path.display().to_string(),
        ))
    }

    /// Loads `path`, falling back to white when it cannot be read.
    pub fn load_or_white(gpu: &GpuContext, path: impl AsRef<Path>) -> Self {
        Self::from_file(gpu, path).unwrap_or_else(|err| {
            warn!("{err}; using a white texture");
            Self::white(gpu)
        })
    }

    /// Builds a cubemap from six face images ordered +X, -X, +Y, -Y, +Z, -Z.
    pub fn cubemap(gpu: &GpuContext, faces: &[PathBuf; 6]) -> Result<Self, TextureError> {
        let mut size = 0;
        let mut data = Vec::new();
        for (index, path) in faces.iter().enumerate() {
            let face = image::open(path)
                .map_err(|source| TextureError::CubemapFace {
                    index,
                    path: path.clone(),
                    source,
                })?
                .to_rgba8();
            let (width, height) = face.dimensions();
            if index == 0 {
                size = width;
            }
            if width != height || width != size {
                return Err(TextureError::CubemapSize {
                    index,
                    width,
                    height,
                });
            }
            data.extend_from_slice(&face);
        }
        Ok(Self::cubemap_from_rgba(gpu, &data, size, "Skybox Cubemap"))
    }

    /// Loads the skybox faces from `dir`, falling back to a white cubemap.
    pub fn cubemap_or_white(gpu: &GpuContext, dir: &Path) -> Self {
        let faces = SKYBOX_FACES.map(|name| dir.join(name));
        Self::cubemap(gpu, &faces).unwrap_or_else(|err| {
            warn!("{err}; using a white skybox");
            Self::cubemap_from_rgba(gpu, &[255; 4 * 6], 1, "White Cubemap")
        })
    }

    fn cubemap_from_rgba(gpu: &GpuContext, data: &[u8], size: u32, label: &str) -> Self {
        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: size,
                    height: size,
                    depth_or_array_layers: 6,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label} Sampler")),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width: size,
            height: size,
        }
    }
}
