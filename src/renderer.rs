//! wgpu backend that turns a [`FramePlan`] into GPU work.
//!
//! # Architecture
//!
//! The renderer uses three bind groups:
//! - **Group 0**: Frame uniforms (view/projection matrices, eye position, fog, render
//!   toggles, the light array), one slot per viewport at a dynamic offset
//! - **Group 1**: Model uniforms (model matrix, normal matrix, material), one slot per draw
//!   at a dynamic offset
//! - **Group 2**: Diffuse map, specular map, and the skybox cubemap
//!
//! Every slot of a frame is written with a single `write_buffer` per buffer before the
//! render pass starts, so each viewport and each draw keeps its own values within one
//! submission.
//!
//! # Pipelines
//!
//! Two pipelines share one layout: per-fragment (Phong) and per-vertex (Gouraud) shading.
//! Both blend by alpha, test depth with `LessEqual`, and cull nothing so billboards and
//! the inside of the skybox stay visible.

use std::collections::HashMap;
use std::path::Path;

use glam::{Mat4, Vec4};
use tracing::{debug, warn};

use crate::fog::FogUniform;
use crate::geometry::RawGeometry;
use crate::gpu::{DEPTH_FORMAT, GpuContext};
use crate::light::{LIGHT_SLOTS, LightUniform};
use crate::material::{Material, MaterialUniform, TextureSlot};
use crate::mesh::{Mesh, Vertex3d};
use crate::scene::composer::{Draw, FramePlan, MeshKind, ViewportPass};
use crate::scene::state::{RenderToggles, SceneState};
use crate::texture::Texture;

/// Viewports a frame can hold.
const MAX_PASSES: usize = 4;
/// Model slots allocated up front; the buffer doubles when a frame needs more.
const INITIAL_MODEL_SLOTS: usize = 512;
/// Billboard vertices allocated up front; the buffer doubles when a frame needs more.
const INITIAL_BILLBOARD_VERTICES: usize = 6 * 1024;

/// Maps OpenGL clip depth (`-w..w`) onto the `0..w` range wgpu keeps.
const CLIP_DEPTH_REMAP: Mat4 = Mat4::from_cols(
    Vec4::X,
    Vec4::Y,
    Vec4::new(0.0, 0.0, 0.5, 0.0),
    Vec4::new(0.0, 0.0, 0.5, 1.0),
);

/// Per-viewport uniforms (group 0).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// Eye position in world space, `w` unused.
    pub eye: [f32; 4],
    pub fog: FogUniform,
    /// blinn-phong, spot exponent, lighting, diffuse map,
    /// specular map, emission, gamma, unused
    pub toggles: [u32; 8],
    /// gamma exponent, unused ×3
    pub gamma: [f32; 4],
    pub lights: [LightUniform; LIGHT_SLOTS],
}

impl FrameUniform {
    pub fn new(pass: &ViewportPass, state: &SceneState) -> Self {
        let t: &RenderToggles = &state.toggles;
        Self {
            view: pass.view.to_cols_array_2d(),
            projection: (CLIP_DEPTH_REMAP * pass.projection).to_cols_array_2d(),
            eye: pass.eye.extend(1.0).to_array(),
            fog: state.fog.uniform(),
            toggles: [
                t.blinn_phong as u32,
                t.spot_exponent as u32,
                t.lighting as u32,
                t.diffuse_map as u32,
                t.specular_map as u32,
                t.emission as u32,
                t.gamma as u32,
                0,
            ],
            gamma: [t.gamma_value, 0.0, 0.0, 0.0],
            lights: state.lights.uniforms(),
        }
    }
}

/// Per-draw uniforms (group 1).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix, for correct normals under non-uniform scale.
    pub normal: [[f32; 4]; 4],
    pub material: MaterialUniform,
}

impl ModelUniform {
    pub fn new(draw: &Draw) -> Self {
        Self {
            model: draw.model.to_cols_array_2d(),
            normal: draw.model.inverse().transpose().to_cols_array_2d(),
            material: draw.material.uniform(),
        }
    }
}

/// Texture pair a draw samples; one cached bind group per distinct key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct BindingKey {
    diffuse: Option<TextureSlot>,
    specular: Option<TextureSlot>,
}

impl BindingKey {
    fn of(material: &Material) -> Self {
        Self {
            diffuse: material.diffuse_map,
            specular: material.specular_map,
        }
    }
}

/// Rounds `size` up to the next multiple of `alignment`.
fn stride(size: usize, alignment: u32) -> u64 {
    wgpu::util::align_to(size as u64, alignment as u64)
}

/// Packs `items` into a byte buffer with one element every `stride` bytes.
fn pack<T: bytemuck::Pod>(items: impl IntoIterator<Item = T>, stride: u64) -> Vec<u8> {
    let mut bytes = Vec::new();
    for item in items {
        let start = bytes.len();
        bytes.extend_from_slice(bytemuck::bytes_of(&item));
        bytes.resize(start + stride as usize, 0);
    }
    bytes
}

struct Meshes {
    cube: Mesh,
    sphere: Mesh,
    floor: Mesh,
    view_volume: Mesh,
}

/// Owns every GPU resource the scene needs and records one frame per call to
/// [`Renderer::render`].
pub struct Renderer {
    phong_pipeline: wgpu::RenderPipeline,
    gouraud_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    frame_stride: u64,
    model_layout: wgpu::BindGroupLayout,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_stride: u64,
    model_capacity: usize,
    texture_layout: wgpu::BindGroupLayout,
    textures: HashMap<TextureSlot, Texture>,
    white: Texture,
    skybox: Texture,
    bindings: HashMap<BindingKey, wgpu::BindGroup>,
    meshes: Meshes,
    billboard_buffer: wgpu::Buffer,
    billboard_capacity: usize,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl Renderer {
    /// Builds pipelines, meshes, and buffers, and loads every texture from `asset_dir`.
    ///
    /// Missing textures are replaced by white and logged; nothing here is fatal.
    pub fn new(gpu: &GpuContext, asset_dir: &Path, view_volume: &RawGeometry) -> Self {
        let device = &gpu.device;
        let alignment = gpu.uniform_alignment();
        let frame_stride = stride(std::mem::size_of::<FrameUniform>(), alignment);
        let model_stride = stride(std::mem::size_of::<ModelUniform>(), alignment);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        // Frame uniforms (group 0)
        let frame_layout = uniform_layout(
            device,
            "Frame Bind Group Layout",
            std::mem::size_of::<FrameUniform>() as u64,
        );
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: frame_stride * MAX_PASSES as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = uniform_bind_group::<FrameUniform>(
            device,
            "Frame Bind Group",
            &frame_layout,
            &frame_buffer,
        );

        // Model uniforms (group 1)
        let model_layout = uniform_layout(
            device,
            "Model Bind Group Layout",
            std::mem::size_of::<ModelUniform>() as u64,
        );
        let model_buffer = create_model_buffer(device, model_stride, INITIAL_MODEL_SLOTS);
        let model_bind_group = uniform_bind_group::<ModelUniform>(
            device,
            "Model Bind Group",
            &model_layout,
            &model_buffer,
        );

        // Textures (group 2)
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                texture_entry(0, wgpu::TextureViewDimension::D2),
                sampler_entry(1),
                texture_entry(2, wgpu::TextureViewDimension::D2),
                sampler_entry(3),
                texture_entry(4, wgpu::TextureViewDimension::Cube),
                sampler_entry(5),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &model_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let phong_pipeline = create_pipeline(
            gpu,
            &pipeline_layout,
            &shader,
            "Phong Pipeline",
            ("vs_phong", "fs_phong"),
        );
        let gouraud_pipeline = create_pipeline(
            gpu,
            &pipeline_layout,
            &shader,
            "Gouraud Pipeline",
            ("vs_gouraud", "fs_gouraud"),
        );

        let textures: HashMap<_, _> = TextureSlot::all()
            .map(|slot| {
                let texture = Texture::load_or_white(gpu, asset_dir.join(slot.file_name()));
                (slot, texture)
            })
            .collect();
        debug!(count = textures.len(), dir = %asset_dir.display(), "textures ready");
        let white = Texture::white(gpu);
        let skybox = Texture::cubemap_or_white(gpu, asset_dir);

        let meshes = Meshes {
            cube: RawGeometry::cube().upload(gpu, "Cube"),
            sphere: RawGeometry::sphere(30, 30).upload(gpu, "Sphere"),
            floor: RawGeometry::floor(100.0, 25.0).upload(gpu, "Floor"),
            view_volume: view_volume.upload(gpu, "View Volume"),
        };

        let billboard_buffer = create_billboard_buffer(device, INITIAL_BILLBOARD_VERTICES);

        Self {
            phong_pipeline,
            gouraud_pipeline,
            frame_buffer,
            frame_bind_group,
            frame_stride,
            model_layout,
            model_buffer,
            model_bind_group,
            model_stride,
            model_capacity: INITIAL_MODEL_SLOTS,
            texture_layout,
            textures,
            white,
            skybox,
            bindings: HashMap::new(),
            meshes,
            billboard_buffer,
            billboard_capacity: INITIAL_BILLBOARD_VERTICES,
            depth_view: gpu.create_depth_view(),
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    /// Recreates the depth buffer when the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = gpu.create_depth_view();
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Uploads the frame's uniforms and streamed geometry.
    fn prepare(&mut self, gpu: &GpuContext, plan: &FramePlan, state: &SceneState) {
        let frames = plan
            .passes
            .iter()
            .take(MAX_PASSES)
            .map(|pass| FrameUniform::new(pass, state));
        gpu.queue
            .write_buffer(&self.frame_buffer, 0, &pack(frames, self.frame_stride));

        let draw_count = plan.draw_count();
        if draw_count > self.model_capacity {
            self.model_capacity = draw_count.next_power_of_two();
            self.model_buffer =
                create_model_buffer(&gpu.device, self.model_stride, self.model_capacity);
            self.model_bind_group = uniform_bind_group::<ModelUniform>(
                &gpu.device,
                "Model Bind Group",
                &self.model_layout,
                &self.model_buffer,
            );
            debug!(slots = self.model_capacity, "model buffer grown");
        }
        let models = plan
            .passes
            .iter()
            .flat_map(|pass| pass.draws.iter().map(ModelUniform::new));
        gpu.queue
            .write_buffer(&self.model_buffer, 0, &pack(models, self.model_stride));

        if plan.billboards.len() > self.billboard_capacity {
            self.billboard_capacity = plan.billboards.len().next_power_of_two();
            self.billboard_buffer = create_billboard_buffer(&gpu.device, self.billboard_capacity);
        }
        if !plan.billboards.is_empty() {
            gpu.queue.write_buffer(
                &self.billboard_buffer,
                0,
                bytemuck::cast_slice(&plan.billboards),
            );
        }

        let volume = &plan.view_volume;
        if !self
            .meshes
            .view_volume
            .write(gpu, &volume.vertices, &volume.indices)
        {
            self.meshes.view_volume = volume.upload(gpu, "View Volume");
        }

        for draw in plan.passes.iter().flat_map(|pass| &pass.draws) {
            let key = BindingKey::of(&draw.material);
            if !self.bindings.contains_key(&key) {
                let group = self.create_texture_bind_group(gpu, key);
                self.bindings.insert(key, group);
            }
        }
    }

    fn create_texture_bind_group(&self, gpu: &GpuContext, key: BindingKey) -> wgpu::BindGroup {
        let lookup = |slot: Option<TextureSlot>| {
            slot.and_then(|s| self.textures.get(&s))
                .unwrap_or(&self.white)
        };
        let diffuse = lookup(key.diffuse);
        let specular = lookup(key.specular);

        gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Texture Bind Group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&diffuse.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&specular.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&specular.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(&self.skybox.view),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::Sampler(&self.skybox.sampler),
                },
            ],
        })
    }

    /// Renders every viewport of `plan` into the next surface texture and presents it.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render(&mut self, gpu: &GpuContext, plan: &FramePlan, state: &SceneState) {
        let frame = match gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(err) => {
                warn!("surface error: {err}");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.ensure_depth_size(gpu);
        self.prepare(gpu, plan, state);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        let clear = state.fog.color.as_dvec4();
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.x,
                            g: clear.y,
                            b: clear.z,
                            a: clear.w,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(if state.toggles.phong_shading {
                &self.phong_pipeline
            } else {
                &self.gouraud_pipeline
            });

            let mut slot = 0u64;
            for (index, pass) in plan.passes.iter().take(MAX_PASSES).enumerate() {
                let rect = pass.rect;
                if rect.is_empty() {
                    slot += pass.draws.len() as u64;
                    continue;
                }
                render_pass.set_viewport(
                    rect.x as f32,
                    rect.y as f32,
                    rect.width as f32,
                    rect.height as f32,
                    0.0,
                    1.0,
                );
                let frame_offset = (index as u64 * self.frame_stride) as u32;
                render_pass.set_bind_group(0, &self.frame_bind_group, &[frame_offset]);

                for draw in &pass.draws {
                    let model_offset = (slot * self.model_stride) as u32;
                    slot += 1;
                    let Some(textures) = self.bindings.get(&BindingKey::of(&draw.material))
                    else {
                        continue;
                    };
                    render_pass.set_bind_group(1, &self.model_bind_group, &[model_offset]);
                    render_pass.set_bind_group(2, textures, &[]);
                    self.draw_mesh(&mut render_pass, draw.mesh);
                }
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }

    fn draw_mesh(&self, render_pass: &mut wgpu::RenderPass, kind: MeshKind) {
        let mesh = match kind {
            MeshKind::Cube => &self.meshes.cube,
            MeshKind::Sphere => &self.meshes.sphere,
            MeshKind::Floor => &self.meshes.floor,
            MeshKind::ViewVolume => &self.meshes.view_volume,
            MeshKind::Billboards { first, count } => {
                render_pass.set_vertex_buffer(0, self.billboard_buffer.slice(..));
                render_pass.draw(first..first + count, 0..1);
                return;
            }
        };
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str, size: u64) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: wgpu::BufferSize::new(size),
            },
            count: None,
        }],
    })
}

/// Binds one `T`-sized window of `buffer`; the dynamic offset slides it per draw.
fn uniform_bind_group<T>(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
            }),
        }],
    })
}

fn create_model_buffer(device: &wgpu::Device, stride: u64, slots: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Model Uniforms"),
        size: stride * slots as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_billboard_buffer(device: &wgpu::Device, vertices: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Billboard Vertex Buffer"),
        size: (vertices * std::mem::size_of::<Vertex3d>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn texture_entry(binding: u32, view_dimension: wgpu::TextureViewDimension) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn create_pipeline(
    gpu: &GpuContext,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    (vs, fs): (&str, &str),
) -> wgpu::RenderPipeline {
    gpu.device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some(vs),
                buffers: &[Vertex3d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(fs),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::controls::Command;
    use crate::projection::{orthographic, perspective};
    use crate::scene::{Monitor, SceneComposer, Scenery, ScreenMode};
    use approx::assert_abs_diff_eq;
    use glam::Vec3;

    fn ndc_depth(uniform: &FrameUniform, world: Vec3) -> f32 {
        let clip = Mat4::from_cols_array_2d(&uniform.projection)
            * Mat4::from_cols_array_2d(&uniform.view)
            * world.extend(1.0);
        clip.z / clip.w
    }

    #[test]
    fn uniform_sizes_fit_their_strides() {
        assert_eq!(std::mem::size_of::<ModelUniform>(), 208);
        assert_eq!(std::mem::size_of::<FrameUniform>(), 1136);
        assert_eq!(stride(std::mem::size_of::<ModelUniform>(), 256), 256);
        assert_eq!(stride(std::mem::size_of::<FrameUniform>(), 256), 1280);
    }

    #[test]
    fn pack_pads_each_element_to_stride() {
        let bytes = pack([1u32, 2, 3], 16);
        assert_eq!(bytes.len(), 48);
        assert_eq!(bytes[16], 2);
        assert_eq!(&bytes[4..16], &[0; 12]);
    }

    #[test]
    fn model_uniform_carries_normal_matrix() {
        let draw = Draw {
            mesh: MeshKind::Cube,
            model: Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)),
            material: Material::default(),
        };
        let uniform = ModelUniform::new(&draw);
        assert_eq!(uniform.normal[0][0], 0.5);
        assert_eq!(uniform.material.params[0], 64.0);
    }

    #[test]
    fn frame_uniform_reflects_toggles_and_pass() {
        let mut state = SceneState::with_scenery(&ViewerConfig::default(), Scenery::empty());
        state.toggles.gamma = true;
        let plan = SceneComposer::new().compose(&state);
        let uniform = FrameUniform::new(&plan.passes[0], &state);
        assert_eq!(uniform.toggles[0], 1);
        assert_eq!(uniform.toggles[6], 1);
        assert_eq!(uniform.eye, state.eye().extend(1.0).to_array());
        assert_eq!(uniform.lights, state.lights.uniforms());
    }

    #[test]
    fn binding_keys_group_by_texture_pair() {
        let sand = Material::textured(TextureSlot::Sand);
        let tinted = Material {
            shininess: 4.0,
            ..sand
        };
        assert_eq!(BindingKey::of(&sand), BindingKey::of(&tinted));
        assert_ne!(BindingKey::of(&sand), BindingKey::of(&Material::default()));
    }

    #[test]
    fn clip_depth_remap_sends_near_and_far_to_unit_range() {
        for projection in [
            perspective(45f32.to_radians(), 1.5, 0.1, 250.0),
            orthographic(-4.0, 4.0, -3.0, 3.0, 0.1, 250.0),
        ] {
            let m = CLIP_DEPTH_REMAP * projection;
            let near = m * Vec4::new(0.0, 0.0, -0.1, 1.0);
            let far = m * Vec4::new(0.0, 0.0, -250.0, 1.0);
            assert_abs_diff_eq!(near.z / near.w, 0.0, epsilon = 1e-4);
            assert_abs_diff_eq!(far.z / far.w, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn rov_stays_inside_depth_range_in_axis_and_ortho_views() {
        let mut state = SceneState::with_scenery(&ViewerConfig::default(), Scenery::empty());
        state.update(0.0);

        state.apply(Command::SelectScreen(ScreenMode::Single(Monitor::X)));
        let plan = SceneComposer::new().compose(&state);
        let uniform = FrameUniform::new(&plan.passes[0], &state);
        for subject in [state.eye(), state.rov.position] {
            let z = ndc_depth(&uniform, subject);
            assert!((0.0..=1.0).contains(&z), "axis view depth {z}");
        }

        state.apply(Command::SelectScreen(ScreenMode::Single(Monitor::Main)));
        state.apply(Command::ToggleProjection);
        state.update(0.0);
        let plan = SceneComposer::new().compose(&state);
        let z = ndc_depth(&FrameUniform::new(&plan.passes[0], &state), state.rov.position);
        assert!((0.0..=1.0).contains(&z), "orthographic depth {z}");
    }
}
