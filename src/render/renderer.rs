//! Scene renderer: uploads the fixed asset set once and replays each frame's
//! recorded draws in a single multisampled pass.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::atmosphere::SkyboxSet;
use crate::core::error::Error;
use crate::core::types::{Mat4, Result, Vec3};
use crate::render::assets::{self, MeshData, ModelData, TextureSource};
use crate::render::backend::{DepthFunc, Geometry, Program, RenderBackend, TextureId, Uniform};
use crate::render::buffer::{FrameBuffers, UNIFORM_STRIDE, pack_uniforms};
use crate::render::context::GpuContext;
use crate::render::mesh::{self, BILLBOARD_VERTICES};
use crate::render::pipeline::{
    BlendingPipeline, ModelPipeline, ParallaxPipeline, SkyboxPipeline, texture_bind_group,
};
use crate::render::recorder::{DrawCommand, FrameRecorder};
use crate::render::texture::{ImageData, Texture, create_sampler};
use crate::scene::composer::SceneObject;
use crate::scene::config::ViewerConfig;

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    material: wgpu::BindGroup,
}

struct VertexData {
    buffer: wgpu::Buffer,
    count: u32,
}

impl VertexData {
    fn new<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, vertices: &[T]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self { buffer, count: vertices.len() as u32 }
    }
}

pub struct SceneRenderer {
    recorder: FrameRecorder,
    buffers: FrameBuffers,
    model_pipeline: ModelPipeline,
    parallax_pipeline: ParallaxPipeline,
    blending_pipeline: BlendingPipeline,
    skybox_pipeline: SkyboxPipeline,
    /// Keyed by OBJ path so shared meshes upload once
    models: HashMap<&'static str, Vec<GpuMesh>>,
    floor: VertexData,
    billboard: VertexData,
    skybox_cube: VertexData,
    floor_textures: wgpu::BindGroup,
    billboard_textures: HashMap<TextureId, wgpu::BindGroup>,
    skybox_textures: HashMap<SkyboxSet, wgpu::BindGroup>,
}

impl SceneRenderer {
    /// Build pipelines and load every model and texture. Missing assets are
    /// logged and replaced, never fatal.
    pub fn new(gpu: &GpuContext, config: &ViewerConfig) -> Self {
        let device = &gpu.device;
        let queue = &gpu.queue;
        let format = gpu.format();

        let buffers = FrameBuffers::new(device);
        let uniforms = buffers.bind_group_layout();
        let model_pipeline = ModelPipeline::new(device, format, uniforms);
        let parallax_pipeline = ParallaxPipeline::new(device, format, uniforms);
        let blending_pipeline = BlendingPipeline::new(device, format, uniforms);
        let skybox_pipeline = SkyboxPipeline::new(device, format, uniforms);

        let repeat = create_sampler(device, "repeat_sampler", wgpu::AddressMode::Repeat);
        let clamp = create_sampler(device, "clamp_sampler", wgpu::AddressMode::ClampToEdge);

        let objects_dir = config.objects_dir();
        let mut texture_cache = HashMap::new();
        let mut models = HashMap::new();
        for object in SceneObject::MODELS {
            let (Some(relative), Some(path)) = (object.model_path(), assets::model_file(&objects_dir, object)) else {
                continue;
            };
            if models.contains_key(relative) {
                continue;
            }
            let data = assets::load_model_or_empty(&path);
            log::info!("Loaded {} ({} meshes)", path.display(), data.meshes.len());
            let meshes = upload_model(gpu, &model_pipeline, &repeat, &mut texture_cache, &data);
            models.insert(relative, meshes);
        }

        let textures_dir = config.textures_dir();
        let load = |id: TextureId| Texture::load(device, queue, &assets::texture_file(&textures_dir, id));

        let floor_maps = [TextureId::FloorDiffuse, TextureId::FloorNormal, TextureId::FloorDepth].map(&load);
        let floor_textures = texture_bind_group(
            device,
            &parallax_pipeline.texture_layout,
            "floor_textures",
            &[&floor_maps[0].view, &floor_maps[1].view, &floor_maps[2].view],
            &repeat,
        );

        let billboard_textures = [TextureId::Rain, TextureId::Lightning]
            .into_iter()
            .map(|id| {
                let texture = load(id);
                let group = texture_bind_group(
                    device,
                    &blending_pipeline.texture_layout,
                    "billboard_texture",
                    &[&texture.view],
                    &clamp,
                );
                (id, group)
            })
            .collect();

        let skybox_textures = SkyboxSet::ALL
            .into_iter()
            .map(|set| {
                let cube = Texture::load_cubemap(device, queue, &assets::skybox_dir(&textures_dir, set));
                let group = texture_bind_group(
                    device,
                    &skybox_pipeline.texture_layout,
                    "skybox_texture",
                    &[&cube.view],
                    &clamp,
                );
                (set, group)
            })
            .collect();

        Self {
            recorder: FrameRecorder::new(),
            buffers,
            model_pipeline,
            parallax_pipeline,
            blending_pipeline,
            skybox_pipeline,
            models,
            floor: VertexData::new(device, "floor_vertices", &mesh::floor_vertices()),
            billboard: VertexData::new(device, "billboard_vertices", &BILLBOARD_VERTICES),
            skybox_cube: VertexData::new(device, "skybox_vertices", &mesh::skybox_vertices()),
            floor_textures,
            billboard_textures,
            skybox_textures,
        }
    }

    /// Start recording a new frame
    pub fn begin_frame(&mut self) {
        self.recorder.begin_frame();
    }

    /// Submit the recorded frame. A lost or outdated surface is reconfigured
    /// and the frame dropped.
    pub fn present(&mut self, gpu: &mut GpuContext) -> Result<()> {
        let frame = match gpu.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost, reconfiguring");
                gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(Error::Gpu("out of memory acquiring surface texture".to_string()));
            }
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                return Ok(());
            }
        };
        let target = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let uniform_bytes = pack_uniforms(self.recorder.snapshots());
        self.buffers
            .upload(&gpu.device, &gpu.queue, &uniform_bytes, self.recorder.instances());

        let clear = self.recorder.clear_color().unwrap_or(Vec3::ZERO);
        let mut encoder = gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &gpu.msaa_view,
                    resolve_target: Some(&target),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.x as f64,
                            g: clear.y as f64,
                            b: clear.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Discard,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for command in self.recorder.commands() {
                self.encode(&mut pass, command);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn encode(&self, pass: &mut wgpu::RenderPass<'_>, command: &DrawCommand) {
        let offset = command.uniform_slot * UNIFORM_STRIDE as u32;
        pass.set_bind_group(0, self.buffers.bind_group(), &[offset]);

        match command.geometry {
            Geometry::Model(object) => {
                let Some(meshes) = object.model_path().and_then(|p| self.models.get(p)) else {
                    return;
                };
                pass.set_pipeline(self.model_pipeline.variants.get(command.cull, command.depth));
                for mesh in meshes {
                    pass.set_bind_group(1, &mesh.material, &[]);
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }
            Geometry::FloorQuad => {
                pass.set_pipeline(self.parallax_pipeline.variants.get(command.cull, command.depth));
                pass.set_bind_group(1, &self.floor_textures, &[]);
                pass.set_vertex_buffer(0, self.floor.buffer.slice(..));
                pass.draw(0..self.floor.count, 0..1);
            }
            Geometry::BillboardQuad => {
                let Some(textures) = command.textures[0].and_then(|id| self.billboard_textures.get(&id)) else {
                    return;
                };
                pass.set_pipeline(self.blending_pipeline.variants.get(command.cull, command.depth));
                pass.set_bind_group(1, textures, &[]);
                pass.set_vertex_buffer(0, self.billboard.buffer.slice(..));
                pass.set_vertex_buffer(1, self.buffers.instance_buffer().slice(..));
                pass.draw(0..self.billboard.count, command.instances.clone());
            }
            Geometry::SkyboxCube => {
                let Some(TextureId::Skybox(set)) = command.textures[0] else {
                    return;
                };
                let Some(textures) = self.skybox_textures.get(&set) else {
                    return;
                };
                pass.set_pipeline(self.skybox_pipeline.variants.get(command.cull, command.depth));
                pass.set_bind_group(1, textures, &[]);
                pass.set_vertex_buffer(0, self.skybox_cube.buffer.slice(..));
                pass.draw(0..self.skybox_cube.count, 0..1);
            }
        }
    }
}

/// The frame loop draws through the renderer, which records for `present`
impl RenderBackend for SceneRenderer {
    fn clear(&mut self, color: Vec3) {
        self.recorder.clear(color);
    }
    fn use_program(&mut self, program: Program) {
        self.recorder.use_program(program);
    }
    fn set_uniform(&mut self, name: &'static str, value: Uniform) {
        self.recorder.set_uniform(name, value);
    }
    fn bind_texture(&mut self, slot: u32, texture: TextureId) {
        self.recorder.bind_texture(slot, texture);
    }
    fn set_depth_func(&mut self, func: DepthFunc) {
        self.recorder.set_depth_func(func);
    }
    fn set_face_culling(&mut self, enabled: bool) {
        self.recorder.set_face_culling(enabled);
    }
    fn draw(&mut self, geometry: Geometry) {
        self.recorder.draw(geometry);
    }
    fn draw_instanced(&mut self, geometry: Geometry, instances: &[Mat4]) {
        self.recorder.draw_instanced(geometry, instances);
    }
}

fn upload_model(
    gpu: &GpuContext,
    pipeline: &ModelPipeline,
    sampler: &wgpu::Sampler,
    cache: &mut HashMap<TextureSource, Texture>,
    model: &ModelData,
) -> Vec<GpuMesh> {
    model
        .meshes
        .iter()
        .filter(|mesh| !mesh.indices.is_empty())
        .map(|mesh| upload_mesh(gpu, pipeline, sampler, cache, mesh))
        .collect()
}

fn upload_mesh(
    gpu: &GpuContext,
    pipeline: &ModelPipeline,
    sampler: &wgpu::Sampler,
    cache: &mut HashMap<TextureSource, Texture>,
    mesh: &MeshData,
) -> GpuMesh {
    let device = &gpu.device;
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("model_vertices"),
        contents: bytemuck::cast_slice(&mesh.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("model_indices"),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    let material = &mesh.material;
    cache_texture(gpu, cache, &material.diffuse);
    cache_texture(gpu, cache, &material.specular);
    let material = texture_bind_group(
        device,
        &pipeline.texture_layout,
        "model_material",
        &[&cache[&material.diffuse].view, &cache[&material.specular].view],
        sampler,
    );

    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: mesh.indices.len() as u32,
        material,
    }
}

/// Upload a material channel unless an earlier mesh already did
fn cache_texture(gpu: &GpuContext, cache: &mut HashMap<TextureSource, Texture>, source: &TextureSource) {
    if cache.contains_key(source) {
        return;
    }
    let texture = match source {
        TextureSource::File(path) => Texture::load(&gpu.device, &gpu.queue, path),
        TextureSource::Color(rgba) => {
            Texture::from_image(&gpu.device, &gpu.queue, &ImageData::solid(*rgba), "material_color")
        }
    };
    cache.insert(source.clone(), texture);
}
