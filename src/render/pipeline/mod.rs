//! Render pipelines.
//!
//! Every program is built once per combination of face culling and depth
//! compare so the frame can switch that state between draws. Bind group 0
//! is the shared scene uniform block; group 1 holds the program's textures.

pub mod blending;
pub mod model;
pub mod parallax;
pub mod skybox;

pub use blending::BlendingPipeline;
pub use model::ModelPipeline;
pub use parallax::ParallaxPipeline;
pub use skybox::SkyboxPipeline;

use crate::render::backend::DepthFunc;
use crate::render::context::{DEPTH_FORMAT, SAMPLE_COUNT};

/// One pipeline per (cull, depth) state
pub struct PipelineVariants {
    pipelines: [wgpu::RenderPipeline; 4],
}

impl PipelineVariants {
    pub fn get(&self, cull: bool, depth: DepthFunc) -> &wgpu::RenderPipeline {
        &self.pipelines[variant_index(cull, depth)]
    }
}

fn variant_index(cull: bool, depth: DepthFunc) -> usize {
    let depth = match depth {
        DepthFunc::Less => 0,
        DepthFunc::LessEqual => 1,
    };
    usize::from(cull) * 2 + depth
}

/// Shader and fixed-function state shared by a program's variants
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub shader: &'a wgpu::ShaderModule,
    pub layout: &'a wgpu::PipelineLayout,
    pub buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub blend: Option<wgpu::BlendState>,
    pub format: wgpu::TextureFormat,
}

pub fn build_variants(device: &wgpu::Device, desc: &ProgramDesc) -> PipelineVariants {
    let build = |index: usize| {
        let cull = index >= 2;
        let depth_compare = if index % 2 == 0 {
            wgpu::CompareFunction::Less
        } else {
            wgpu::CompareFunction::LessEqual
        };
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(desc.layout),
            vertex: wgpu::VertexState {
                module: desc.shader,
                entry_point: Some("vs_main"),
                buffers: desc.buffers,
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: cull.then_some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: SAMPLE_COUNT,
                ..Default::default()
            },
            fragment: Some(wgpu::FragmentState {
                module: desc.shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.format,
                    blend: desc.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        })
    };

    PipelineVariants {
        pipelines: std::array::from_fn(build),
    }
}

pub fn create_shader(device: &wgpu::Device, label: &str, source: &'static str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

pub fn create_layout(
    device: &wgpu::Device,
    label: &str,
    uniforms: &wgpu::BindGroupLayout,
    textures: &wgpu::BindGroupLayout,
) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[uniforms, textures],
        immediate_size: 0,
    })
}

/// Texture bindings `0..dimensions.len()` followed by a filtering sampler
pub fn texture_layout(
    device: &wgpu::Device,
    label: &str,
    dimensions: &[wgpu::TextureViewDimension],
) -> wgpu::BindGroupLayout {
    let mut entries: Vec<wgpu::BindGroupLayoutEntry> = dimensions
        .iter()
        .enumerate()
        .map(|(binding, &view_dimension)| wgpu::BindGroupLayoutEntry {
            binding: binding as u32,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension,
                multisampled: false,
            },
            count: None,
        })
        .collect();
    entries.push(wgpu::BindGroupLayoutEntry {
        binding: dimensions.len() as u32,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    });

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &entries,
    })
}

pub fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    views: &[&wgpu::TextureView],
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    let mut entries: Vec<wgpu::BindGroupEntry> = views
        .iter()
        .enumerate()
        .map(|(binding, view)| wgpu::BindGroupEntry {
            binding: binding as u32,
            resource: wgpu::BindingResource::TextureView(view),
        })
        .collect();
    entries.push(wgpu::BindGroupEntry {
        binding: views.len() as u32,
        resource: wgpu::BindingResource::Sampler(sampler),
    });

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &entries,
    })
}
