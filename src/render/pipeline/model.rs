//! Lit model pipeline: directional sun plus two attenuated point lights

use super::{PipelineVariants, ProgramDesc, build_variants, create_layout, create_shader, texture_layout};
use crate::render::mesh::MeshVertex;

pub struct ModelPipeline {
    pub variants: PipelineVariants,
    /// Diffuse map, specular map, sampler
    pub texture_layout: wgpu::BindGroupLayout,
}

impl ModelPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, uniforms: &wgpu::BindGroupLayout) -> Self {
        let shader = create_shader(
            device,
            "model_shader",
            concat!(include_str!("../../../shaders/scene.wgsl"), include_str!("../../../shaders/model.wgsl")),
        );
        let texture_layout = texture_layout(
            device,
            "model_texture_layout",
            &[wgpu::TextureViewDimension::D2, wgpu::TextureViewDimension::D2],
        );
        let layout = create_layout(device, "model_pipeline_layout", uniforms, &texture_layout);

        let variants = build_variants(
            device,
            &ProgramDesc {
                label: "model_pipeline",
                shader: &shader,
                layout: &layout,
                buffers: &[MeshVertex::desc()],
                blend: None,
                format,
            },
        );

        Self { variants, texture_layout }
    }
}
