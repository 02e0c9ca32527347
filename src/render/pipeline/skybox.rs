//! Cubemap skybox drawn at the far plane

use super::{PipelineVariants, ProgramDesc, build_variants, create_layout, create_shader, texture_layout};
use crate::render::mesh::SkyboxVertex;

pub struct SkyboxPipeline {
    pub variants: PipelineVariants,
    pub texture_layout: wgpu::BindGroupLayout,
}

impl SkyboxPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, uniforms: &wgpu::BindGroupLayout) -> Self {
        let shader = create_shader(
            device,
            "skybox_shader",
            concat!(include_str!("../../../shaders/scene.wgsl"), include_str!("../../../shaders/skybox.wgsl")),
        );
        let texture_layout = texture_layout(device, "skybox_texture_layout", &[wgpu::TextureViewDimension::Cube]);
        let layout = create_layout(device, "skybox_pipeline_layout", uniforms, &texture_layout);

        let variants = build_variants(
            device,
            &ProgramDesc {
                label: "skybox_pipeline",
                shader: &shader,
                layout: &layout,
                buffers: &[SkyboxVertex::desc()],
                blend: None,
                format,
            },
        );

        Self { variants, texture_layout }
    }
}
