//! Parallax-mapped floor pipeline

use super::{PipelineVariants, ProgramDesc, build_variants, create_layout, create_shader, texture_layout};
use crate::render::mesh::ParallaxVertex;

pub struct ParallaxPipeline {
    pub variants: PipelineVariants,
    /// Diffuse, normal and depth maps, sampler
    pub texture_layout: wgpu::BindGroupLayout,
}

impl ParallaxPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, uniforms: &wgpu::BindGroupLayout) -> Self {
        let shader = create_shader(
            device,
            "parallax_shader",
            concat!(include_str!("../../../shaders/scene.wgsl"), include_str!("../../../shaders/parallax.wgsl")),
        );
        let texture_layout = texture_layout(device, "parallax_texture_layout", &[wgpu::TextureViewDimension::D2; 3]);
        let layout = create_layout(device, "parallax_pipeline_layout", uniforms, &texture_layout);

        let variants = build_variants(
            device,
            &ProgramDesc {
                label: "parallax_pipeline",
                shader: &shader,
                layout: &layout,
                buffers: &[ParallaxVertex::desc()],
                blend: None,
                format,
            },
        );

        Self { variants, texture_layout }
    }
}
