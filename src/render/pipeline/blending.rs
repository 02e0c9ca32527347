//! Instanced alpha-blended billboards (rain drops and lightning bolts)

use super::{PipelineVariants, ProgramDesc, build_variants, create_layout, create_shader, texture_layout};
use crate::render::buffer::InstanceRaw;
use crate::render::mesh::BillboardVertex;

pub struct BlendingPipeline {
    pub variants: PipelineVariants,
    pub texture_layout: wgpu::BindGroupLayout,
}

impl BlendingPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, uniforms: &wgpu::BindGroupLayout) -> Self {
        let shader = create_shader(
            device,
            "blending_shader",
            concat!(include_str!("../../../shaders/scene.wgsl"), include_str!("../../../shaders/blending.wgsl")),
        );
        let texture_layout = texture_layout(device, "blending_texture_layout", &[wgpu::TextureViewDimension::D2]);
        let layout = create_layout(device, "blending_pipeline_layout", uniforms, &texture_layout);

        let variants = build_variants(
            device,
            &ProgramDesc {
                label: "blending_pipeline",
                shader: &shader,
                layout: &layout,
                buffers: &[BillboardVertex::desc(), InstanceRaw::desc()],
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                format,
            },
        );

        Self { variants, texture_layout }
    }
}
