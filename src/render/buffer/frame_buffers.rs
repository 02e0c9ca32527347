//! Per-frame GPU buffers: uniform snapshots and instance matrices

use bytemuck::{Pod, Zeroable};

use super::scene_uniforms::{SceneUniforms, UNIFORM_STRIDE};
use crate::core::types::Mat4;

/// One instance matrix, as vertex attributes 2..=5
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl From<Mat4> for InstanceRaw {
    fn from(m: Mat4) -> Self {
        Self { model: m.to_cols_array_2d() }
    }
}

impl InstanceRaw {
    const ATTRIBS: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Pack uniform snapshots at `UNIFORM_STRIDE` spacing
pub fn pack_uniforms(snapshots: &[SceneUniforms]) -> Vec<u8> {
    let stride = UNIFORM_STRIDE as usize;
    let mut bytes = vec![0u8; snapshots.len().max(1) * stride];
    for (i, snapshot) in snapshots.iter().enumerate() {
        let src = bytemuck::bytes_of(snapshot);
        bytes[i * stride..i * stride + src.len()].copy_from_slice(src);
    }
    bytes
}

/// Growable uniform and instance buffers rewritten every frame
pub struct FrameBuffers {
    uniform_buffer: wgpu::Buffer,
    uniform_capacity: u64,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u64,
}

impl FrameBuffers {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<SceneUniforms>() as u64),
                },
                count: None,
            }],
        });

        let uniform_capacity = UNIFORM_STRIDE * 32;
        let uniform_buffer = create_uniform_buffer(device, uniform_capacity);
        let bind_group = create_bind_group(device, &bind_group_layout, &uniform_buffer);

        let instance_capacity = std::mem::size_of::<InstanceRaw>() as u64 * 1024;
        let instance_buffer = create_instance_buffer(device, instance_capacity);

        Self {
            uniform_buffer,
            uniform_capacity,
            bind_group_layout,
            bind_group,
            instance_buffer,
            instance_capacity,
        }
    }

    /// Upload this frame's data, reallocating when it outgrows the buffers
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, uniforms: &[u8], instances: &[InstanceRaw]) {
        let uniform_len = uniforms.len() as u64;
        if uniform_len > self.uniform_capacity {
            self.uniform_capacity = uniform_len.next_power_of_two();
            self.uniform_buffer = create_uniform_buffer(device, self.uniform_capacity);
            self.bind_group = create_bind_group(device, &self.bind_group_layout, &self.uniform_buffer);
            log::debug!("Uniform buffer grown to {} bytes", self.uniform_capacity);
        }
        queue.write_buffer(&self.uniform_buffer, 0, uniforms);

        let instance_bytes: &[u8] = bytemuck::cast_slice(instances);
        let instance_len = instance_bytes.len() as u64;
        if instance_len > self.instance_capacity {
            self.instance_capacity = instance_len.next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
            log::debug!("Instance buffer grown to {} bytes", self.instance_capacity);
        }
        if !instance_bytes.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, instance_bytes);
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn instance_buffer(&self) -> &wgpu::Buffer {
        &self.instance_buffer
    }
}

fn create_uniform_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("scene_uniforms"),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_instance_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instances"),
        size,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_bind_group(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, buffer: &wgpu::Buffer) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("scene_uniform_bind_group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<SceneUniforms>() as u64),
            }),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_uniforms_stride() {
        let mut second = SceneUniforms::default();
        second.parallax[3] = 0.25;
        let bytes = pack_uniforms(&[SceneUniforms::default(), second]);
        assert_eq!(bytes.len(), 2 * UNIFORM_STRIDE as usize);

        let start = UNIFORM_STRIDE as usize;
        let size = std::mem::size_of::<SceneUniforms>();
        let unpacked: SceneUniforms = bytemuck::pod_read_unaligned(&bytes[start..start + size]);
        assert_eq!(unpacked.parallax[3], 0.25);
    }

    #[test]
    fn test_pack_empty_keeps_one_slot() {
        assert_eq!(pack_uniforms(&[]).len(), UNIFORM_STRIDE as usize);
    }

    #[test]
    fn test_instance_from_mat4() {
        let m = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let raw = InstanceRaw::from(m);
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 64);
    }
}
