//! GPU buffer management

pub mod frame_buffers;
pub mod scene_uniforms;

pub use frame_buffers::{FrameBuffers, InstanceRaw, pack_uniforms};
pub use scene_uniforms::{GpuPointLight, SceneUniforms, UNIFORM_STRIDE};
