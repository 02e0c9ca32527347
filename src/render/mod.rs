//! Rendering system and GPU interfaces

pub mod assets;
pub mod backend;
pub mod buffer;
pub mod context;
pub mod mesh;
pub mod pipeline;
pub mod recorder;
pub mod renderer;
pub mod texture;

pub use backend::{DepthFunc, Geometry, Program, RenderBackend, TextureId, Uniform};
pub use context::GpuContext;
pub use recorder::FrameRecorder;
pub use renderer::SceneRenderer;
