//! Renderer boundary.
//!
//! The frame loop talks to the GPU through [`RenderBackend`] in the same
//! vocabulary the shaders use: select a program, set named uniforms, bind
//! textures, toggle depth/cull state and draw.

use crate::atmosphere::SkyboxSet;
use crate::core::types::{Mat4, Vec3};
use crate::scene::composer::SceneObject;

/// Shader programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Program {
    /// Lit textured models
    Model,
    /// Parallax-mapped floor
    Parallax,
    /// Alpha-blended instanced billboards
    Blending,
    Skybox,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Mat4(Mat4),
    Vec3(Vec3),
    Float(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    Rain,
    Lightning,
    FloorDiffuse,
    FloorNormal,
    FloorDepth,
    Skybox(SkyboxSet),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Geometry {
    Model(SceneObject),
    /// Tangent-space quad for the parallax floor
    FloorQuad,
    /// Billboard quad shared by rain and lightning
    BillboardQuad,
    SkyboxCube,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthFunc {
    Less,
    LessEqual,
}

pub trait RenderBackend {
    /// Clear color and depth
    fn clear(&mut self, color: Vec3);
    fn use_program(&mut self, program: Program);
    fn set_uniform(&mut self, name: &'static str, value: Uniform);
    fn bind_texture(&mut self, slot: u32, texture: TextureId);
    fn set_depth_func(&mut self, func: DepthFunc);
    fn set_face_culling(&mut self, enabled: bool);
    fn draw(&mut self, geometry: Geometry);
    fn draw_instanced(&mut self, geometry: Geometry, instances: &[Mat4]);

    fn set_mat4(&mut self, name: &'static str, value: Mat4) {
        self.set_uniform(name, Uniform::Mat4(value));
    }

    fn set_vec3(&mut self, name: &'static str, value: Vec3) {
        self.set_uniform(name, Uniform::Vec3(value));
    }

    fn set_float(&mut self, name: &'static str, value: f32) {
        self.set_uniform(name, Uniform::Float(value));
    }
}

/// Backend that records every call, for frame-order tests
#[cfg(test)]
pub mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Clear(Vec3),
        UseProgram(Program),
        SetUniform(&'static str, Uniform),
        BindTexture(u32, TextureId),
        DepthFunc(DepthFunc),
        FaceCulling(bool),
        Draw(Geometry),
        DrawInstanced(Geometry, usize),
    }

    #[derive(Default)]
    pub struct RecordingBackend {
        pub calls: Vec<Call>,
    }

    impl RecordingBackend {
        pub fn draws(&self) -> Vec<Geometry> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Draw(g) | Call::DrawInstanced(g, _) => Some(*g),
                    _ => None,
                })
                .collect()
        }

        /// Last value set for `name` before the `n`th draw call
        pub fn uniform_before_draw(&self, name: &str, n: usize) -> Option<Uniform> {
            let mut last = None;
            let mut seen = 0;
            for call in &self.calls {
                match call {
                    Call::SetUniform(k, v) if *k == name => last = Some(*v),
                    Call::Draw(_) | Call::DrawInstanced(..) => {
                        if seen == n {
                            return last;
                        }
                        seen += 1;
                    }
                    _ => {}
                }
            }
            None
        }

        pub fn position(&self, call: &Call) -> Option<usize> {
            self.calls.iter().position(|c| c == call)
        }
    }

    impl RenderBackend for RecordingBackend {
        fn clear(&mut self, color: Vec3) {
            self.calls.push(Call::Clear(color));
        }
        fn use_program(&mut self, program: Program) {
            self.calls.push(Call::UseProgram(program));
        }
        fn set_uniform(&mut self, name: &'static str, value: Uniform) {
            self.calls.push(Call::SetUniform(name, value));
        }
        fn bind_texture(&mut self, slot: u32, texture: TextureId) {
            self.calls.push(Call::BindTexture(slot, texture));
        }
        fn set_depth_func(&mut self, func: DepthFunc) {
            self.calls.push(Call::DepthFunc(func));
        }
        fn set_face_culling(&mut self, enabled: bool) {
            self.calls.push(Call::FaceCulling(enabled));
        }
        fn draw(&mut self, geometry: Geometry) {
            self.calls.push(Call::Draw(geometry));
        }
        fn draw_instanced(&mut self, geometry: Geometry, instances: &[Mat4]) {
            self.calls.push(Call::DrawInstanced(geometry, instances.len()));
        }
    }
}
