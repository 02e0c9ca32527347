//! CPU side of the renderer: turns [`RenderBackend`] calls into draw commands.
//!
//! Uniforms live per program and texture units are global, the same way a
//! GL context tracks them. Each accepted draw snapshots the current
//! program's uniforms into its own slot of the frame's dynamic buffer.

use std::collections::HashSet;
use std::ops::Range;

use crate::core::types::{Mat4, Vec3};
use crate::render::backend::{DepthFunc, Geometry, Program, RenderBackend, TextureId, Uniform};
use crate::render::buffer::{InstanceRaw, SceneUniforms};

pub const TEXTURE_UNITS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub program: Program,
    pub geometry: Geometry,
    pub cull: bool,
    pub depth: DepthFunc,
    /// Index into the frame's uniform snapshots
    pub uniform_slot: u32,
    pub textures: [Option<TextureId>; TEXTURE_UNITS],
    pub instances: Range<u32>,
}

pub struct FrameRecorder {
    clear_color: Option<Vec3>,
    program: Program,
    uniforms: [SceneUniforms; 4],
    textures: [Option<TextureId>; TEXTURE_UNITS],
    cull: bool,
    depth: DepthFunc,
    snapshots: Vec<SceneUniforms>,
    instances: Vec<InstanceRaw>,
    commands: Vec<DrawCommand>,
    warned: HashSet<String>,
}

impl Default for FrameRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self {
            clear_color: None,
            program: Program::Model,
            uniforms: [SceneUniforms::default(); 4],
            textures: [None; TEXTURE_UNITS],
            cull: true,
            depth: DepthFunc::Less,
            snapshots: Vec::new(),
            instances: Vec::new(),
            commands: Vec::new(),
            warned: HashSet::new(),
        }
    }

    /// Drop last frame's commands. Program, uniform, texture and
    /// depth/cull state carry over.
    pub fn begin_frame(&mut self) {
        self.clear_color = None;
        self.snapshots.clear();
        self.instances.clear();
        self.commands.clear();
    }

    pub fn clear_color(&self) -> Option<Vec3> {
        self.clear_color
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn snapshots(&self) -> &[SceneUniforms] {
        &self.snapshots
    }

    pub fn instances(&self) -> &[InstanceRaw] {
        &self.instances
    }

    fn warn_once(&mut self, message: String) {
        if self.warned.insert(message.clone()) {
            log::warn!("{}", message);
        }
    }

    /// Queue a draw if the program can render `geometry` with the bound textures
    fn push(&mut self, geometry: Geometry, instances: Range<u32>) {
        if !draws(self.program, geometry) {
            self.warn_once(format!("{:?} program cannot draw {:?}", self.program, geometry));
            return;
        }
        if !textures_ready(self.program, &self.textures) {
            self.warn_once(format!("{:?} draw skipped, bound textures {:?}", self.program, self.textures));
            return;
        }

        self.snapshots.push(self.uniforms[program_index(self.program)]);
        self.commands.push(DrawCommand {
            program: self.program,
            geometry,
            cull: self.cull,
            depth: self.depth,
            uniform_slot: (self.snapshots.len() - 1) as u32,
            textures: self.textures,
            instances,
        });
    }
}

fn program_index(program: Program) -> usize {
    match program {
        Program::Model => 0,
        Program::Parallax => 1,
        Program::Blending => 2,
        Program::Skybox => 3,
    }
}

/// Which geometry each program's vertex layout accepts
fn draws(program: Program, geometry: Geometry) -> bool {
    matches!(
        (program, geometry),
        (Program::Model, Geometry::Model(_))
            | (Program::Parallax, Geometry::FloorQuad)
            | (Program::Blending, Geometry::BillboardQuad)
            | (Program::Skybox, Geometry::SkyboxCube)
    )
}

fn textures_ready(program: Program, textures: &[Option<TextureId>; TEXTURE_UNITS]) -> bool {
    match program {
        // Models carry their own materials
        Program::Model => true,
        Program::Parallax => {
            textures
                == &[
                    Some(TextureId::FloorDiffuse),
                    Some(TextureId::FloorNormal),
                    Some(TextureId::FloorDepth),
                ]
        }
        Program::Blending => matches!(textures[0], Some(TextureId::Rain | TextureId::Lightning)),
        Program::Skybox => matches!(textures[0], Some(TextureId::Skybox(_))),
    }
}

impl RenderBackend for FrameRecorder {
    fn clear(&mut self, color: Vec3) {
        self.clear_color = Some(color);
    }

    fn use_program(&mut self, program: Program) {
        self.program = program;
    }

    fn set_uniform(&mut self, name: &'static str, value: Uniform) {
        if !self.uniforms[program_index(self.program)].set(name, value) {
            self.warn_once(format!("Unknown uniform `{}` = {:?}", name, value));
        }
    }

    fn bind_texture(&mut self, slot: u32, texture: TextureId) {
        match self.textures.get_mut(slot as usize) {
            Some(unit) => *unit = Some(texture),
            None => self.warn_once(format!("Texture unit {} out of range", slot)),
        }
    }

    fn set_depth_func(&mut self, func: DepthFunc) {
        self.depth = func;
    }

    fn set_face_culling(&mut self, enabled: bool) {
        self.cull = enabled;
    }

    fn draw(&mut self, geometry: Geometry) {
        self.push(geometry, 0..1);
    }

    fn draw_instanced(&mut self, geometry: Geometry, instances: &[Mat4]) {
        if instances.is_empty() {
            return;
        }
        let queued = self.commands.len();
        let start = self.instances.len() as u32;
        self.instances.extend(instances.iter().copied().map(InstanceRaw::from));
        let end = self.instances.len() as u32;
        self.push(geometry, start..end);
        // A rejected draw must not leave its matrices behind
        if self.commands.len() == queued {
            self.instances.truncate(start as usize);
        }
    }
}
