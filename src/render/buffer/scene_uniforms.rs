//! Uniform block shared by every scene shader

use bytemuck::{Pod, Zeroable};

use crate::core::types::{Mat4, Vec3};
use crate::render::backend::Uniform;

/// Spacing between per-draw uniform snapshots in the dynamic buffer.
/// Must be a multiple of `min_uniform_buffer_offset_alignment` (256).
pub const UNIFORM_STRIDE: u64 = 512;

/// Point light as laid out in WGSL
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuPointLight {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// constant, linear, quadratic, unused
    pub attenuation: [f32; 4],
}

impl GpuPointLight {
    fn set(&mut self, field: &str, value: Uniform) -> bool {
        match (field, value) {
            ("position", Uniform::Vec3(v)) => self.position = vec4(v),
            ("ambient", Uniform::Vec3(v)) => self.ambient = vec4(v),
            ("diffuse", Uniform::Vec3(v)) => self.diffuse = vec4(v),
            ("specular", Uniform::Vec3(v)) => self.specular = vec4(v),
            ("constant", Uniform::Float(f)) => self.attenuation[0] = f,
            ("linear", Uniform::Float(f)) => self.attenuation[1] = f,
            ("quadratic", Uniform::Float(f)) => self.attenuation[2] = f,
            _ => return false,
        }
        true
    }
}

/// Scene uniform data for GPU (must match `Scene` in the shaders)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// Camera position in xyz, material shininess in w
    pub view_position: [f32; 4],
    pub dir_direction: [f32; 4],
    pub dir_ambient: [f32; 4],
    pub dir_diffuse: [f32; 4],
    pub dir_specular: [f32; 4],
    pub point_light: GpuPointLight,
    pub indoor_light: GpuPointLight,
    /// Parallax light position in xyz, height scale in w
    pub parallax: [f32; 4],
    /// Parallax view position
    pub parallax_view: [f32; 4],
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            view_position: [0.0, 0.0, 0.0, 32.0],
            dir_direction: [0.0, -1.0, 0.0, 0.0],
            dir_ambient: [0.0; 4],
            dir_diffuse: [0.0; 4],
            dir_specular: [0.0; 4],
            point_light: GpuPointLight { attenuation: [1.0, 0.0, 0.0, 0.0], ..Default::default() },
            indoor_light: GpuPointLight { attenuation: [1.0, 0.0, 0.0, 0.0], ..Default::default() },
            parallax: [0.0; 4],
            parallax_view: [0.0; 4],
        }
    }
}

impl SceneUniforms {
    /// Store a uniform by its shader name. Returns false when the name or
    /// value type is not part of the block.
    pub fn set(&mut self, name: &str, value: Uniform) -> bool {
        if let Some((light, field)) = name.split_once('.') {
            return match light {
                "dirLight" => self.set_dir_light(field, value),
                "pointLight" => self.point_light.set(field, value),
                "indoorLight" => self.indoor_light.set(field, value),
                "material" if field == "shininess" => match value {
                    Uniform::Float(f) => {
                        self.view_position[3] = f;
                        true
                    }
                    _ => false,
                },
                _ => false,
            };
        }

        match (name, value) {
            ("projection", Uniform::Mat4(m)) => self.projection = m.to_cols_array_2d(),
            ("view", Uniform::Mat4(m)) => self.view = m.to_cols_array_2d(),
            ("model", Uniform::Mat4(m)) => self.model = m.to_cols_array_2d(),
            ("viewPosition", Uniform::Vec3(v)) => {
                self.view_position = [v.x, v.y, v.z, self.view_position[3]];
            }
            ("viewPos", Uniform::Vec3(v)) => self.parallax_view = vec4(v),
            ("lightPos", Uniform::Vec3(v)) => {
                self.parallax = [v.x, v.y, v.z, self.parallax[3]];
            }
            ("heightScale", Uniform::Float(f)) => self.parallax[3] = f,
            _ => return false,
        }
        true
    }

    fn set_dir_light(&mut self, field: &str, value: Uniform) -> bool {
        let Uniform::Vec3(v) = value else {
            return false;
        };
        match field {
            "direction" => self.dir_direction = vec4(v),
            "ambient" => self.dir_ambient = vec4(v),
            "diffuse" => self.dir_diffuse = vec4(v),
            "specular" => self.dir_specular = vec4(v),
            _ => return false,
        }
        true
    }
}

fn vec4(v: Vec3) -> [f32; 4] {
    [v.x, v.y, v.z, 0.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size() {
        let size = std::mem::size_of::<SceneUniforms>();
        assert_eq!(size, 464, "SceneUniforms must match the WGSL layout, got {} bytes", size);
        assert!(size as u64 <= UNIFORM_STRIDE);
        assert_eq!(UNIFORM_STRIDE % 256, 0);
    }

    #[test]
    fn test_named_fields() {
        let mut u = SceneUniforms::default();
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert!(u.set("model", Uniform::Mat4(model)));
        assert!(u.set("viewPosition", Uniform::Vec3(Vec3::new(4.0, 5.0, 6.0))));
        assert!(u.set("material.shininess", Uniform::Float(16.0)));
        assert!(u.set("pointLight.quadratic", Uniform::Float(0.5)));
        assert!(u.set("indoorLight.diffuse", Uniform::Vec3(Vec3::ONE)));
        assert!(u.set("dirLight.direction", Uniform::Vec3(Vec3::NEG_Y)));
        assert!(u.set("heightScale", Uniform::Float(0.1)));
        assert!(u.set("lightPos", Uniform::Vec3(Vec3::X)));

        assert_eq!(u.model, model.to_cols_array_2d());
        assert_eq!(u.view_position, [4.0, 5.0, 6.0, 16.0]);
        assert_eq!(u.point_light.attenuation[2], 0.5);
        assert_eq!(u.indoor_light.diffuse, [1.0, 1.0, 1.0, 0.0]);
        assert_eq!(u.dir_direction, [0.0, -1.0, 0.0, 0.0]);
        assert_eq!(u.parallax, [1.0, 0.0, 0.0, 0.1]);
    }

    #[test]
    fn test_rejects_unknown_or_mistyped() {
        let mut u = SceneUniforms::default();
        assert!(!u.set("fogDensity", Uniform::Float(1.0)));
        assert!(!u.set("model", Uniform::Float(1.0)));
        assert!(!u.set("pointLight.colour", Uniform::Vec3(Vec3::ONE)));
        assert!(!u.set("dirLight.direction", Uniform::Float(0.0)));
    }
}
