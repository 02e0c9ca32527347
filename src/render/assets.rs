//! Model and texture lookup for the scene's fixed asset set.
//!
//! Loading is split from GPU upload: [`load_model`] returns plain vertex and
//! material data so it can run (and be tested) without a device.

use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::atmosphere::SkyboxSet;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::render::backend::TextureId;
use crate::render::mesh::MeshVertex;
use crate::scene::composer::SceneObject;

/// Where a material channel gets its pixels
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextureSource {
    File(PathBuf),
    /// Constant color for materials without a texture map
    Color([u8; 4]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialData {
    pub diffuse: TextureSource,
    pub specular: TextureSource,
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            diffuse: TextureSource::Color([255, 255, 255, 255]),
            specular: TextureSource::Color([0, 0, 0, 255]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub material: MaterialData,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelData {
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    pub fn is_empty(&self) -> bool {
        self.meshes.iter().all(|m| m.indices.is_empty())
    }
}

/// Load an OBJ file with its MTL materials. Texture paths resolve against the
/// OBJ's directory.
pub fn load_model(path: &Path) -> Result<ModelData> {
    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    };
    let (models, materials) = tobj::load_obj(path, &options).map_err(|e| Error::asset(path, e))?;
    let materials = materials.unwrap_or_else(|e| {
        log::warn!("No materials for {}: {}", path.display(), e);
        Vec::new()
    });
    let base = path.parent().unwrap_or_else(|| Path::new(""));

    let meshes = models
        .into_iter()
        .map(|model| {
            let material = model
                .mesh
                .material_id
                .and_then(|id| materials.get(id))
                .map(|m| material_data(m, base))
                .unwrap_or_default();
            MeshData {
                vertices: vertices(&model.mesh),
                indices: model.mesh.indices,
                material,
            }
        })
        .collect();
    Ok(ModelData { meshes })
}

/// Load a model, logging the failure and returning no geometry
pub fn load_model_or_empty(path: &Path) -> ModelData {
    load_model(path).unwrap_or_else(|e| {
        log::error!("Model failed to load: {}", e);
        ModelData::default()
    })
}

fn material_data(material: &tobj::Material, base: &Path) -> MaterialData {
    let channel = |texture: &Option<String>, color: Option<[f32; 3]>, fallback: [u8; 4]| match texture {
        Some(file) if !file.is_empty() => TextureSource::File(base.join(file)),
        _ => TextureSource::Color(color.map(to_rgba8).unwrap_or(fallback)),
    };
    MaterialData {
        diffuse: channel(&material.diffuse_texture, material.diffuse, [255, 255, 255, 255]),
        specular: channel(&material.specular_texture, material.specular, [0, 0, 0, 255]),
    }
}

fn to_rgba8(c: [f32; 3]) -> [u8; 4] {
    let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [byte(c[0]), byte(c[1]), byte(c[2]), 255]
}

/// Interleave a tobj mesh. V is flipped so row zero of the image is the top.
fn vertices(mesh: &tobj::Mesh) -> Vec<MeshVertex> {
    let count = mesh.positions.len() / 3;
    let normals = if mesh.normals.len() == mesh.positions.len() {
        mesh.normals.chunks_exact(3).map(|n| Vec3::new(n[0], n[1], n[2])).collect()
    } else {
        smooth_normals(&mesh.positions, &mesh.indices)
    };

    (0..count)
        .map(|i| {
            let uv = if mesh.texcoords.len() >= (i + 1) * 2 {
                [mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };
            MeshVertex {
                position: [mesh.positions[i * 3], mesh.positions[i * 3 + 1], mesh.positions[i * 3 + 2]],
                normal: normals[i].into(),
                uv,
            }
        })
        .collect()
}

/// Area-weighted vertex normals for meshes exported without them
fn smooth_normals(positions: &[f32], indices: &[u32]) -> Vec<Vec3> {
    let point = |i: u32| {
        let i = i as usize * 3;
        Vec3::new(positions[i], positions[i + 1], positions[i + 2])
    };
    let mut normals = vec![Vec3::ZERO; positions.len() / 3];
    for tri in indices.chunks_exact(3) {
        let face = (point(tri[1]) - point(tri[0])).cross(point(tri[2]) - point(tri[0]));
        for &i in tri {
            normals[i as usize] += face;
        }
    }
    normals.iter().map(|n| n.normalize_or_zero()).collect()
}

/// OBJ file backing a scene object, if it has one
pub fn model_file(objects_dir: &Path, object: SceneObject) -> Option<PathBuf> {
    object.model_path().map(|p| objects_dir.join(p))
}

/// Image file (or cubemap directory for skyboxes) backing a texture
pub fn texture_file(textures_dir: &Path, texture: TextureId) -> PathBuf {
    let name = match texture {
        TextureId::Rain => "rain.png",
        TextureId::Lightning => "lightning.png",
        TextureId::FloorDiffuse => "bricks2.jpg",
        TextureId::FloorNormal => "bricks2_normal.jpg",
        TextureId::FloorDepth => "bricks2_disp.jpg",
        TextureId::Skybox(set) => return skybox_dir(textures_dir, set),
    };
    textures_dir.join(name)
}

pub fn skybox_dir(textures_dir: &Path, set: SkyboxSet) -> PathBuf {
    textures_dir.join(set.dir_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TRIANGLE_OBJ: &str = "mtllib tri.mtl\n\
        v 0 0 0\nv 1 0 0\nv 0 1 0\n\
        vt 0 0\nvt 1 0\nvt 0 1\n\
        vn 0 0 1\n\
        usemtl painted\n\
        f 1/1/1 2/2/1 3/3/1\n";

    #[test]
    fn test_load_obj_with_material() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tri.obj"), TRIANGLE_OBJ).unwrap();
        fs::write(dir.path().join("tri.mtl"), "newmtl painted\nKd 1 0 0\nmap_Kd wood.png\n").unwrap();

        let model = load_model(&dir.path().join("tri.obj")).unwrap();
        assert_eq!(model.meshes.len(), 1);
        let mesh = &model.meshes[0];
        assert_eq!(mesh.indices.len(), 3);
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.material.diffuse, TextureSource::File(dir.path().join("wood.png")));
        assert_eq!(mesh.material.specular, TextureSource::Color([0, 0, 0, 255]));

        // v = 0 in the file lands on the bottom row
        let origin = mesh.vertices.iter().find(|v| v.position == [0.0, 0.0, 0.0]).unwrap();
        assert_eq!(origin.uv, [0.0, 1.0]);
        assert_eq!(origin.normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_missing_normals_are_generated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.obj");
        fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 0 -1\nf 1 2 3\n").unwrap();

        let model = load_model(&path).unwrap();
        for v in &model.meshes[0].vertices {
            assert!((Vec3::from(v.normal) - Vec3::Y).length() < 1e-5);
        }
        assert_eq!(model.meshes[0].material, MaterialData::default());
    }

    #[test]
    fn test_missing_model_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let model = load_model_or_empty(&dir.path().join("nope.obj"));
        assert!(model.is_empty());
    }

    #[test]
    fn test_asset_paths() {
        let objects = Path::new("res/objects");
        assert_eq!(
            model_file(objects, SceneObject::ChairB),
            Some(PathBuf::from("res/objects/chair/chair.obj"))
        );
        assert_eq!(model_file(objects, SceneObject::ParallaxFloor), None);

        let textures = Path::new("res/textures");
        assert_eq!(texture_file(textures, TextureId::FloorDepth), textures.join("bricks2_disp.jpg"));
        assert_eq!(
            texture_file(textures, TextureId::Skybox(SkyboxSet::Storm)),
            textures.join("skyboxStorm")
        );
    }
}
