//! Vertex formats and the fixed geometry of the scene.
//!
//! Loaded models use [`MeshVertex`]. The floor, billboard and skybox are
//! built here from constant vertex lists.

use glam::{Vec2, Vec3};

/// Vertex with position, normal and texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Vertex carrying a tangent frame for normal and parallax mapping.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParallaxVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl ParallaxVertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3, 1 => Float32x3, 2 => Float32x2, 3 => Float32x3, 4 => Float32x3
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParallaxVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Billboard corner; the model matrix comes from the instance buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BillboardVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl BillboardVertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BillboardVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyboxVertex {
    pub position: [f32; 3],
}

impl SkyboxVertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SkyboxVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Rain and lightning quad: one unit wide, one unit tall, left edge on the origin.
pub const BILLBOARD_VERTICES: [BillboardVertex; 6] = [
    BillboardVertex { position: [0.0, -0.5, 0.0], uv: [0.0, 1.0] },
    BillboardVertex { position: [0.0, 0.5, 0.0], uv: [0.0, 0.0] },
    BillboardVertex { position: [1.0, 0.5, 0.0], uv: [1.0, 0.0] },
    BillboardVertex { position: [0.0, -0.5, 0.0], uv: [0.0, 1.0] },
    BillboardVertex { position: [1.0, 0.5, 0.0], uv: [1.0, 0.0] },
    BillboardVertex { position: [1.0, -0.5, 0.0], uv: [1.0, 1.0] },
];

/// Unit cube wound to be seen from the inside.
#[rustfmt::skip]
const SKYBOX_POSITIONS: [[f32; 3]; 36] = [
    [-1.0,  1.0, -1.0], [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],

    [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0],

    [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],

    [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],

    [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],

    [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0],
];

pub fn skybox_vertices() -> Vec<SkyboxVertex> {
    SKYBOX_POSITIONS.iter().map(|&position| SkyboxVertex { position }).collect()
}

/// Unit tangent and bitangent of a triangle from its positions and texture coordinates.
pub fn tangent_basis(p: [Vec3; 3], uv: [Vec2; 3]) -> (Vec3, Vec3) {
    let edge1 = p[1] - p[0];
    let edge2 = p[2] - p[0];
    let duv1 = uv[1] - uv[0];
    let duv2 = uv[2] - uv[0];

    let det = duv1.x * duv2.y - duv2.x * duv1.y;
    if det.abs() < f32::EPSILON {
        return (Vec3::X, Vec3::Y);
    }
    let f = 1.0 / det;
    let tangent = f * (duv2.y * edge1 - duv1.y * edge2);
    let bitangent = f * (-duv2.x * edge1 + duv1.x * edge2);
    (tangent.normalize_or_zero(), bitangent.normalize_or_zero())
}

/// Two triangles facing +Z spanning [-1, 1] with a per-triangle tangent frame.
pub fn floor_vertices() -> Vec<ParallaxVertex> {
    let corners = [
        (Vec3::new(-1.0, 1.0, 0.0), Vec2::new(0.0, 1.0)),
        (Vec3::new(-1.0, -1.0, 0.0), Vec2::new(0.0, 0.0)),
        (Vec3::new(1.0, -1.0, 0.0), Vec2::new(1.0, 0.0)),
        (Vec3::new(1.0, 1.0, 0.0), Vec2::new(1.0, 1.0)),
    ];
    let normal = Vec3::Z;

    let mut vertices = Vec::with_capacity(6);
    for tri in [[0, 1, 2], [0, 2, 3]] {
        let p = tri.map(|i| corners[i].0);
        let uv = tri.map(|i| corners[i].1);
        let (tangent, bitangent) = tangent_basis(p, uv);
        for i in 0..3 {
            vertices.push(ParallaxVertex {
                position: p[i].into(),
                normal: normal.into(),
                uv: uv[i].into(),
                tangent: tangent.into(),
                bitangent: bitangent.into(),
            });
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_tangent_frame() {
        let vertices = floor_vertices();
        assert_eq!(vertices.len(), 6);
        for v in &vertices {
            let t = Vec3::from(v.tangent);
            let b = Vec3::from(v.bitangent);
            assert!((t - Vec3::X).length() < 1e-5, "tangent {t:?}");
            assert!((b - Vec3::Y).length() < 1e-5, "bitangent {b:?}");
            assert!((t.cross(b) - Vec3::from(v.normal)).length() < 1e-5);
        }
    }

    #[test]
    fn test_degenerate_uv_falls_back() {
        let p = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let (t, b) = tangent_basis(p, [Vec2::ZERO; 3]);
        assert_eq!((t, b), (Vec3::X, Vec3::Y));
    }

    #[test]
    fn test_skybox_faces_inward() {
        let vertices = skybox_vertices();
        assert_eq!(vertices.len(), 36);
        for tri in vertices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|v| Vec3::from(v.position));
            let normal = (b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            // Counter-clockwise when seen from the origin
            assert!(normal.dot(center) < 0.0);
        }
    }

    #[test]
    fn test_billboard_spans_unit_square() {
        let xs: Vec<f32> = BILLBOARD_VERTICES.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = BILLBOARD_VERTICES.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 0.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 1.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max) - ys.iter().cloned().fold(f32::MAX, f32::min), 1.0);
    }
}
