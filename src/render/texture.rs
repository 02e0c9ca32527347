//! Texture loading: 2D images and six-face cubemaps

use std::path::{Path, PathBuf};

use crate::core::error::Error;
use crate::core::types::Result;

/// Decoded RGBA8 pixels
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    /// Single opaque black pixel, used when an image cannot be loaded
    pub fn black() -> Self {
        Self::solid([0, 0, 0, 255])
    }

    pub fn solid(rgba: [u8; 4]) -> Self {
        Self { width: 1, height: 1, rgba: rgba.to_vec() }
    }

    pub fn decode(path: &Path) -> Result<Self> {
        let image = image::open(path).map_err(|e| Error::asset(path, e.to_string()))?;
        let rgba = image.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }

    /// Decode `path`, logging the failure and falling back to black
    pub fn decode_or_black(path: &Path) -> Self {
        Self::decode(path).unwrap_or_else(|e| {
            log::error!("Texture failed to load: {}", e);
            Self::black()
        })
    }
}

/// Cubemap face files in layer order: +X, -X, +Y, -Y, +Z, -Z
pub fn cubemap_faces(dir: &Path) -> [PathBuf; 6] {
    ["px", "nx", "py", "ny", "pz", "nz"].map(|face| dir.join(format!("{face}.jpg")))
}

/// Decode all six faces. Any unreadable face, or faces of differing sizes,
/// fails the whole cubemap.
pub fn decode_cubemap(faces: &[PathBuf; 6]) -> Result<[ImageData; 6]> {
    let mut decoded = Vec::with_capacity(6);
    for path in faces {
        decoded.push(ImageData::decode(path)?);
    }
    let (w, h) = (decoded[0].width, decoded[0].height);
    if let Some(face) = decoded.iter().position(|img| img.width != w || img.height != h) {
        return Err(Error::asset(&faces[face], format!("cubemap face is not {w}x{h}")));
    }
    decoded
        .try_into()
        .map_err(|_| Error::asset(&faces[0], "cubemap needs six faces"))
}

/// Uploaded texture and its default view
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl Texture {
    pub fn from_image(device: &wgpu::Device, queue: &wgpu::Queue, image: &ImageData, label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = create_texture(device, label, size);
        write_layer(queue, &texture, image, 0);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    pub fn cubemap(device: &wgpu::Device, queue: &wgpu::Queue, faces: &[ImageData; 6], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: faces[0].width,
            height: faces[0].height,
            depth_or_array_layers: 6,
        };
        let texture = create_texture(device, label, size);
        for (layer, face) in faces.iter().enumerate() {
            write_layer(queue, &texture, face, layer as u32);
        }
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        Self { texture, view }
    }

    pub fn load(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> Self {
        let image = ImageData::decode_or_black(path);
        Self::from_image(device, queue, &image, &path.display().to_string())
    }

    /// Load a cubemap directory, falling back to a black cube
    pub fn load_cubemap(device: &wgpu::Device, queue: &wgpu::Queue, dir: &Path) -> Self {
        let label = dir.display().to_string();
        let faces = decode_cubemap(&cubemap_faces(dir)).unwrap_or_else(|e| {
            log::error!("Cubemap failed to load: {}", e);
            std::array::from_fn(|_| ImageData::black())
        });
        Self::cubemap(device, queue, &faces, &label)
    }
}

fn create_texture(device: &wgpu::Device, label: &str, size: wgpu::Extent3d) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

fn write_layer(queue: &wgpu::Queue, texture: &wgpu::Texture, image: &ImageData, layer: u32) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d { x: 0, y: 0, z: layer },
            aspect: wgpu::TextureAspect::All,
        },
        &image.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        },
    );
}

/// Linear filtering with repeat addressing
pub fn create_sampler(device: &wgpu::Device, label: &str, address_mode: wgpu::AddressMode) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, size: u32, pixel: [u8; 4]) {
        image::RgbaImage::from_pixel(size, size, image::Rgba(pixel))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_decode_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rain.png");
        write_png(&path, 2, [10, 20, 30, 40]);

        let image = ImageData::decode(&path).unwrap();
        assert_eq!((image.width, image.height), (2, 2));
        assert_eq!(&image.rgba[..4], &[10, 20, 30, 40]);
    }

    #[test]
    fn test_missing_texture_is_black() {
        let dir = tempfile::tempdir().unwrap();
        let image = ImageData::decode_or_black(&dir.path().join("missing.png"));
        assert_eq!(image, ImageData::black());
    }

    #[test]
    fn test_cubemap_face_order() {
        let faces = cubemap_faces(Path::new("textures/skyboxSun"));
        let names: Vec<_> = faces
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["px.jpg", "nx.jpg", "py.jpg", "ny.jpg", "pz.jpg", "nz.jpg"]);
    }

    #[test]
    fn test_cubemap_rejects_mismatched_faces() {
        let dir = tempfile::tempdir().unwrap();
        let faces: [PathBuf; 6] = std::array::from_fn(|i| dir.path().join(format!("{i}.png")));
        for (i, face) in faces.iter().enumerate() {
            write_png(face, if i == 3 { 4 } else { 2 }, [0, 0, 255, 255]);
        }
        assert!(decode_cubemap(&faces).is_err());

        write_png(&faces[3], 2, [0, 0, 255, 255]);
        let decoded = decode_cubemap(&faces).unwrap();
        assert!(decoded.iter().all(|f| f.width == 2));
    }
}
