//! Floor texture and environment cubemap loading.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{InitError, Result};

/// Cubemap face files in layer order (+X, -X, +Y, -Y, +Z, -Z)
pub const CUBEMAP_FACES: [&str; 6] = [
    "posx.jpg", "negx.jpg", "posy.jpg", "negy.jpg", "posz.jpg", "negz.jpg",
];

/// Decode an image file to 8-bit RGBA
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|source| InitError::Texture {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

/// Six decoded cubemap faces of equal square size
#[derive(Debug)]
pub struct CubemapFaces {
    pub size: u32,
    pub faces: Vec<RgbaImage>,
}

/// Load all six faces from `dir`, rejecting non-square or mismatched faces
pub fn load_cubemap_faces(dir: &Path) -> Result<CubemapFaces> {
    let mut faces = Vec::with_capacity(CUBEMAP_FACES.len());
    let mut size = None;

    for name in CUBEMAP_FACES {
        let path: PathBuf = dir.join(name);
        let face = load_rgba(&path)?;
        let (width, height) = face.dimensions();
        let expected = *size.get_or_insert(width);

        if width != height || width != expected {
            return Err(InitError::CubemapFace {
                path,
                width,
                height,
                expected,
            });
        }
        faces.push(face);
    }

    Ok(CubemapFaces {
        size: size.unwrap_or(0),
        faces,
    })
}

/// Upload an RGBA image as a sampled sRGB 2D texture
pub fn upload_texture_2d(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &RgbaImage,
) -> wgpu::Texture {
    let (width, height) = image.dimensions();
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    write_layer(queue, &texture, 0, image);
    texture
}

/// Upload six faces as a cube-compatible array texture
pub fn upload_cubemap(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    cubemap: &CubemapFaces,
) -> wgpu::Texture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Environment Cubemap"),
        size: wgpu::Extent3d {
            width: cubemap.size,
            height: cubemap.size,
            depth_or_array_layers: 6,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    for (layer, face) in cubemap.faces.iter().enumerate() {
        write_layer(queue, &texture, layer as u32, face);
    }
    texture
}

fn write_layer(queue: &wgpu::Queue, texture: &wgpu::Texture, layer: u32, image: &RgbaImage) {
    let (width, height) = image.dimensions();
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: layer,
            },
            aspect: wgpu::TextureAspect::All,
        },
        image.as_raw(),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn write_faces(dir: &Path, size: u32) {
        for name in CUBEMAP_FACES {
            RgbImage::from_pixel(size, size, image::Rgb([40, 90, 200]))
                .save(dir.join(name))
                .unwrap();
        }
    }

    #[test]
    fn test_load_rgba_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floor.png");
        RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let image = load_rgba(&path).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_missing_texture_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_rgba(&dir.path().join("floor.png")).unwrap_err();
        assert!(matches!(err, InitError::Texture { .. }));
        assert!(err.to_string().contains("floor.png"));
    }

    #[test]
    fn test_load_cubemap_faces() {
        let dir = tempfile::tempdir().unwrap();
        write_faces(dir.path(), 8);

        let cubemap = load_cubemap_faces(dir.path()).unwrap();
        assert_eq!(cubemap.size, 8);
        assert_eq!(cubemap.faces.len(), 6);
        assert!(cubemap.faces.iter().all(|f| f.dimensions() == (8, 8)));
    }

    #[test]
    fn test_mismatched_face_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_faces(dir.path(), 8);
        RgbImage::new(16, 16).save(dir.path().join("negz.jpg")).unwrap();

        match load_cubemap_faces(dir.path()) {
            Err(InitError::CubemapFace {
                width, expected, ..
            }) => {
                assert_eq!(width, 16);
                assert_eq!(expected, 8);
            }
            other => panic!("Expected face size error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_square_face_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_faces(dir.path(), 8);
        RgbImage::new(8, 4).save(dir.path().join("posy.jpg")).unwrap();
        assert!(matches!(
            load_cubemap_faces(dir.path()),
            Err(InitError::CubemapFace { height: 4, .. })
        ));
    }
}
