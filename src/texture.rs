// ============================================================================
// texture.rs — Ping, Pong!
// Sprite image decoding (RGBA8) and upload to GPU textures.
// ============================================================================

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use wgpu::util::DeviceExt;

// ======================== Errors ========================

#[derive(Debug)]
pub enum TextureError {
    /// File missing or unreadable.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Bytes read but not a decodable image.
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Io { path, source } => {
                write!(f, "unable to read image {}: {}", path.display(), source)
            }
            TextureError::Decode { path, source } => {
                write!(f, "unable to decode image {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Io { source, .. } => Some(source),
            TextureError::Decode { source, .. } => Some(source),
        }
    }
}

// ======================== CPU Image ========================

/// Decoded sprite pixels, tightly packed RGBA8 rows.
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub fn decode_sprite(path: &Path) -> Result<SpriteImage, TextureError> {
    let bytes = fs::read(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes)
        .map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    let (width, height) = image.dimensions();
    Ok(SpriteImage {
        width,
        height,
        rgba: image.into_raw(),
    })
}

// ======================== GPU Texture ========================

pub struct SpriteTexture {
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl SpriteTexture {
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &SpriteImage,
    ) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: image.width,
                    height: image.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &image.rgba,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            view,
            width: image.width,
            height: image.height,
        }
    }

    /// Decode `path` and upload it. Any failure is returned to the caller.
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<Self, TextureError> {
        let image = decode_sprite(path)?;
        let label = path.to_string_lossy();
        let texture = Self::from_image(device, queue, &label, &image);
        log::info!(
            "Loaded texture {} ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );
        Ok(texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ping_pong_{}_{}", std::process::id(), name))
    }

    #[test]
    fn decodes_png_to_rgba() {
        let path = temp_path("sprite.png");
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 128]));
        img.save(&path).unwrap();

        let sprite = decode_sprite(&path).unwrap();
        assert_eq!((sprite.width, sprite.height), (3, 2));
        assert_eq!(sprite.rgba.len(), 3 * 2 * 4);
        assert_eq!(&sprite.rgba[0..4], &[255, 0, 0, 128]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn rgb_images_gain_opaque_alpha() {
        let path = temp_path("rgb.png");
        image::RgbImage::from_pixel(1, 1, image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let sprite = decode_sprite(&path).unwrap();
        assert_eq!(sprite.rgba, vec![10, 20, 30, 255]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn default_sprites_decode() {
        let config = crate::config::GameConfig::default();
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));

        let paddle = decode_sprite(&root.join(&config.paddle_texture)).unwrap();
        assert_eq!((paddle.width, paddle.height), (16, 64));

        let ball = decode_sprite(&root.join(&config.ball_texture)).unwrap();
        assert_eq!((ball.width, ball.height), (32, 32));
        // Corners are transparent so blending shows the round ball.
        assert_eq!(ball.rgba[3], 0);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = temp_path("does_not_exist.png");
        match decode_sprite(&path) {
            Err(TextureError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Io error, got {:?}", other.err()),
        }
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let path = temp_path("garbage.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let err = decode_sprite(&path).err().unwrap();
        assert!(matches!(err, TextureError::Decode { .. }));
        assert!(err.to_string().contains("unable to decode"));

        let _ = fs::remove_file(&path);
    }
}
