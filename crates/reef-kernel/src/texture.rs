//! Texture loading for sprites.
//!
//! Decodes image files into RGBA8 pixels and uploads them as sampled
//! textures with their own bind group.

use std::path::Path;

use image::imageops::FilterType;
use reef_common::AssetError;
use tracing::debug;

/// Decoded RGBA8 image ready for upload.
#[derive(Debug, Clone)]
pub struct TextureImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Tightly packed RGBA8 rows
    pub pixels: Vec<u8>,
}

/// Load an image file and extract RGBA pixels.
///
/// Images larger than `max_dimension` on either side are scaled down to fit,
/// keeping their aspect ratio.
pub fn load_texture_rgba<P: AsRef<Path>>(
    path: P,
    max_dimension: u32,
) -> Result<TextureImage, AssetError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }

    let file_data = std::fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    decode_texture_rgba(&file_data, path, max_dimension)
}

/// Decode in-memory image bytes; `path` is only used for error messages.
pub fn decode_texture_rgba(
    bytes: &[u8],
    path: &Path,
    max_dimension: u32,
) -> Result<TextureImage, AssetError> {
    let mut img = image::load_from_memory(bytes).map_err(|e| AssetError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if img.width() == 0 || img.height() == 0 {
        return Err(AssetError::Empty {
            path: path.to_path_buf(),
            width: img.width(),
            height: img.height(),
        });
    }

    let max_dimension = max_dimension.max(1);
    if img.width() > max_dimension || img.height() > max_dimension {
        debug!(
            "Scaling {} from {}x{} to fit {max_dimension}",
            path.display(),
            img.width(),
            img.height()
        );
        img = img.resize(max_dimension, max_dimension, FilterType::Triangle);
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(TextureImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// A sprite texture resident on the GPU.
pub struct SpriteTexture {
    /// GPU texture, kept alive for the view
    _texture: wgpu::Texture,
    /// Texture view bound for sampling
    _view: wgpu::TextureView,
    /// Bind group (texture + sampler) for the sprite pipeline
    bind_group: wgpu::BindGroup,
}

impl SpriteTexture {
    /// Uploads a decoded image and builds its bind group.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        image: &TextureImage,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
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

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        debug!("Uploaded texture {label} ({}x{})", image.width, image.height);

        Self {
            _texture: texture,
            _view: view,
            bind_group,
        }
    }

    /// Returns the bind group for drawing with this texture.
    #[must_use]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
