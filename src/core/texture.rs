//! Texture abstractions
//!
//! 2D colour textures (render targets, image-backed maps with a CPU-built
//! mip chain) and the depth texture shared by the scene and outline passes.

use std::path::{Path, PathBuf};

use image::{imageops, RgbaImage};

use crate::context::WgpuContext;

/// Errors raised while loading an image asset from disk.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read asset `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image `{path}`")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Sampler configuration for a [`Texture2D`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub address_mode: wgpu::AddressMode,
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
    pub mipmap_filter: wgpu::MipmapFilterMode,
    /// Build and upload a full mip chain for image-backed textures.
    pub mipmaps: bool,
}

impl Sampling {
    /// Bilinear, clamped, single level. Used for render targets.
    pub fn clamped_linear() -> Self {
        Self {
            address_mode: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            mipmaps: false,
        }
    }

    /// Repeating, trilinear minification, configurable magnification.
    pub fn repeat(mag_filter: wgpu::FilterMode) -> Self {
        Self {
            address_mode: wgpu::AddressMode::Repeat,
            mag_filter,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            mipmaps: true,
        }
    }
}

impl Default for Sampling {
    fn default() -> Self {
        Self::clamped_linear()
    }
}

/// Number of mip levels down to 1x1 for a `width` x `height` image.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Box-filtered mip chain, level 0 first.
pub fn mip_chain(image: &RgbaImage) -> Vec<RgbaImage> {
    let levels = mip_level_count(image.width(), image.height());
    let mut chain = Vec::with_capacity(levels as usize);
    chain.push(image.clone());
    for level in 1..levels {
        let width = (image.width() >> level).max(1);
        let height = (image.height() >> level).max(1);
        let Some(previous) = chain.last() else { break };
        let next = imageops::resize(previous, width, height, imageops::FilterType::Triangle);
        chain.push(next);
    }
    chain
}

/// Read and decode an image file into RGBA8.
pub fn decode_rgba(path: &Path) -> Result<RgbaImage, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

/// A 2D texture with associated view and sampler.
pub struct Texture2D {
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub(crate) size: wgpu::Extent3d,
    pub(crate) format: wgpu::TextureFormat,
}

impl Texture2D {
    /// Create a new empty single-level texture.
    pub fn new(
        ctx: &WgpuContext,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
        label: Option<&str>,
    ) -> Self {
        Self::with_levels(ctx, width, height, 1, format, usage, Sampling::default(), label)
    }

    /// Create a colour texture usable both as render attachment and as a
    /// sampled input of the next pass.
    pub fn render_target(
        ctx: &WgpuContext,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        label: Option<&str>,
    ) -> Self {
        Self::new(
            ctx,
            width.max(1),
            height.max(1),
            format,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::RENDER_ATTACHMENT,
            label,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn with_levels(
        ctx: &WgpuContext,
        width: u32,
        height: u32,
        mip_level_count: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
        sampling: Sampling,
        label: Option<&str>,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: label.map(|l| format!("{} sampler", l)).as_deref(),
            address_mode_u: sampling.address_mode,
            address_mode_v: sampling.address_mode,
            address_mode_w: sampling.address_mode,
            mag_filter: sampling.mag_filter,
            min_filter: sampling.min_filter,
            mipmap_filter: sampling.mipmap_filter,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            size,
            format,
        }
    }

    /// Upload an sRGB image, with a mip chain when `sampling.mipmaps` is set.
    pub fn from_image(
        ctx: &WgpuContext,
        image: &RgbaImage,
        sampling: Sampling,
        label: Option<&str>,
    ) -> Self {
        let levels = if sampling.mipmaps {
            mip_chain(image)
        } else {
            vec![image.clone()]
        };

        let texture = Self::with_levels(
            ctx,
            image.width(),
            image.height(),
            levels.len() as u32,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            sampling,
            label,
        );

        for (level, data) in levels.iter().enumerate() {
            ctx.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture.texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                data.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * data.width()),
                    rows_per_image: Some(data.height()),
                },
                wgpu::Extent3d {
                    width: data.width(),
                    height: data.height(),
                    depth_or_array_layers: 1,
                },
            );
        }

        texture
    }

    /// Load and upload an image file.
    pub fn load(
        ctx: &WgpuContext,
        path: &Path,
        sampling: Sampling,
        label: Option<&str>,
    ) -> Result<Self, AssetError> {
        let image = decode_rgba(path)?;
        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "decoded texture"
        );
        Ok(Self::from_image(ctx, &image, sampling, label))
    }

    /// A 1x1 texture of a single colour.
    pub fn solid(ctx: &WgpuContext, rgba: [u8; 4], label: Option<&str>) -> Self {
        let image = RgbaImage::from_pixel(1, 1, image::Rgba(rgba));
        Self::from_image(ctx, &image, Sampling::clamped_linear(), label)
    }

    /// Get the texture view.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Get the sampler.
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Get the texture size.
    pub fn size(&self) -> (u32, u32) {
        (self.size.width, self.size.height)
    }

    /// Get the texture format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

/// A depth texture for depth testing.
pub struct DepthTexture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) size: wgpu::Extent3d,
}

impl DepthTexture {
    /// The depth format used by this texture.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a new depth texture.
    pub fn new(ctx: &WgpuContext, width: u32, height: u32, label: Option<&str>) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            size,
        }
    }

    /// Resize the depth texture.
    pub fn resize(&mut self, ctx: &WgpuContext, width: u32, height: u32) {
        if self.size.width != width || self.size.height != height {
            *self = Self::new(ctx, width, height, Some("scene depth texture"));
        }
    }

    /// Get the texture view.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Get the texture size.
    pub fn size(&self) -> (u32, u32) {
        (self.size.width, self.size.height)
    }
}
