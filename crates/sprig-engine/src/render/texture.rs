use std::path::Path;

use crate::coords::PixelSize;
use crate::device::{DepthAttachment, DepthStencilOps, GpuBackend};
use crate::error::Result;

use super::image::{DecodedImage, ImageLoader};

/// Sampler address mode applied on u, v and w.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum TextureWrapMode {
    #[default]
    Repeat,
    /// Clamp to edge.
    Clamp,
}

impl TextureWrapMode {
    fn address_mode(self) -> wgpu::AddressMode {
        match self {
            TextureWrapMode::Repeat => wgpu::AddressMode::Repeat,
            TextureWrapMode::Clamp => wgpu::AddressMode::ClampToEdge,
        }
    }
}

/// Magnification and minification filter.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum TextureFilterMode {
    #[default]
    Linear,
    Nearest,
}

impl TextureFilterMode {
    fn filter_mode(self) -> wgpu::FilterMode {
        match self {
            TextureFilterMode::Linear => wgpu::FilterMode::Linear,
            TextureFilterMode::Nearest => wgpu::FilterMode::Nearest,
        }
    }
}

/// Sampled color texture: texture, view, sampler and pixel size.
pub struct TextureInfo<G: GpuBackend> {
    pub texture: G::Texture,
    pub view: G::TextureView,
    pub sampler: G::Sampler,
    pub size: PixelSize,
}

impl<G: GpuBackend> TextureInfo<G> {
    /// Decodes the image at `path` and uploads it.
    pub fn load(
        gpu: &G,
        loader: &dyn ImageLoader,
        path: &Path,
        wrap: TextureWrapMode,
        filter: TextureFilterMode,
    ) -> Result<Self> {
        let image = loader.load_rgba8(path)?;
        Ok(Self::from_image(gpu, &image, wrap, filter))
    }

    /// Uploads an already decoded image as an `Rgba8Unorm` texture.
    pub fn from_image(
        gpu: &G,
        image: &DecodedImage,
        wrap: TextureWrapMode,
        filter: TextureFilterMode,
    ) -> Self {
        let size = image.size;
        let (texture, view) = gpu.create_texture(
            &wgpu::TextureDescriptor {
                label: Some("sprig sprite texture"),
                size: wgpu::Extent3d {
                    width: size.width,
                    height: size.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::TextureAspect::All,
        );

        // All rows in one write.
        gpu.write_texture_rgba8(&texture, size, &image.pixels);

        let address_mode = wrap.address_mode();
        let filter_mode = filter.filter_mode();
        let sampler = gpu.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprig sprite sampler"),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: filter_mode,
            min_filter: filter_mode,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            lod_min_clamp: 0.0,
            lod_max_clamp: 1.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            size,
        }
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }
}

/// Depth render target sized to the swapchain.
///
/// Rebuilt wholesale whenever the surface size changes.
pub struct DepthTextureInfo<G: GpuBackend> {
    pub texture: G::Texture,
    pub view: G::TextureView,
    pub format: wgpu::TextureFormat,
    pub size: PixelSize,
    pub ops: DepthStencilOps,
}

impl<G: GpuBackend> DepthTextureInfo<G> {
    /// Allocates a single-sample, single-mip depth texture.
    pub fn new(gpu: &G, format: wgpu::TextureFormat, size: PixelSize) -> Self {
        let (texture, view) = gpu.create_texture(
            &wgpu::TextureDescriptor {
                label: Some("sprig depth texture"),
                size: wgpu::Extent3d {
                    width: size.width,
                    height: size.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[format],
            },
            wgpu::TextureAspect::DepthOnly,
        );

        Self {
            texture,
            view,
            format,
            size,
            ops: DepthStencilOps::default(),
        }
    }

    /// Attachment for the frame's render pass: clear depth to 1.0 and store,
    /// stencil read-only.
    pub fn attachment(&self) -> DepthAttachment<'_, G::TextureView> {
        DepthAttachment {
            view: &self.view,
            ops: self.ops,
        }
    }
}
