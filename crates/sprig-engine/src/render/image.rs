use std::path::Path;

use crate::coords::PixelSize;
use crate::error::{RenderError, Result};

/// Decoded image: tightly packed RGBA8 rows, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub size: PixelSize,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Solid-color image, handy for placeholder textures.
    pub fn solid(size: PixelSize, rgba: [u8; 4]) -> Self {
        let count = size.width as usize * size.height as usize;
        Self {
            size,
            pixels: rgba.repeat(count),
        }
    }
}

/// Image-decoding capability.
pub trait ImageLoader {
    fn load_rgba8(&self, path: &Path) -> Result<DecodedImage>;
}

/// Loads images from disk through the `image` crate.
#[derive(Debug, Default, Copy, Clone)]
pub struct FileImageLoader;

impl ImageLoader for FileImageLoader {
    fn load_rgba8(&self, path: &Path) -> Result<DecodedImage> {
        let rgba = image::open(path)
            .map_err(|source| RenderError::ImageDecode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let (width, height) = rgba.dimensions();
        log::debug!("decoded {} ({width}x{height})", path.display());

        Ok(DecodedImage {
            size: PixelSize::new(width, height),
            pixels: rgba.into_raw(),
        })
    }
}
