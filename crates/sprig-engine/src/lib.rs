//! Sprig engine crate.
//!
//! Sprite batching over wgpu: a `Renderer` that owns the swapchain and frame
//! lifecycle, and `SpriteBatch`es that draw textured, depth-tested quads in
//! one call each.

pub mod coords;
pub mod device;
pub mod error;
pub mod logging;
pub mod render;
pub mod window;

#[cfg(test)]
mod testing;

pub use coords::{orthographic_projection, ColorRgba, Mat4, PixelSize};
pub use device::{GpuBackend, GpuInit, WgpuBackend};
pub use error::{RenderError, Result};
pub use render::{
    FileImageLoader, ProjectionOrigin, Renderer, RendererConfig, ShaderSource, Sprite,
    SpriteBatch, SpriteBatchOptions, TextureFilterMode, TextureWrapMode,
};
pub use window::{WindowConfig, WindowHost, WinitWindow};
