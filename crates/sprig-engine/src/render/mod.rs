//! Sprite rendering.
//!
//! `Renderer` owns the swapchain, depth target, projection uniform and the
//! single sprite pipeline. `SpriteBatch` packs quads on the CPU and records
//! one indexed draw per batch into the renderer's open frame.
//!
//! Convention:
//! - sprite geometry is in physical pixels, origin per `ProjectionOrigin`
//! - larger z is nearer (depth test `Less`, depth cleared to 1.0)

mod ctx;
mod image;
mod renderer;
mod shader;
mod sprite;
mod texture;
mod vertex;

pub use ctx::{RenderCtx, RenderTarget};
pub use self::image::{DecodedImage, FileImageLoader, ImageLoader};
pub use renderer::{ProjectionOrigin, Renderer, RendererConfig};
pub use shader::{ShaderSource, SPRITE_WGSL};
pub use sprite::{Sprite, SpriteBatch, SpriteBatchOptions};
pub use texture::{DepthTextureInfo, TextureFilterMode, TextureInfo, TextureWrapMode};
pub use vertex::{SpriteVertex, INDICES_PER_SPRITE, QUAD_INDICES, UNIT_QUAD, VERTICES_PER_SPRITE};
