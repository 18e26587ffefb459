//! Coordinate, color and projection types shared by the renderer.
//!
//! Canonical CPU space:
//! - Physical pixels
//! - Origin bottom-left by default (see `ProjectionOrigin`)
//! - z only orders sprites through the depth test

mod color;
mod projection;
mod size;

pub use color::ColorRgba;
pub use projection::{orthographic_projection, transform_point, Mat4, MAT4_COMPONENTS};
pub use size::PixelSize;
