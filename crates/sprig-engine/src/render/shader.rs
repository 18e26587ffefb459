use std::borrow::Cow;
use std::path::PathBuf;

use crate::error::{RenderError, Result};

/// Built-in sprite shader.
pub const SPRITE_WGSL: &str = include_str!("shaders/sprite.wgsl");

/// Where the sprite pipeline's WGSL comes from.
///
/// Any replacement must expose `vs_main` and `fs_main` and match the
/// `SpriteVertex` layout and the three sprite bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ShaderSource {
    #[default]
    Builtin,
    Wgsl(String),
    File(PathBuf),
}

impl ShaderSource {
    /// Resolves the WGSL text, reading from disk for `File`.
    pub fn load(&self) -> Result<Cow<'_, str>> {
        match self {
            ShaderSource::Builtin => Ok(Cow::Borrowed(SPRITE_WGSL)),
            ShaderSource::Wgsl(src) => Ok(Cow::Borrowed(src.as_str())),
            ShaderSource::File(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|source| RenderError::ShaderRead {
                    path: path.clone(),
                    source,
                }),
        }
    }
}
