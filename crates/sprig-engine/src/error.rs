use std::path::PathBuf;

/// Failures the renderer treats as fatal.
///
/// Misuse (drawing while idle, overfilling a batch, nested `begin`) is not an
/// error; those calls are ignored.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to load image at {}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read shader source at {}", path.display())]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot acquire next swapchain texture after rebuilding the swapchain")]
    SurfaceAcquire(#[source] wgpu::SurfaceError),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
