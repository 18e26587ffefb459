use crate::coords::PixelSize;

/// Windowing capability the renderer needs once the surface exists.
pub trait WindowHost {
    /// Current drawable size in physical pixels.
    fn pixel_size(&self) -> PixelSize;

    /// Whether the window is currently minimized.
    fn is_minimized(&self) -> bool;

    /// Blocks until at least one window event has been delivered.
    fn wait_event(&mut self);
}
