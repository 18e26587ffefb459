use crate::device::GpuBackend;

use super::ProjectionOrigin;

/// Resources a sprite batch needs at construction time.
///
/// Borrowed from the `Renderer`; the projection uniform stays owned by it.
pub struct RenderCtx<'a, G: GpuBackend> {
    pub gpu: &'a G,
    /// Projection uniform shared by every batch (binding 0).
    pub projection: &'a G::Buffer,
    pub pipeline: &'a G::Pipeline,
    /// Decides which quad edge gets image row 0.
    pub origin: ProjectionOrigin,
}

impl<'a, G: GpuBackend> RenderCtx<'a, G> {
    #[inline]
    pub fn new(
        gpu: &'a G,
        projection: &'a G::Buffer,
        pipeline: &'a G::Pipeline,
        origin: ProjectionOrigin,
    ) -> Self {
        Self {
            gpu,
            projection,
            pipeline,
            origin,
        }
    }
}

/// Target for drawing: the open frame plus the pipeline to bind.
///
/// Only exists between `Renderer::begin` and `Renderer::end`.
pub struct RenderTarget<'a, G: GpuBackend> {
    pub gpu: &'a G,
    pub pipeline: &'a G::Pipeline,
    pub frame: &'a mut G::Frame,
}

impl<'a, G: GpuBackend> RenderTarget<'a, G> {
    #[inline]
    pub fn new(gpu: &'a G, pipeline: &'a G::Pipeline, frame: &'a mut G::Frame) -> Self {
        Self {
            gpu,
            pipeline,
            frame,
        }
    }
}
