use crate::coords::PixelSize;

/// Depth/stencil load-store behavior for the frame's depth attachment.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DepthStencilOps {
    /// Value the depth aspect is cleared to at the start of the pass.
    pub depth_clear: f32,
    /// Whether depth results are stored at the end of the pass.
    pub depth_store: bool,
    /// Value the stencil aspect would be cleared to when writable.
    pub stencil_clear: u32,
    /// Stencil is never tested by the sprite pipeline; keep it read-only.
    pub stencil_read_only: bool,
}

impl Default for DepthStencilOps {
    fn default() -> Self {
        Self {
            depth_clear: 1.0,
            depth_store: true,
            stencil_clear: 0,
            stencil_read_only: true,
        }
    }
}

/// Ready-to-use depth attachment: a view plus its load/store ops.
pub struct DepthAttachment<'a, V> {
    pub view: &'a V,
    pub ops: DepthStencilOps,
}

/// Everything needed to build the sprite render pipeline.
///
/// The bind group layout is fixed:
/// - binding 0: projection uniform (vertex stage)
/// - binding 1: 2D float texture (fragment stage)
/// - binding 2: filtering sampler (fragment stage)
pub struct SpritePipelineDesc<'a> {
    pub label: &'a str,
    /// WGSL source with `vs_main` and `fs_main` entry points.
    pub shader: &'a str,
    pub vertex_layout: wgpu::VertexBufferLayout<'a>,
    pub depth_format: wgpu::TextureFormat,
    /// Size in bytes of the projection uniform bound at binding 0.
    pub uniform_size: u64,
}

/// GPU-access capability used by the renderer and sprite batches.
///
/// The trait mirrors the handful of device, queue, surface and render-pass
/// calls the sprite path needs. `WgpuBackend` is the production
/// implementation; tests substitute a recording fake.
///
/// Frame lifecycle:
/// - `begin_frame` acquires the swapchain texture and opens a render pass
/// - pass commands record into the returned frame
/// - `end_frame` ends the pass, submits and presents
pub trait GpuBackend {
    type Buffer;
    type Texture;
    type TextureView;
    type Sampler;
    type BindGroup;
    type Pipeline;
    type Frame;

    /// Color format of the swapchain.
    fn surface_format(&self) -> wgpu::TextureFormat;

    /// (Re)builds the swapchain at the given size. Size must be non-empty.
    fn configure_surface(&mut self, size: PixelSize);

    fn create_buffer(&self, label: &str, size: u64, usage: wgpu::BufferUsages) -> Self::Buffer;

    /// Queues a write of `data` into `buffer` starting at `offset`.
    fn write_buffer(&self, buffer: &Self::Buffer, offset: u64, data: &[u8]);

    /// Creates a texture and a view over `aspect` of it.
    fn create_texture(
        &self,
        desc: &wgpu::TextureDescriptor<'_>,
        aspect: wgpu::TextureAspect,
    ) -> (Self::Texture, Self::TextureView);

    /// Uploads tightly packed RGBA8 rows covering the whole of mip 0.
    fn write_texture_rgba8(&self, texture: &Self::Texture, size: PixelSize, pixels: &[u8]);

    fn create_sampler(&self, desc: &wgpu::SamplerDescriptor<'_>) -> Self::Sampler;

    fn create_sprite_pipeline(&self, desc: &SpritePipelineDesc<'_>) -> Self::Pipeline;

    fn create_sprite_bind_group(
        &self,
        pipeline: &Self::Pipeline,
        uniform: &Self::Buffer,
        view: &Self::TextureView,
        sampler: &Self::Sampler,
    ) -> Self::BindGroup;

    /// Acquires the next swapchain texture and opens a render pass with one
    /// color attachment cleared to `clear` and the given depth attachment.
    fn begin_frame(
        &mut self,
        clear: wgpu::Color,
        depth: DepthAttachment<'_, Self::TextureView>,
    ) -> Result<Self::Frame, wgpu::SurfaceError>;

    fn set_pipeline(&self, frame: &mut Self::Frame, pipeline: &Self::Pipeline);

    /// Binds the first `size` bytes of `buffer` to vertex slot `slot`.
    fn set_vertex_buffer(&self, frame: &mut Self::Frame, slot: u32, buffer: &Self::Buffer, size: u64);

    /// Binds the first `size` bytes of `buffer` as a `Uint32` index buffer.
    fn set_index_buffer(&self, frame: &mut Self::Frame, buffer: &Self::Buffer, size: u64);

    fn set_bind_group(&self, frame: &mut Self::Frame, index: u32, bind_group: &Self::BindGroup);

    /// Draws `index_count` indices starting at 0, one instance.
    fn draw_indexed(&self, frame: &mut Self::Frame, index_count: u32);

    /// Ends the pass, submits the command buffer and presents.
    fn end_frame(&mut self, frame: Self::Frame);
}
