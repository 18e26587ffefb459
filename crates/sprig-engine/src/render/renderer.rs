use crate::coords::{orthographic_projection, ColorRgba, Mat4, PixelSize};
use crate::device::{GpuBackend, SpritePipelineDesc};
use crate::error::{RenderError, Result};
use crate::window::WindowHost;

use super::shader::ShaderSource;
use super::texture::DepthTextureInfo;
use super::vertex::SpriteVertex;
use super::{RenderCtx, RenderTarget};

const PROJECTION_BYTES: u64 = std::mem::size_of::<Mat4>() as u64;

/// Where pixel (0, 0) lands on screen.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ProjectionOrigin {
    /// +Y up, matching GL-style coordinates.
    #[default]
    BottomLeft,
    /// +Y down, matching image and window coordinates.
    TopLeft,
}

/// Renderer construction options.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub depth_format: wgpu::TextureFormat,
    /// Depth range is `-max_z_distance..max_z_distance`; sprites outside it
    /// are clipped.
    pub max_z_distance: f32,
    pub projection_origin: ProjectionOrigin,
    pub shader: ShaderSource,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            depth_format: wgpu::TextureFormat::Depth24Plus,
            max_z_distance: 1000.0,
            projection_origin: ProjectionOrigin::BottomLeft,
            shader: ShaderSource::Builtin,
        }
    }
}

impl RendererConfig {
    /// Projection for a drawable of `size` pixels.
    pub fn projection(&self, size: PixelSize) -> Mat4 {
        let w = size.width as f32;
        let h = size.height as f32;
        let z = self.max_z_distance;
        match self.projection_origin {
            ProjectionOrigin::BottomLeft => orthographic_projection(0.0, w, 0.0, h, -z, z),
            ProjectionOrigin::TopLeft => orthographic_projection(0.0, w, h, 0.0, -z, z),
        }
    }
}

/// Owns the GPU backend, window and sprite pipeline, and runs the frame
/// lifecycle.
///
/// Frame loop:
/// - `begin` acquires a swapchain texture and opens the sprite pass
/// - any number of `SpriteBatch::draw` calls record into it
/// - `end` submits and presents
///
/// The swapchain, depth texture and projection are rebuilt inside `begin`
/// whenever the window's pixel size changes.
pub struct Renderer<G: GpuBackend, W: WindowHost> {
    window: W,
    gpu: G,
    config: RendererConfig,

    /// Size the swapchain, depth texture and projection were built for.
    /// `ZERO` forces a rebuild on the next acquisition attempt.
    size: PixelSize,
    depth: DepthTextureInfo<G>,
    projection: G::Buffer,
    pipeline: G::Pipeline,

    frame: Option<G::Frame>,
}

impl<G: GpuBackend, W: WindowHost> Renderer<G, W> {
    /// Builds the pipeline, depth target and projection uniform.
    ///
    /// Blocks until the window has a drawable size.
    pub fn new(mut window: W, mut gpu: G, config: RendererConfig) -> Result<Self> {
        let size = wait_for_drawable(&mut window);

        let shader = config.shader.load()?;
        let pipeline = gpu.create_sprite_pipeline(&SpritePipelineDesc {
            label: "sprig sprite pipeline",
            shader: &shader,
            vertex_layout: SpriteVertex::layout(),
            depth_format: config.depth_format,
            uniform_size: PROJECTION_BYTES,
        });

        let projection = gpu.create_buffer(
            "sprig projection ubo",
            PROJECTION_BYTES,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        gpu.configure_surface(size);
        let depth = DepthTextureInfo::new(&gpu, config.depth_format, size);

        let mut renderer = Self {
            window,
            gpu,
            config,
            size,
            depth,
            projection,
            pipeline,
            frame: None,
        };
        renderer.resize();

        log::info!(
            "renderer ready: {}x{} ({:?})",
            size.width,
            size.height,
            renderer.gpu.surface_format()
        );
        Ok(renderer)
    }

    /// Opens a frame cleared to `clear` (alpha is forced to 1).
    ///
    /// Does nothing if a frame is already open. Fails only when the swapchain
    /// texture cannot be acquired even after rebuilding the swapchain.
    pub fn begin(&mut self, clear: ColorRgba) -> Result<()> {
        if self.frame.is_some() {
            log::trace!("begin called with a frame already open; ignored");
            return Ok(());
        }

        let clear = wgpu::Color {
            r: clear.r as f64,
            g: clear.g as f64,
            b: clear.b as f64,
            a: 1.0,
        };

        let mut attempt = 0;
        loop {
            attempt += 1;

            let size = wait_for_drawable(&mut self.window);
            if size != self.size {
                self.rebuild(size);
            }

            match self.gpu.begin_frame(clear, self.depth.attachment()) {
                Ok(frame) => {
                    self.frame = Some(frame);
                    return Ok(());
                }
                Err(err) if attempt < 2 => {
                    log::warn!("failed to acquire swapchain texture ({err}); rebuilding swapchain");
                    self.size = PixelSize::ZERO;
                }
                Err(err) => return Err(RenderError::SurfaceAcquire(err)),
            }
        }
    }

    /// Submits and presents the open frame. Does nothing if idle.
    pub fn end(&mut self) {
        match self.frame.take() {
            Some(frame) => self.gpu.end_frame(frame),
            None => log::trace!("end called without an open frame; ignored"),
        }
    }

    pub fn is_frame_open(&self) -> bool {
        self.frame.is_some()
    }

    /// Construction context for sprite batches.
    pub fn ctx(&self) -> RenderCtx<'_, G> {
        RenderCtx::new(
            &self.gpu,
            &self.projection,
            &self.pipeline,
            self.config.projection_origin,
        )
    }

    /// Draw target for the open frame, if any.
    pub fn target(&mut self) -> Option<RenderTarget<'_, G>> {
        let frame = self.frame.as_mut()?;
        Some(RenderTarget::new(&self.gpu, &self.pipeline, frame))
    }

    /// Pixel size the swapchain is currently configured for.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn depth_texture(&self) -> &DepthTextureInfo<G> {
        &self.depth
    }

    pub fn gpu(&self) -> &G {
        &self.gpu
    }

    pub fn gpu_mut(&mut self) -> &mut G {
        &mut self.gpu
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    fn rebuild(&mut self, size: PixelSize) {
        log::debug!(
            "rebuilding swapchain: {}x{} -> {}x{}",
            self.size.width,
            self.size.height,
            size.width,
            size.height
        );

        self.gpu.configure_surface(size);
        self.depth = DepthTextureInfo::new(&self.gpu, self.config.depth_format, size);
        self.size = size;
        self.resize();
    }

    /// Rewrites the projection uniform for the current size.
    fn resize(&mut self) {
        let projection = self.config.projection(self.size);
        self.gpu
            .write_buffer(&self.projection, 0, bytemuck::cast_slice(&projection));
    }
}

/// Blocks on window events until the window is visible with a non-zero size.
fn wait_for_drawable<W: WindowHost>(window: &mut W) -> PixelSize {
    loop {
        let size = window.pixel_size();
        if !size.is_empty() && !window.is_minimized() {
            return size;
        }
        window.wait_event();
    }
}
