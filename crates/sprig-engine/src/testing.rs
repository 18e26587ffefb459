//! In-memory stand-ins for the GPU, window and image decoder.
//!
//! `RecordingGpu` keeps every upload and pass command so tests can assert on
//! exactly what would have reached wgpu.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::Path;

use crate::coords::PixelSize;
use crate::device::{DepthAttachment, GpuBackend, SpritePipelineDesc};
use crate::error::{RenderError, Result};
use crate::render::{DecodedImage, ImageLoader, Renderer, RendererConfig, SpriteVertex, SPRITE_WGSL};
use crate::window::WindowHost;

#[derive(Debug)]
pub struct FakeBuffer {
    pub id: usize,
    pub size: u64,
    pub usage: wgpu::BufferUsages,
    pub contents: RefCell<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct FakeTexture {
    pub id: usize,
    pub size: PixelSize,
    pub format: wgpu::TextureFormat,
    pub usage: wgpu::TextureUsages,
}

#[derive(Debug)]
pub struct FakeView {
    /// Id of the texture this view was created from.
    pub texture: usize,
    pub aspect: wgpu::TextureAspect,
}

#[derive(Debug)]
pub struct FakeSampler {
    pub address_mode: wgpu::AddressMode,
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
    pub mipmap_filter: wgpu::MipmapFilterMode,
}

#[derive(Debug)]
pub struct FakeBindGroup {
    pub id: usize,
    pub uniform: usize,
    pub texture: usize,
}

#[derive(Debug)]
pub struct FakePipeline {
    pub depth_format: wgpu::TextureFormat,
    pub vertex_stride: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PassCommand {
    SetPipeline,
    SetVertexBuffer { slot: u32, buffer: usize, size: u64 },
    SetIndexBuffer { buffer: usize, size: u64 },
    SetBindGroup { index: u32, bind_group: usize },
    DrawIndexed { index_count: u32 },
}

#[derive(Debug)]
pub struct FakeFrame {
    pub clear: wgpu::Color,
    pub depth_texture: usize,
    pub depth_clear: f32,
    pub commands: Vec<PassCommand>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextureWrite {
    pub texture: usize,
    pub size: PixelSize,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BufferWrite {
    pub buffer: usize,
    pub offset: u64,
    pub len: usize,
}

/// `GpuBackend` that records instead of rendering.
#[derive(Debug, Default)]
pub struct RecordingGpu {
    next_id: Cell<usize>,
    failures_left: usize,
    surface_configs: Vec<PixelSize>,

    pub textures: RefCell<Vec<FakeTexture>>,
    pub texture_writes: RefCell<Vec<TextureWrite>>,
    pub buffer_writes: RefCell<Vec<BufferWrite>>,
    pub acquires: RefCell<usize>,
    pub submitted: RefCell<Vec<FakeFrame>>,
    pub presents: RefCell<usize>,
}

impl RecordingGpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` frame acquisitions fail with `SurfaceError::Lost`.
    pub fn fail_next_acquires(&mut self, count: usize) {
        self.failures_left = count;
    }

    pub fn surface_configs(&self) -> Vec<PixelSize> {
        self.surface_configs.clone()
    }

    /// Sizes of every depth texture created, oldest first.
    pub fn depth_textures(&self) -> Vec<PixelSize> {
        self.textures
            .borrow()
            .iter()
            .filter(|t| t.usage.contains(wgpu::TextureUsages::RENDER_ATTACHMENT))
            .map(|t| t.size)
            .collect()
    }

    /// `(offset, len)` of every write into buffer `id`.
    pub fn writes_to(&self, id: usize) -> Vec<(u64, usize)> {
        self.buffer_writes
            .borrow()
            .iter()
            .filter(|w| w.buffer == id)
            .map(|w| (w.offset, w.len))
            .collect()
    }

    pub fn create_test_pipeline(&self) -> FakePipeline {
        self.create_sprite_pipeline(&SpritePipelineDesc {
            label: "test sprite pipeline",
            shader: SPRITE_WGSL,
            vertex_layout: SpriteVertex::layout(),
            depth_format: wgpu::TextureFormat::Depth24Plus,
            uniform_size: 64,
        })
    }

    fn id(&self) -> usize {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl GpuBackend for RecordingGpu {
    type Buffer = FakeBuffer;
    type Texture = FakeTexture;
    type TextureView = FakeView;
    type Sampler = FakeSampler;
    type BindGroup = FakeBindGroup;
    type Pipeline = FakePipeline;
    type Frame = FakeFrame;

    fn surface_format(&self) -> wgpu::TextureFormat {
        wgpu::TextureFormat::Bgra8UnormSrgb
    }

    fn configure_surface(&mut self, size: PixelSize) {
        self.surface_configs.push(size);
    }

    fn create_buffer(&self, _label: &str, size: u64, usage: wgpu::BufferUsages) -> FakeBuffer {
        FakeBuffer {
            id: self.id(),
            size,
            usage,
            contents: RefCell::new(vec![0; size as usize]),
        }
    }

    fn write_buffer(&self, buffer: &FakeBuffer, offset: u64, data: &[u8]) {
        let start = offset as usize;
        buffer.contents.borrow_mut()[start..start + data.len()].copy_from_slice(data);
        self.buffer_writes.borrow_mut().push(BufferWrite {
            buffer: buffer.id,
            offset,
            len: data.len(),
        });
    }

    fn create_texture(
        &self,
        desc: &wgpu::TextureDescriptor<'_>,
        aspect: wgpu::TextureAspect,
    ) -> (FakeTexture, FakeView) {
        let texture = FakeTexture {
            id: self.id(),
            size: PixelSize::new(desc.size.width, desc.size.height),
            format: desc.format,
            usage: desc.usage,
        };
        self.textures.borrow_mut().push(texture.clone());
        let view = FakeView {
            texture: texture.id,
            aspect,
        };
        (texture, view)
    }

    fn write_texture_rgba8(&self, texture: &FakeTexture, size: PixelSize, pixels: &[u8]) {
        self.texture_writes.borrow_mut().push(TextureWrite {
            texture: texture.id,
            size,
            bytes: pixels.len(),
        });
    }

    fn create_sampler(&self, desc: &wgpu::SamplerDescriptor<'_>) -> FakeSampler {
        FakeSampler {
            address_mode: desc.address_mode_u,
            mag_filter: desc.mag_filter,
            min_filter: desc.min_filter,
            mipmap_filter: desc.mipmap_filter,
        }
    }

    fn create_sprite_pipeline(&self, desc: &SpritePipelineDesc<'_>) -> FakePipeline {
        FakePipeline {
            depth_format: desc.depth_format,
            vertex_stride: desc.vertex_layout.array_stride,
        }
    }

    fn create_sprite_bind_group(
        &self,
        _pipeline: &FakePipeline,
        uniform: &FakeBuffer,
        view: &FakeView,
        _sampler: &FakeSampler,
    ) -> FakeBindGroup {
        FakeBindGroup {
            id: self.id(),
            uniform: uniform.id,
            texture: view.texture,
        }
    }

    fn begin_frame(
        &mut self,
        clear: wgpu::Color,
        depth: DepthAttachment<'_, FakeView>,
    ) -> std::result::Result<FakeFrame, wgpu::SurfaceError> {
        *self.acquires.borrow_mut() += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(wgpu::SurfaceError::Lost);
        }

        Ok(FakeFrame {
            clear,
            depth_texture: depth.view.texture,
            depth_clear: depth.ops.depth_clear,
            commands: Vec::new(),
        })
    }

    fn set_pipeline(&self, frame: &mut FakeFrame, _pipeline: &FakePipeline) {
        frame.commands.push(PassCommand::SetPipeline);
    }

    fn set_vertex_buffer(&self, frame: &mut FakeFrame, slot: u32, buffer: &FakeBuffer, size: u64) {
        frame.commands.push(PassCommand::SetVertexBuffer {
            slot,
            buffer: buffer.id,
            size,
        });
    }

    fn set_index_buffer(&self, frame: &mut FakeFrame, buffer: &FakeBuffer, size: u64) {
        frame.commands.push(PassCommand::SetIndexBuffer {
            buffer: buffer.id,
            size,
        });
    }

    fn set_bind_group(&self, frame: &mut FakeFrame, index: u32, bind_group: &FakeBindGroup) {
        frame.commands.push(PassCommand::SetBindGroup {
            index,
            bind_group: bind_group.id,
        });
    }

    fn draw_indexed(&self, frame: &mut FakeFrame, index_count: u32) {
        frame.commands.push(PassCommand::DrawIndexed { index_count });
    }

    fn end_frame(&mut self, frame: FakeFrame) {
        self.submitted.borrow_mut().push(frame);
        *self.presents.borrow_mut() += 1;
    }
}

/// `WindowHost` whose state only changes when the test says so.
///
/// Each `wait_event` moves to the next queued `(size, minimized)` state.
#[derive(Debug)]
pub struct ScriptedWindow {
    size: PixelSize,
    minimized: bool,
    pending: VecDeque<(PixelSize, bool)>,
    pub waits: usize,
}

impl ScriptedWindow {
    pub fn new(size: PixelSize) -> Self {
        Self {
            size,
            minimized: false,
            pending: VecDeque::new(),
            waits: 0,
        }
    }

    pub fn then(mut self, size: PixelSize, minimized: bool) -> Self {
        self.push(size, minimized);
        self
    }

    pub fn push(&mut self, size: PixelSize, minimized: bool) {
        self.pending.push_back((size, minimized));
    }

    pub fn set_size(&mut self, size: PixelSize) {
        self.size = size;
    }

    pub fn set_minimized(&mut self, minimized: bool) {
        self.minimized = minimized;
    }
}

impl WindowHost for ScriptedWindow {
    fn pixel_size(&self) -> PixelSize {
        self.size
    }

    fn is_minimized(&self) -> bool {
        self.minimized
    }

    fn wait_event(&mut self) {
        self.waits += 1;
        let (size, minimized) = self
            .pending
            .pop_front()
            .expect("wait_event called with no scripted window state left");
        self.size = size;
        self.minimized = minimized;
    }
}

/// Serves a solid image for any path, or fails every load.
pub struct MemoryImageLoader {
    image: Option<DecodedImage>,
}

impl MemoryImageLoader {
    pub fn solid(size: PixelSize) -> Self {
        Self {
            image: Some(DecodedImage::solid(size, [255, 255, 255, 255])),
        }
    }

    pub fn failing() -> Self {
        Self { image: None }
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load_rgba8(&self, path: &Path) -> Result<DecodedImage> {
        self.image.clone().ok_or_else(|| RenderError::ImageDecode {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no image",
            )),
        })
    }
}

/// Renderer over fakes, with a visible window of `size`.
pub fn test_renderer(size: PixelSize) -> Renderer<RecordingGpu, ScriptedWindow> {
    test_renderer_with(size, RendererConfig::default())
}

pub fn test_renderer_with(
    size: PixelSize,
    config: RendererConfig,
) -> Renderer<RecordingGpu, ScriptedWindow> {
    Renderer::new(ScriptedWindow::new(size), RecordingGpu::new(), config).expect("renderer over fakes")
}
