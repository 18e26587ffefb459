use anyhow::{Context, Result};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::coords::PixelSize;

use super::backend::{DepthAttachment, GpuBackend, SpritePipelineDesc};
use super::surface;
use super::GpuInit;

/// Owns wgpu core objects and the surface configuration.
///
/// This type is the low-level rendering context:
/// - creates and stores Instance/Device/Queue
/// - creates and configures the Surface (swapchain)
/// - acquires frames and records the sprite render pass
pub struct WgpuBackend {
    /// Kept alive for the lifetime of the surface.
    #[allow(dead_code)]
    instance: wgpu::Instance,

    surface: wgpu::Surface<'static>,

    device: wgpu::Device,

    queue: wgpu::Queue,

    /// Active surface configuration (format, usage, present mode, size).
    config: wgpu::SurfaceConfiguration,
}

/// Pipeline plus the bind group layout its sprite bind groups are built from.
pub struct WgpuPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

/// Represents a single acquired frame.
///
/// This object is short-lived and must be finalized promptly. Holding the surface
/// texture prevents acquisition of subsequent frames.
pub struct WgpuFrame {
    pass: wgpu::RenderPass<'static>,
    encoder: wgpu::CommandEncoder,
    view: wgpu::TextureView,
    surface_texture: wgpu::SurfaceTexture,
}

impl WgpuBackend {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; see
    /// [`WgpuBackend::new_blocking`] for the synchronous entry point.
    pub async fn new<W>(window: W, size: PixelSize, init: GpuInit) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        anyhow::ensure!(!size.is_empty(), "window has zero size");

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?}, {:?})", info.name, info.backend, info.device_type);
        log::debug!("adapter features: {:?}", adapter.features());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sprig device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        device.set_device_lost_callback(|reason, message| {
            log::error!("device lost ({reason:?}): {message}");
        });
        device.on_uncaptured_error(std::sync::Arc::new(log_uncaptured_error));

        let surface_caps = surface.get_capabilities(&adapter);
        surface::log_capabilities(&surface_caps);

        let format = surface::choose_surface_format(&surface_caps, prefer_srgb)
            .context("no supported surface formats")?;
        let alpha_mode = surface::choose_alpha_mode(&surface_caps, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        Ok(Self {
            instance,
            surface,
            device,
            queue,
            config,
        })
    }

    /// Creates the GPU context, blocking the calling thread until the adapter
    /// and device are ready.
    pub fn new_blocking<W>(window: W, size: PixelSize, init: GpuInit) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        pollster::block_on(Self::new(window, size, init))
    }
}

impl GpuBackend for WgpuBackend {
    type Buffer = wgpu::Buffer;
    type Texture = wgpu::Texture;
    type TextureView = wgpu::TextureView;
    type Sampler = wgpu::Sampler;
    type BindGroup = wgpu::BindGroup;
    type Pipeline = WgpuPipeline;
    type Frame = WgpuFrame;

    fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// wgpu does not support configuring a surface with a 0x0 size; such
    /// requests are ignored.
    fn configure_surface(&mut self, size: PixelSize) {
        if size.is_empty() {
            return;
        }

        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn create_buffer(&self, label: &str, size: u64, usage: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        })
    }

    fn write_buffer(&self, buffer: &wgpu::Buffer, offset: u64, data: &[u8]) {
        self.queue.write_buffer(buffer, offset, data);
    }

    fn create_texture(
        &self,
        desc: &wgpu::TextureDescriptor<'_>,
        aspect: wgpu::TextureAspect,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = self.device.create_texture(desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: desc.label,
            format: Some(desc.format),
            dimension: Some(wgpu::TextureViewDimension::D2),
            aspect,
            base_mip_level: 0,
            mip_level_count: Some(1),
            base_array_layer: 0,
            array_layer_count: Some(1),
            ..Default::default()
        });
        (texture, view)
    }

    fn write_texture_rgba8(&self, texture: &wgpu::Texture, size: PixelSize, pixels: &[u8]) {
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.width),
                rows_per_image: Some(size.height),
            },
            wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn create_sampler(&self, desc: &wgpu::SamplerDescriptor<'_>) -> wgpu::Sampler {
        self.device.create_sampler(desc)
    }

    fn create_sprite_pipeline(&self, desc: &SpritePipelineDesc<'_>) -> WgpuPipeline {
        let shader = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.shader.into()),
        });

        let bind_group_layout =
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("sprig sprite bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: std::num::NonZeroU64::new(desc.uniform_size),
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });

        let pipeline_layout =
            self.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("sprig sprite pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[desc.vertex_layout.clone()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: desc.depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState {
                    front: wgpu::StencilFaceState::IGNORE,
                    back: wgpu::StencilFaceState::IGNORE,
                    read_mask: 0,
                    write_mask: 0,
                },
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        WgpuPipeline {
            pipeline,
            bind_group_layout,
        }
    }

    fn create_sprite_bind_group(
        &self,
        pipeline: &WgpuPipeline,
        uniform: &wgpu::Buffer,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprig sprite bind group"),
            layout: &pipeline.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn begin_frame(
        &mut self,
        clear: wgpu::Color,
        depth: DepthAttachment<'_, wgpu::TextureView>,
    ) -> std::result::Result<WgpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sprig frame encoder"),
            });

        let ops = depth.ops;
        let pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprig sprite pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ops.depth_clear),
                        store: if ops.depth_store {
                            wgpu::StoreOp::Store
                        } else {
                            wgpu::StoreOp::Discard
                        },
                    }),
                    stencil_ops: (!ops.stencil_read_only).then_some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ops.stencil_clear),
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime();

        Ok(WgpuFrame {
            pass,
            encoder,
            view,
            surface_texture,
        })
    }

    fn set_pipeline(&self, frame: &mut WgpuFrame, pipeline: &WgpuPipeline) {
        frame.pass.set_pipeline(&pipeline.pipeline);
    }

    fn set_vertex_buffer(&self, frame: &mut WgpuFrame, slot: u32, buffer: &wgpu::Buffer, size: u64) {
        frame.pass.set_vertex_buffer(slot, buffer.slice(..size));
    }

    fn set_index_buffer(&self, frame: &mut WgpuFrame, buffer: &wgpu::Buffer, size: u64) {
        frame
            .pass
            .set_index_buffer(buffer.slice(..size), wgpu::IndexFormat::Uint32);
    }

    fn set_bind_group(&self, frame: &mut WgpuFrame, index: u32, bind_group: &wgpu::BindGroup) {
        frame.pass.set_bind_group(index, bind_group, &[]);
    }

    fn draw_indexed(&self, frame: &mut WgpuFrame, index_count: u32) {
        frame.pass.draw_indexed(0..index_count, 0, 0..1);
    }

    fn end_frame(&mut self, frame: WgpuFrame) {
        let WgpuFrame {
            pass,
            encoder,
            view,
            surface_texture,
        } = frame;

        // The encoder stays locked until the pass is gone.
        drop(pass);
        drop(view);

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }
}

/// Reports an uncaptured wgpu error and keeps running.
///
/// Installed in place of wgpu's default handler, which panics.
fn log_uncaptured_error(error: wgpu::Error) {
    match &error {
        wgpu::Error::OutOfMemory { .. } => log::error!("wgpu out of memory: {error}"),
        _ => log::error!("uncaptured wgpu error: {error}"),
    }
}
