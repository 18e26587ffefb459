//! GPU device + surface management.
//!
//! This module is responsible for:
//! - the `GpuBackend` capability the renderer is written against
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and recording the sprite render pass

mod backend;
mod gpu;
mod init;
mod surface;

pub use backend::{DepthAttachment, DepthStencilOps, GpuBackend, SpritePipelineDesc};
pub use gpu::{WgpuBackend, WgpuFrame, WgpuPipeline};
pub use init::GpuInit;
