//! Window host.
//!
//! `WindowHost` is the windowing capability the renderer depends on;
//! `WinitWindow` implements it on top of a pumped winit event loop.

mod config;
mod host;
mod winit_host;

pub use config::WindowConfig;
pub use host::WindowHost;
pub use winit_host::WinitWindow;
