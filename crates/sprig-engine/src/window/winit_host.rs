use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::coords::PixelSize;

use super::{WindowConfig, WindowHost};

/// A single winit window driven by pumping the event loop from the caller's
/// own frame loop.
///
/// The renderer needs to block inside `begin` while the window is minimized;
/// owning the `EventLoop` and pumping it on demand makes that possible without
/// handing control to `EventLoop::run_app`.
pub struct WinitWindow {
    event_loop: EventLoop<()>,
    state: HostState,
    window: Arc<Window>,
}

impl WinitWindow {
    /// Creates the event loop and opens the window.
    pub fn open(config: WindowConfig) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = HostState::new(config);

        // Windows can only be created once the loop has resumed.
        let window = loop {
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut state);

            if let Some(err) = state.create_error.take() {
                return Err(err);
            }
            if let Some(window) = state.window.clone() {
                break window;
            }
            if let PumpStatus::Exit(code) = status {
                anyhow::bail!("event loop exited with code {code} before the window opened");
            }
        };

        log::debug!("window opened: {:?}", window.inner_size());

        Ok(Self {
            event_loop,
            state,
            window,
        })
    }

    /// Shared handle to the window, suitable as a wgpu surface target.
    pub fn handle(&self) -> Arc<Window> {
        Arc::clone(&self.window)
    }

    /// Dispatches pending events without blocking.
    ///
    /// Returns `false` once the user asked to close the window.
    pub fn poll_events(&mut self) -> bool {
        self.pump(Some(Duration::ZERO));
        !self.state.close_requested
    }

    fn pump(&mut self, timeout: Option<Duration>) {
        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(timeout, &mut self.state) {
            log::debug!("event loop exited with code {code}");
            self.state.close_requested = true;
        }
    }
}

impl WindowHost for WinitWindow {
    fn pixel_size(&self) -> PixelSize {
        self.window.inner_size().into()
    }

    fn is_minimized(&self) -> bool {
        self.window.is_minimized().unwrap_or(false)
    }

    fn wait_event(&mut self) {
        self.pump(None);
    }
}

struct HostState {
    config: WindowConfig,
    window: Option<Arc<Window>>,
    create_error: Option<anyhow::Error>,
    close_requested: bool,
}

impl HostState {
    fn new(config: WindowConfig) -> Self {
        Self {
            config,
            window: None,
            create_error: None,
            close_requested: false,
        }
    }
}

impl ApplicationHandler for HostState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        match event_loop.create_window(attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => self.create_error = Some(anyhow::Error::new(e).context("failed to create window")),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(size) => log::trace!("window resized to {}x{}", size.width, size.height),
            _ => {}
        }
    }
}
