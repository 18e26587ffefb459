use std::path::PathBuf;

use anyhow::{Context, Result};
use sprig_engine::logging::{init_logging, LoggingConfig};
use sprig_engine::{
    ColorRgba, FileImageLoader, GpuInit, PixelSize, Renderer, RendererConfig, Sprite, SpriteBatch,
    SpriteBatchOptions, TextureFilterMode, TextureWrapMode, WgpuBackend, WindowConfig, WindowHost,
    WinitWindow,
};

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(err) = run() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Texture path may be overridden on the command line.
    let texture_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/test.png")));

    let window = WinitWindow::open(WindowConfig {
        title: "sprig demo".to_string(),
        ..Default::default()
    })?;

    let size: PixelSize = window.pixel_size();
    let gpu = WgpuBackend::new_blocking(window.handle(), size, GpuInit::default())?;
    let mut renderer = Renderer::new(window, gpu, RendererConfig::default())
        .context("failed to create renderer")?;

    let mut batch = SpriteBatch::new(
        &renderer.ctx(),
        10,
        &texture_path,
        &FileImageLoader,
        SpriteBatchOptions {
            wrap: TextureWrapMode::Repeat,
            filter: TextureFilterMode::Nearest,
        },
    )?;

    batch.add(&Sprite::new(8.0, 8.0, -1.0, 160.0, 160.0).with_source(8.0, 0.0, 16.0, 16.0));
    batch.add(&Sprite::new(0.0, 0.0, 0.0, 64.0, 64.0).with_source(8.0, 8.0, 8.0, 8.0));

    let background = ColorRgba::rgb(0.4, 0.6, 0.9);
    loop {
        renderer.begin(background)?;
        batch.draw(&mut renderer);
        renderer.end();

        if !renderer.window_mut().poll_events() {
            break;
        }
    }

    log::info!("window closed");
    Ok(())
}
