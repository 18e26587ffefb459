use std::path::Path;

use bytemuck::Zeroable;

use crate::coords::ColorRgba;
use crate::device::GpuBackend;
use crate::error::Result;
use crate::window::WindowHost;

use super::image::ImageLoader;
use super::texture::{TextureFilterMode, TextureInfo, TextureWrapMode};
use super::vertex::{SpriteVertex, INDICES_PER_SPRITE, QUAD_INDICES, UNIT_QUAD, VERTICES_PER_SPRITE};
use super::{ProjectionOrigin, RenderCtx, RenderTarget, Renderer};

/// One sprite to append to a batch.
///
/// Position and size are in pixels in projection space. The source rectangle
/// (`tex_*`) is in texel units of the batch texture.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub width: f32,
    pub height: f32,
    pub tex_x: f32,
    pub tex_y: f32,
    pub tex_width: f32,
    pub tex_height: f32,
    /// Tint multiplied into the texel, weighted by `blend`.
    pub color: ColorRgba,
    /// 0 draws the raw texel, 1 the fully tinted one.
    pub blend: f32,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            width: 0.0,
            height: 0.0,
            tex_x: 0.0,
            tex_y: 0.0,
            tex_width: 0.0,
            tex_height: 0.0,
            color: ColorRgba::white(),
            blend: 0.0,
        }
    }
}

impl Sprite {
    /// Sprite covering `width` x `height` pixels at `(x, y, z)` that samples
    /// the same-sized region at the texture origin.
    pub fn new(x: f32, y: f32, z: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            z,
            width,
            height,
            tex_width: width,
            tex_height: height,
            ..Default::default()
        }
    }

    /// Selects the texel rectangle to sample.
    pub fn with_source(mut self, tex_x: f32, tex_y: f32, tex_width: f32, tex_height: f32) -> Self {
        self.tex_x = tex_x;
        self.tex_y = tex_y;
        self.tex_width = tex_width;
        self.tex_height = tex_height;
        self
    }

    pub fn with_tint(mut self, color: ColorRgba, blend: f32) -> Self {
        self.color = color;
        self.blend = blend;
        self
    }
}

/// Texture sampling options for a batch.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SpriteBatchOptions {
    pub wrap: TextureWrapMode,
    pub filter: TextureFilterMode,
}

/// Fixed-capacity batch of sprites sharing one texture.
///
/// Sprites are packed into CPU arrays by `add` and uploaded by `draw`, which
/// issues a single indexed draw for the whole batch. GPU buffers are sized
/// for full capacity up front and never reallocated.
pub struct SpriteBatch<G: GpuBackend> {
    texture: TextureInfo<G>,
    bind_group: G::BindGroup,

    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    vertex_buffer: G::Buffer,
    index_buffer: G::Buffer,

    max_sprites: usize,
    sprite_count: usize,

    inv_tex_width: f32,
    inv_tex_height: f32,
    origin: ProjectionOrigin,
}

impl<G: GpuBackend> SpriteBatch<G> {
    /// Loads `texture_path` and allocates room for `max_sprites` sprites.
    pub fn new(
        ctx: &RenderCtx<'_, G>,
        max_sprites: usize,
        texture_path: impl AsRef<Path>,
        loader: &dyn ImageLoader,
        options: SpriteBatchOptions,
    ) -> Result<Self> {
        let texture = TextureInfo::load(
            ctx.gpu,
            loader,
            texture_path.as_ref(),
            options.wrap,
            options.filter,
        )?;
        Ok(Self::with_texture(ctx, max_sprites, texture))
    }

    /// Builds a batch around an already uploaded texture.
    pub fn with_texture(ctx: &RenderCtx<'_, G>, max_sprites: usize, texture: TextureInfo<G>) -> Self {
        let vertex_count = max_sprites * VERTICES_PER_SPRITE;
        let index_count = max_sprites * INDICES_PER_SPRITE;

        let vertex_buffer = ctx.gpu.create_buffer(
            "sprig sprite vbo",
            (vertex_count * std::mem::size_of::<SpriteVertex>()) as u64,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        );
        let index_buffer = ctx.gpu.create_buffer(
            "sprig sprite ibo",
            (index_count * std::mem::size_of::<u32>()) as u64,
            wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        );
        let bind_group = ctx.gpu.create_sprite_bind_group(
            ctx.pipeline,
            ctx.projection,
            &texture.view,
            &texture.sampler,
        );

        // Empty textures keep uvs in texel units.
        let inv = |extent: u32| if extent > 0 { 1.0 / extent as f32 } else { 1.0 };
        let inv_tex_width = inv(texture.width());
        let inv_tex_height = inv(texture.height());

        log::debug!(
            "sprite batch: {max_sprites} sprites, texture {}x{}",
            texture.width(),
            texture.height()
        );

        Self {
            texture,
            bind_group,
            vertices: vec![SpriteVertex::zeroed(); vertex_count],
            indices: vec![0; index_count],
            vertex_buffer,
            index_buffer,
            max_sprites,
            sprite_count: 0,
            inv_tex_width,
            inv_tex_height,
            origin: ctx.origin,
        }
    }

    /// Appends a sprite; does nothing once the batch is full.
    pub fn add(&mut self, sprite: &Sprite) {
        if !self.try_add(sprite) {
            log::trace!("sprite batch full ({}), sprite dropped", self.max_sprites);
        }
    }

    /// Appends a sprite, returning `false` if the batch was already full.
    pub fn try_add(&mut self, sprite: &Sprite) -> bool {
        if self.is_full() {
            return false;
        }

        let base = self.sprite_count * VERTICES_PER_SPRITE;
        let color = sprite.color.to_array();

        for (slot, unit) in self.vertices[base..base + VERTICES_PER_SPRITE]
            .iter_mut()
            .zip(UNIT_QUAD.iter())
        {
            // With +Y down the quad's y = 0 edge is already on top.
            let unit_v = match self.origin {
                ProjectionOrigin::BottomLeft => unit.uv[1],
                ProjectionOrigin::TopLeft => 1.0 - unit.uv[1],
            };
            *slot = SpriteVertex {
                position: [
                    unit.position[0] * sprite.width + sprite.x,
                    unit.position[1] * sprite.height + sprite.y,
                    unit.position[2] + sprite.z,
                ],
                color,
                blend: sprite.blend,
                uv: [
                    unit.uv[0] * sprite.tex_width * self.inv_tex_width + sprite.tex_x * self.inv_tex_width,
                    unit_v * sprite.tex_height * self.inv_tex_height + sprite.tex_y * self.inv_tex_height,
                ],
            };
        }

        let first = self.sprite_count * INDICES_PER_SPRITE;
        for (slot, index) in self.indices[first..first + INDICES_PER_SPRITE]
            .iter_mut()
            .zip(QUAD_INDICES)
        {
            *slot = base as u32 + index;
        }

        self.sprite_count += 1;
        true
    }

    /// Uploads the batch and records one indexed draw into the open frame.
    ///
    /// Does nothing if no frame is open or the batch is empty.
    pub fn draw<W: WindowHost>(&self, renderer: &mut Renderer<G, W>) {
        match renderer.target() {
            Some(mut target) => self.draw_into(&mut target),
            None => log::trace!("sprite batch drawn outside a frame; ignored"),
        }
    }

    /// Same as [`SpriteBatch::draw`], against an explicit target.
    pub fn draw_into(&self, target: &mut RenderTarget<'_, G>) {
        if self.is_empty() {
            return;
        }

        let vertices = &self.vertices[..self.sprite_count * VERTICES_PER_SPRITE];
        let indices = &self.indices[..self.sprite_count * INDICES_PER_SPRITE];
        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(indices);

        let gpu = target.gpu;
        gpu.write_buffer(&self.vertex_buffer, 0, vertex_bytes);
        gpu.write_buffer(&self.index_buffer, 0, index_bytes);

        gpu.set_pipeline(target.frame, target.pipeline);
        gpu.set_vertex_buffer(target.frame, 0, &self.vertex_buffer, vertex_bytes.len() as u64);
        gpu.set_index_buffer(target.frame, &self.index_buffer, index_bytes.len() as u64);
        gpu.set_bind_group(target.frame, 0, &self.bind_group);
        gpu.draw_indexed(target.frame, indices.len() as u32);
    }

    /// Forgets all sprites. Buffers keep their contents until overwritten.
    pub fn clear(&mut self) {
        self.sprite_count = 0;
    }

    pub fn len(&self) -> usize {
        self.sprite_count
    }

    pub fn capacity(&self) -> usize {
        self.max_sprites
    }

    pub fn is_empty(&self) -> bool {
        self.sprite_count == 0
    }

    pub fn is_full(&self) -> bool {
        self.sprite_count >= self.max_sprites
    }

    pub fn texture(&self) -> &TextureInfo<G> {
        &self.texture
    }

    /// Packed vertices of the sprites added so far.
    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices[..self.sprite_count * VERTICES_PER_SPRITE]
    }

    /// Packed indices of the sprites added so far.
    pub fn indices(&self) -> &[u32] {
        &self.indices[..self.sprite_count * INDICES_PER_SPRITE]
    }
}
