//! Sprite vertex layout and the unit quad every sprite is stretched from.

use bytemuck::{Pod, Zeroable};

/// Vertices emitted per sprite.
pub const VERTICES_PER_SPRITE: usize = 4;

/// Indices emitted per sprite (two triangles).
pub const INDICES_PER_SPRITE: usize = 6;

/// Floats per vertex: position (3), color (4), blend (1), uv (2).
pub const SPRITE_VERTEX_COMPONENTS: usize = 10;

/// Vertex layout (40 bytes):
///
///  offset  0  position [f32; 3]   loc 0
///  offset 12  color    [f32; 4]   loc 1
///  offset 28  blend    f32        loc 2
///  offset 32  uv       [f32; 2]   loc 3
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub blend: f32,
    pub uv: [f32; 2],
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4, // color
        2 => Float32,   // blend
        3 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Unit quad in bottom-left, bottom-right, top-right, top-left order.
///
/// UVs are flipped in v so that image row 0 lands on the y = 1 edge, which
/// is the top edge under a bottom-left projection.
pub const UNIT_QUAD: [SpriteVertex; VERTICES_PER_SPRITE] = [
    SpriteVertex { position: [0.0, 0.0, 0.0], color: [1.0; 4], blend: 1.0, uv: [0.0, 1.0] },
    SpriteVertex { position: [1.0, 0.0, 0.0], color: [1.0; 4], blend: 1.0, uv: [1.0, 1.0] },
    SpriteVertex { position: [1.0, 1.0, 0.0], color: [1.0; 4], blend: 1.0, uv: [1.0, 0.0] },
    SpriteVertex { position: [0.0, 1.0, 0.0], color: [1.0; 4], blend: 1.0, uv: [0.0, 0.0] },
];

/// Two counter-clockwise triangles covering the unit quad.
pub const QUAD_INDICES: [u32; INDICES_PER_SPRITE] = [0, 1, 2, 0, 2, 3];
