/// Number of components in a 4x4 matrix.
pub const MAT4_COMPONENTS: usize = 16;

/// Column-major 4x4 matrix, laid out the way WGSL `mat4x4<f32>` expects it.
pub type Mat4 = [f32; MAT4_COMPONENTS];

/// Builds an orthographic projection mapping the given box to clip space.
///
/// x and y land in `[-1, 1]`. Depth follows `(z + near) / (near - far)`, which
/// lands in `[0, 1]` for the symmetric `near = -far` range the renderer uses:
/// `near` maps to 1 and `far` maps to 0.
///
/// Degenerate boxes (`left == right`, `bottom == top`, `z_near == z_far`) are
/// not guarded and produce non-finite entries.
pub fn orthographic_projection(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    z_near: f32,
    z_far: f32,
) -> Mat4 {
    [
        2.0 / (right - left),
        0.0,
        0.0,
        0.0,
        //
        0.0,
        2.0 / (top - bottom),
        0.0,
        0.0,
        //
        0.0,
        0.0,
        1.0 / (z_near - z_far),
        0.0,
        //
        (right + left) / (left - right),
        (top + bottom) / (bottom - top),
        z_near / (z_near - z_far),
        1.0,
    ]
}

/// Multiplies a column-major matrix by the point `(x, y, z, 1)`.
pub fn transform_point(m: &Mat4, p: [f32; 3]) -> [f32; 4] {
    let [x, y, z] = p;
    let mut out = [0.0; 4];
    for (row, value) in out.iter_mut().enumerate() {
        *value = m[row] * x + m[4 + row] * y + m[8 + row] * z + m[12 + row];
    }
    out
}
