//! Scalar helpers with shader-language semantics.

/// `x - floor(x)`, always in `[0, 1)`.
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Hermite step. Edges may be reversed (`e0 > e1`) to get a falling edge.
#[inline]
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
