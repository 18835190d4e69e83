//! Hashes, value noise and fractal sums.
//!
//! The sine-based hashes are not cryptographic. They only need to look random
//! and to be reproducible on the GPU with the same constants.

use glam::{Vec2, Vec3};

use crate::math::{fract, mix};

/// 2D hash into `[0, 1)` used by the ring fire.
#[inline]
pub fn hash21(p: Vec2) -> f32 {
    fract((p.dot(Vec2::new(127.1, 311.7))).sin() * 43_758.545)
}

/// Cheaper hash used by the nebula cloud billboards.
#[inline]
pub fn cloud_hash(p: Vec2) -> f32 {
    fract((p.dot(Vec2::new(12.9898, 78.233))).sin() * 43_758.545)
}

/// Three decorrelated hash channels, each in `[0, 1)`.
pub fn hash3(p: Vec2) -> Vec3 {
    let mut p3 = Vec3::new(
        fract(p.x * 443.8975),
        fract(p.y * 397.2973),
        fract(p.x * 491.1871),
    );
    let shifted = Vec3::new(p3.y, p3.x, p3.z) + Vec3::splat(19.19);
    p3 += Vec3::splat(p3.dot(shifted));
    let a = Vec3::new(p3.x, p3.x, p3.y) + Vec3::new(p3.y, p3.z, p3.z);
    let b = Vec3::new(p3.z, p3.y, p3.x);
    let v = a * b;
    Vec3::new(fract(v.x), fract(v.y), fract(v.z))
}

#[inline]
fn hermite(f: Vec2) -> Vec2 {
    f * f * (Vec2::splat(3.0) - 2.0 * f)
}

/// Value noise: hashed lattice corners blended with a cubic Hermite curve.
pub fn value_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = hermite(p - i);

    let a = hash21(i);
    let b = hash21(i + Vec2::new(1.0, 0.0));
    let c = hash21(i + Vec2::new(0.0, 1.0));
    let d = hash21(i + Vec2::new(1.0, 1.0));

    mix(mix(a, b, f.x), mix(c, d, f.x), f.y)
}

/// Fractal sum of [`value_noise`]: five octaves, amplitude halving from 0.5,
/// frequency doubling from 2. Result stays in `[0, 1)`.
pub fn fbm(p: Vec2) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 2.0;
    for _ in 0..5 {
        value += amplitude * value_noise(p * frequency);
        frequency *= 2.0;
        amplitude *= 0.5;
    }
    value
}

/// Overlay noise built on the `x` channel of [`hash3`].
///
/// The interpolation weights are smoothed twice, which flattens the lattice
/// transitions further than [`value_noise`].
pub fn overlay_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let u = hermite(hermite(p - i));

    let a = hash3(i).x;
    let b = hash3(i + Vec2::new(1.0, 0.0)).x;
    let c = hash3(i + Vec2::new(0.0, 1.0)).x;
    let d = hash3(i + Vec2::new(1.0, 1.0)).x;

    mix(mix(a, b, u.x), mix(c, d, u.x), u.y)
}

/// Six-octave fractal sum of [`overlay_noise`], drifting with `time`.
pub fn overlay_fbm(p: Vec2, time: f32) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    for _ in 0..6 {
        value += amplitude * overlay_noise(p * frequency + Vec2::splat(time * 0.05));
        frequency *= 2.0;
        amplitude *= 0.5;
    }
    value
}
