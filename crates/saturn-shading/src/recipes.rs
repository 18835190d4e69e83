//! Color recipes for each scene element.
//!
//! These mirror the WGSL functions of the same name in the shading prelude.

use glam::{Vec2, Vec3, Vec4};

use crate::math::{mix, smoothstep};
use crate::noise::{cloud_hash, fbm, hash3, hash21, overlay_fbm};

const HOT_PINK: Vec3 = Vec3::new(1.0, 0.08, 0.58);
const ELECTRIC_CYAN: Vec3 = Vec3::new(0.0, 1.0, 1.0);
const NEON_MINT: Vec3 = Vec3::new(0.0, 1.0, 0.62);
const ELECTRIC_PURPLE: Vec3 = Vec3::new(0.62, 0.0, 1.0);
const NEON_ORANGE: Vec3 = Vec3::new(1.0, 0.4, 0.0);
const ELECTRIC_GOLD: Vec3 = Vec3::new(1.0, 0.84, 0.0);

/// Planet surface color and alpha.
///
/// `uv.y` is the latitude in `[0, 1]` (south to north pole), `uv.x` the
/// longitude. `view_normal` is the surface normal in view space; the rim glow
/// grows as it turns away from the viewer.
pub fn planet_shade(uv: Vec2, view_normal: Vec3, time: f32) -> Vec4 {
    let lat = uv.y;
    let band = (lat * 12.0 + time * 0.15).sin() * 0.5 + 0.5;
    let band2 = (lat * 8.0 - time * 0.1).sin() * 0.5 + 0.5;
    let streak = (uv.x * 30.0 + time * 0.08).sin() * 0.5 + 0.5;

    let mut color = HOT_PINK.lerp(ELECTRIC_CYAN, band);
    color = color.lerp(NEON_MINT, band2 * 0.7);
    color = color.lerp(ELECTRIC_PURPLE, streak * 0.4);
    color = color.lerp(NEON_ORANGE, band * band2 * 0.5);

    let pole = smoothstep(0.85, 0.95, lat) + smoothstep(0.15, 0.05, lat);
    color = color.lerp(HOT_PINK.lerp(ELECTRIC_GOLD, 0.5), pole * 0.8);

    let rim = (1.0 - view_normal.dot(Vec3::Z).abs()).powf(2.5);
    let alpha = 0.25 + rim * 0.6;
    color += Vec3::splat(rim * 0.4);
    color *= 1.5;

    color.extend(alpha)
}

const DARK_MINT: Vec3 = Vec3::new(0.0, 0.3, 0.2);
const MINT: Vec3 = Vec3::new(0.0, 0.6, 0.4);
const MINT_GREEN: Vec3 = Vec3::new(0.0, 0.8, 0.5);
const BRIGHT_MINT: Vec3 = Vec3::new(0.0, 1.0, 0.62);
const LIGHT_MINT: Vec3 = Vec3::new(0.4, 1.0, 0.75);
const PALE_MINT: Vec3 = Vec3::new(0.7, 1.0, 0.85);
const WHITE_MINT: Vec3 = Vec3::new(0.9, 1.0, 0.95);

/// Ring inner and outer radius in the ring plane.
pub const RING_INNER_RADIUS: f32 = 40.0;
pub const RING_OUTER_RADIUS: f32 = 70.0;

/// One ring fire sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingSample {
    pub color: Vec3,
    pub alpha: f32,
    /// Combined fire intensity before banding.
    pub fire: f32,
    /// Angular spike pattern in `[0, 1]`.
    pub spike: f32,
}

/// Seven-band gradient from embers to white-hot.
fn fire_band(fire: f32) -> Vec3 {
    let bands = [
        (0.85, PALE_MINT, WHITE_MINT),
        (0.7, LIGHT_MINT, PALE_MINT),
        (0.55, BRIGHT_MINT, LIGHT_MINT),
        (0.4, MINT_GREEN, BRIGHT_MINT),
        (0.25, MINT, MINT_GREEN),
        (0.1, DARK_MINT, MINT),
    ];
    for (threshold, low, high) in bands {
        if fire > threshold {
            return low.lerp(high, (fire - threshold) / 0.15);
        }
    }
    (DARK_MINT * 0.5).lerp(DARK_MINT, fire / 0.1)
}

/// Ring fire at a point of the ring plane (`pos` in ring-local units).
pub fn ring_fire(pos: Vec2, time: f32) -> RingSample {
    let dist = pos.length();
    let angle = pos.y.atan2(pos.x);

    let spike_angle = angle * 25.0;
    let spike1 = (spike_angle + time * 2.0).sin().abs().powf(0.3);
    let spike2 = (spike_angle * 1.5 - time * 1.5).sin().abs().powf(0.4);
    let spike = spike1 * 0.7 + spike2 * 0.3;

    let fire_uv = Vec2::new(angle * 5.0, (dist - RING_INNER_RADIUS) * 0.1);
    let turbulence = fbm(fire_uv + Vec2::new(time * 0.3, -time * 1.2));
    let turbulence2 = fbm(fire_uv * 2.5 + Vec2::new(time * 0.5, -time * 1.8));
    let flame_rise = fbm(Vec2::new(angle * 15.0, dist * 0.2 - time * 2.0));

    let flicker = mix(0.6, 1.0, (time * 10.0 + angle * 30.0).sin() * 0.5 + 0.5);
    let fire = (turbulence * 0.4 + turbulence2 * 0.3 + flame_rise * 0.3) * flicker * spike;

    let dist_norm = (dist - RING_INNER_RADIUS) / (RING_OUTER_RADIUS - RING_INNER_RADIUS);
    let mut color = fire_band(fire).lerp(DARK_MINT, dist_norm * 0.3);

    let ember = hash21(pos * 80.0 + Vec2::splat(time * 2.0));
    if ember > 0.985 && fire > 0.2 && spike > 0.6 {
        color += WHITE_MINT * 0.8;
    }

    let alpha = fire
        * 0.7
        * smoothstep(0.4, 0.9, spike)
        * smoothstep(RING_INNER_RADIUS, RING_INNER_RADIUS + 2.0, dist)
        * smoothstep(RING_OUTER_RADIUS, RING_OUTER_RADIUS - 4.0, dist);

    RingSample {
        color: color * 1.7,
        alpha,
        fire,
        spike,
    }
}

/// How a star's brightness oscillates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StarAnimation {
    /// Squared sine, fast.
    Twinkle,
    /// Smoothstepped sine, slow.
    Pulse,
    /// Tiny ripple around a fixed brightness.
    Steady,
}

impl StarAnimation {
    /// Pick a mode from a uniform sample: 40% twinkle, 30% pulse, 30% steady.
    pub fn from_unit(u: f32) -> StarAnimation {
        if u < 0.4 {
            StarAnimation::Twinkle
        } else if u < 0.7 {
            StarAnimation::Pulse
        } else {
            StarAnimation::Steady
        }
    }

    /// Encoding used in the star vertex attribute.
    pub fn code(self) -> f32 {
        match self {
            StarAnimation::Twinkle => 0.0,
            StarAnimation::Pulse => 1.0,
            StarAnimation::Steady => 2.0,
        }
    }
}

pub fn star_intensity(mode: StarAnimation, time: f32, phase: f32) -> f32 {
    match mode {
        StarAnimation::Twinkle => {
            let t = (time * 3.0 + phase).sin() * 0.5 + 0.5;
            0.6 + t * t * 0.4
        }
        StarAnimation::Pulse => {
            let p = smoothstep(0.0, 1.0, (time * 0.8 + phase).sin() * 0.5 + 0.5);
            0.7 + p * 0.3
        }
        StarAnimation::Steady => 0.85 + (time * 0.2 + phase).sin() * 0.05,
    }
}

/// On-screen sprite size in physical pixels.
///
/// Perspective attenuation is capped at three times the base size so stars
/// passing the viewer never blow up.
pub fn star_point_size(size: f32, depth: f32, intensity: f32) -> f32 {
    let perspective = if depth > 0.0 {
        size * (1200.0 / depth)
    } else {
        f32::INFINITY
    };
    perspective.min(size * 3.0) * intensity
}

/// Star brightness at `center`, the offset from the sprite center in `[-0.5, 0.5]`.
pub fn star_shape(center: Vec2, spikes: f32) -> f32 {
    let angle = center.y.atan2(center.x);
    let radius = center.length();

    let spike = (angle * spikes * 0.5).cos().abs().powi(2);

    let core = (-radius * 15.0).exp();
    let rays = (-radius * 6.0).exp() * spike;
    let cross = f32::max(
        (-center.x.abs() * 25.0).exp() * (-center.y.abs() * 4.0).exp(),
        (-center.y.abs() * 25.0).exp() * (-center.x.abs() * 4.0).exp(),
    );
    let glow = (-radius * 3.5).exp() * 0.4;

    core + rays * 0.8 + cross * 0.5 + glow
}

/// Final star sprite color, or `None` where the fragment is discarded.
pub fn star_fragment(center: Vec2, color: Vec3, spikes: f32, intensity: f32) -> Option<Vec3> {
    let shape = star_shape(center, spikes);
    if shape < 0.01 {
        return None;
    }
    let core = (-center.length() * 18.0).exp();
    Some(color * shape * intensity + Vec3::new(1.0, 0.98, 0.95) * core * 0.6)
}

/// Cloud billboard color and alpha at `uv` in `[0, 1]^2`.
pub fn cloud_shade(uv: Vec2, time: f32, base: Vec3) -> Vec4 {
    let dist = (uv - Vec2::splat(0.5)).length();
    let n = cloud_hash(uv * 8.0 + Vec2::splat(time * 0.08));
    let alpha = smoothstep(0.5, 0.0, dist) * 0.25 * n;
    (base * (1.3 + n * 0.4)).extend(alpha)
}

/// Out-of-plane displacement of a cloud vertex.
pub fn cloud_wave(x: f32, time: f32) -> f32 {
    (x * 0.01 + time * 0.5).sin() * 15.0
}

/// Out-of-plane displacement of the background plane.
pub fn background_wave(x: f32, y: f32, time: f32) -> f32 {
    (x * 0.001 + time * 0.1).sin() * 50.0 + (y * 0.001 + time * 0.15).sin() * 50.0
}

const OVERLAY_PURPLE: Vec3 = Vec3::new(0.1, 0.05, 0.15);
const OVERLAY_BLUE: Vec3 = Vec3::new(0.05, 0.1, 0.2);
const OVERLAY_TEAL: Vec3 = Vec3::new(0.05, 0.15, 0.15);

/// Fullscreen nebula overlay at screen `uv` in `[0, 1]^2`.
///
/// `sparkle` in `[0, 1]` lights scattered texels; below 0.01 it has no effect.
pub fn overlay_shade(uv: Vec2, time: f32, cycle_time: f32, sparkle: f32) -> Vec4 {
    let dist = (uv - Vec2::splat(0.5)).length();

    let cloud_time = cycle_time * 0.03;
    let clouds1 = overlay_fbm(uv * 3.0 + Vec2::new(cloud_time, cloud_time * 0.5), time);
    let clouds2 = overlay_fbm(uv * 2.0 - Vec2::new(cloud_time * 0.7, cloud_time), time);
    let combined = clouds1 * 0.6 + clouds2 * 0.4;

    let cycle = (cycle_time * 0.1).sin() * 0.5 + 0.5;
    let base = if cycle < 0.5 {
        OVERLAY_PURPLE.lerp(OVERLAY_BLUE, cycle * 2.0)
    } else {
        OVERLAY_BLUE.lerp(OVERLAY_TEAL, (cycle - 0.5) * 2.0)
    };

    let vignette = smoothstep(1.2, 0.0, dist);
    let mut color = base * (1.0 + combined * 0.8) * vignette;

    if sparkle > 0.01 && hash3(uv * 100.0 + Vec2::splat(time)).x > 0.98 {
        color += Vec3::new(0.3, 0.4, 0.5) * sparkle;
    }

    color.extend(vignette * 0.6)
}
