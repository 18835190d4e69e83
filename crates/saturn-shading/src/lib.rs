//! Procedural shading library shared by every element of the backdrop.
//!
//! Each function exists twice: a CPU reference in Rust, used by tests and by
//! CPU-side decisions, and a WGSL twin in [`SHADING_PRELUDE`] that the element
//! shaders prepend. Both are pure functions of coordinate and time and keep the
//! same hash constants and octave counts.

pub mod math;
pub mod noise;
pub mod palette;
pub mod recipes;
mod wgsl;

pub use noise::{cloud_hash, fbm, hash3, hash21, overlay_fbm, overlay_noise, value_noise};
pub use palette::{NebulaColor, STAR_PALETTE, hex_to_rgb, star_color};
pub use recipes::{
    RING_INNER_RADIUS, RING_OUTER_RADIUS, RingSample, StarAnimation, background_wave, cloud_shade,
    cloud_wave, overlay_shade, planet_shade, ring_fire, star_fragment, star_intensity,
    star_point_size, star_shape,
};
pub use wgsl::SHADING_PRELUDE;
