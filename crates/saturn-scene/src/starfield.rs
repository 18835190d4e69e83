//! Recycling star particle field.
//!
//! Stars drift toward the viewer along +Z. A star that passes the forward
//! bound is re-sampled in place at the far end of the field, so the batch
//! size never changes.

use std::f32::consts::TAU;

use glam::Vec3;
use saturn_shading::{StarAnimation, star_color};

use crate::random::RandomSource;

/// A star past this depth is recycled.
pub const FORWARD_BOUND: f32 = 200.0;
/// No star is ever at or behind this depth.
pub const FAR_BOUND: f32 = -3500.0;

/// Smallest step kept between generated depths and [`FAR_BOUND`], so f32
/// rounding of `-3000 - r·500` near `r = 1` cannot land on the bound.
const FAR_MARGIN: f32 = 1e-3;

#[derive(Clone, Debug, PartialEq)]
pub struct StarParticle {
    pub position: Vec3,
    pub color: [f32; 3],
    /// Base sprite size before perspective and intensity.
    pub size: f32,
    /// Units per second along +Z at speed 1.
    pub speed: f32,
    pub phase: f32,
    /// Number of angular rays.
    pub spikes: f32,
    pub animation: StarAnimation,
}

impl StarParticle {
    fn sample(rng: &mut dyn RandomSource) -> Self {
        let (x, y) = sample_lateral(rng);
        let z = (-rng.next_f32() * 3000.0 - 500.0).max(FAR_BOUND + FAR_MARGIN);
        let color = star_color(rng.next_f32());
        let size = rng.next_f32() * 3.0 + 0.8;
        let speed = 50.0 + rng.next_f32() * 150.0;
        let phase = rng.next_f32() * TAU;
        let spikes = 4.0 + (rng.next_f32() * 3.0).floor();
        let animation = StarAnimation::from_unit(rng.next_f32());

        Self {
            position: Vec3::new(x, y, z),
            color,
            size,
            speed,
            phase,
            spikes,
            animation,
        }
    }
}

/// Lateral placement: 90% on a wide shell (radius 800..2600), the rest close
/// in (radius 0..600), with a uniformly random direction.
fn sample_lateral(rng: &mut dyn RandomSource) -> (f32, f32) {
    let radius = if rng.next_f32() < 0.9 {
        800.0 + rng.next_f32() * 1800.0
    } else {
        rng.next_f32() * 600.0
    };
    let theta = rng.next_f32() * TAU;
    let phi = (2.0 * rng.next_f32() - 1.0).acos();
    (
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Move a star back to the far end of the field with a fresh lateral position.
/// The new depth is always within `(-3500, -3000]`.
pub fn reseed(star: &mut StarParticle, rng: &mut dyn RandomSource) {
    let (x, y) = sample_lateral(rng);
    let z = (-3000.0 - rng.next_f32() * 500.0).max(FAR_BOUND + FAR_MARGIN);
    star.position = Vec3::new(x, y, z);
}

#[derive(Clone, Debug, Default)]
pub struct StarField {
    stars: Vec<StarParticle>,
}

impl StarField {
    pub fn generate(count: usize, rng: &mut dyn RandomSource) -> Self {
        let stars: Vec<_> = (0..count).map(|_| StarParticle::sample(rng)).collect();
        log::debug!("Generated {} stars", stars.len());
        Self { stars }
    }

    /// Drift every star by `speed_i × delta × global_speed` and recycle those
    /// past [`FORWARD_BOUND`]. Returns the number recycled.
    pub fn advance(&mut self, delta: f32, global_speed: f32, rng: &mut dyn RandomSource) -> usize {
        let mut recycled = 0;
        for star in &mut self.stars {
            star.position.z += star.speed * delta * global_speed;
            if star.position.z > FORWARD_BOUND {
                reseed(star, rng);
                recycled += 1;
            }
        }
        recycled
    }

    pub fn stars(&self) -> &[StarParticle] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Positions in batch order, for the per-frame GPU upload.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.stars.iter().map(|star| star.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, SeededRandom};

    fn in_bounds(z: f32) -> bool {
        z > FAR_BOUND && z <= FORWARD_BOUND
    }

    #[test]
    fn test_generated_stars_within_bounds() {
        let field = StarField::generate(8000, &mut SeededRandom::new(1));
        assert_eq!(field.len(), 8000);
        for star in field.stars() {
            assert!(
                (FAR_BOUND..=-500.0).contains(&star.position.z) && star.position.z > FAR_BOUND,
                "initial z {} out of range",
                star.position.z
            );
            assert!((0.8..3.8).contains(&star.size));
            assert!((50.0..200.0).contains(&star.speed));
            assert!((4.0..=6.0).contains(&star.spikes) && star.spikes.fract() == 0.0);
        }
    }

    #[test]
    fn test_extreme_samples_stay_strictly_inside_far_bound() {
        let field = StarField::generate(4, &mut ScriptedRandom::constant(0.999_999_9));
        for star in field.stars() {
            assert!(star.position.z > FAR_BOUND);
        }
    }

    #[test]
    fn test_advance_moves_toward_viewer() {
        let mut rng = SeededRandom::new(3);
        let mut field = StarField::generate(100, &mut rng);
        let before: Vec<f32> = field.positions().map(|p| p.z).collect();
        field.advance(1.0 / 60.0, 1.0, &mut rng);
        for (star, z) in field.stars().iter().zip(before) {
            assert!(star.position.z > z || star.position.z < -2999.0);
        }
    }

    #[test]
    fn test_star_past_forward_bound_is_reseeded_far() {
        let mut rng = ScriptedRandom::new(vec![0.5, 0.3, 0.7, 0.2, 0.9]);
        let mut field = StarField::generate(1, &mut rng);
        field.stars[0].position.z = 199.0;
        field.stars[0].speed = 120.0;

        let recycled = field.advance(1.0 / 60.0, 1.0, &mut rng);
        assert_eq!(recycled, 1);
        let z = field.stars()[0].position.z;
        assert!(
            (-3500.0..-500.0).contains(&z) && z <= -3000.0,
            "reseeded z {z} not deep in the field"
        );
    }

    #[test]
    fn test_star_exactly_at_bound_is_kept() {
        let mut rng = SeededRandom::new(9);
        let mut field = StarField::generate(1, &mut rng);
        field.stars[0].position.z = FORWARD_BOUND;
        assert_eq!(field.advance(0.0, 1.0, &mut rng), 0);
        assert_eq!(field.stars()[0].position.z, FORWARD_BOUND);
    }

    #[test]
    fn test_bounds_hold_over_long_run_at_max_speed() {
        let mut rng = SeededRandom::new(11);
        let mut field = StarField::generate(2000, &mut rng);
        for _ in 0..600 {
            field.advance(0.25, 3.0, &mut rng);
            assert!(field.positions().all(|p| in_bounds(p.z)));
        }
    }

    #[test]
    fn test_reseed_keeps_attributes() {
        let mut rng = SeededRandom::new(5);
        let mut field = StarField::generate(1, &mut rng);
        let before = field.stars()[0].clone();
        reseed(&mut field.stars[0], &mut rng);
        let star = &field.stars()[0];
        assert_eq!(star.color, before.color);
        assert_eq!(star.speed, before.speed);
        assert_eq!(star.animation, before.animation);
    }
}
