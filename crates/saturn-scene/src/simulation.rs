//! Owned animation state and the per-frame step.

use glam::Vec3;
use saturn_config::{InputConfig, SceneConfig};

use crate::controls::{ControlSettings, ControlSignals};
use crate::nebula::NebulaClouds;
use crate::random::RandomSource;
use crate::saturn::SaturnSystem;
use crate::shooting_star::{PoolStep, ShootingStarPool};
use crate::starfield::StarField;

/// Everything that changes between frames.
#[derive(Clone, Debug)]
pub struct SimulationState {
    /// Seconds accumulated over all steps.
    pub time: f32,
    pub frame: u64,
    pub controls: ControlSignals,
    pub stars: StarField,
    pub clouds: NebulaClouds,
    pub saturn: SaturnSystem,
    pub shooting_stars: ShootingStarPool,
}

impl SimulationState {
    /// Build every element once. `viewer` is the camera position the
    /// shooting stars aim at.
    pub fn new(
        scene: &SceneConfig,
        input: &InputConfig,
        viewer: Vec3,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let stars = StarField::generate(scene.star_count as usize, rng);
        let clouds = NebulaClouds::generate(scene.cloud_count as usize, rng);
        let shooting_stars = ShootingStarPool::new(
            scene.shooting_star_capacity as usize,
            scene.trail_capacity as usize,
            scene.spawn_interval,
            scene.spawn_probability,
            viewer,
        );
        log::info!(
            "Scene built: {} stars, {} clouds, {} pooled shooting stars",
            stars.len(),
            clouds.len(),
            shooting_stars.capacity()
        );

        Self {
            time: 0.0,
            frame: 0,
            controls: ControlSignals::new(ControlSettings::from(input)),
            stars,
            clouds,
            saturn: SaturnSystem::new(),
            shooting_stars,
        }
    }
}

/// What one step did, for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    pub delta: f32,
    pub stars_recycled: usize,
    pub pool: PoolStep,
}

/// Advance the state by `delta` seconds. Negative deltas are treated as zero.
pub fn step(state: &mut SimulationState, delta: f32, rng: &mut dyn RandomSource) -> StepReport {
    let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };

    state.time += delta;
    state.frame += 1;

    state.saturn.advance(delta, state.time);
    state.controls.decay();

    let speed = state.controls.speed;
    let stars_recycled = state.stars.advance(delta, speed, rng);
    state.clouds.advance(delta, speed);
    let pool = state.shooting_stars.advance(delta, rng);

    StepReport {
        delta,
        stars_recycled,
        pool,
    }
}

/// Receives the state once per frame after the step.
pub trait FrameSink {
    fn draw(&mut self, state: &SimulationState);
}

/// Draws nothing. Lets the loop run without a surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn draw(&mut self, _state: &SimulationState) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use crate::shooting_star::LIFE_DECAY_RATE;
    use crate::starfield::{FAR_BOUND, FORWARD_BOUND};

    const VIEWER: Vec3 = Vec3::new(0.0, 0.0, 100.0);

    fn state(rng: &mut dyn RandomSource) -> SimulationState {
        SimulationState::new(
            &SceneConfig::default(),
            &InputConfig::default(),
            VIEWER,
            rng,
        )
    }

    struct CountingSink {
        frames: Vec<u64>,
    }

    impl FrameSink for CountingSink {
        fn draw(&mut self, state: &SimulationState) {
            self.frames.push(state.frame);
        }
    }

    #[test]
    fn test_new_state_uses_configured_counts() {
        let state = state(&mut SeededRandom::new(1));
        assert_eq!(state.stars.len(), 8000);
        assert_eq!(state.clouds.len(), 6);
        assert_eq!(state.shooting_stars.capacity(), 30);
        assert_eq!(state.shooting_stars.trail_capacity(), 50);
        assert_eq!(state.controls.speed, 1.0);
    }

    #[test]
    fn test_hundred_frames_keep_invariants() {
        let mut rng = SeededRandom::new(21);
        let mut state = state(&mut rng);
        let mut sink = CountingSink { frames: Vec::new() };

        for _ in 0..100 {
            step(&mut state, 1.0 / 60.0, &mut rng);
            sink.draw(&state);
        }

        assert_eq!(sink.frames.len(), 100);
        assert!((state.time - 100.0 / 60.0).abs() < 1e-4);
        assert!(
            state
                .stars
                .positions()
                .all(|p| p.z > FAR_BOUND && p.z <= FORWARD_BOUND)
        );
        assert_eq!(state.controls.speed, 1.0);
        assert_eq!(state.controls.scroll_sparkle, 0.0);
        for star in state.shooting_stars.active() {
            assert!(star.age() <= 1.0 / LIFE_DECAY_RATE);
            assert!(star.life() > 0.0);
        }
    }

    #[test]
    fn test_wheel_then_step_decays_sparkle() {
        let mut rng = SeededRandom::new(2);
        let mut state = state(&mut rng);
        state.controls.on_wheel(-500.0);
        assert_eq!(state.controls.scroll_sparkle, 1.0);
        step(&mut state, 1.0 / 60.0, &mut rng);
        assert!((state.controls.scroll_sparkle - 0.92).abs() < 1e-6);
    }

    #[test]
    fn test_faster_speed_moves_stars_further() {
        let mut slow_rng = SeededRandom::new(3);
        let mut slow = state(&mut slow_rng);
        let mut fast_rng = SeededRandom::new(3);
        let mut fast = state(&mut fast_rng);
        fast.controls.on_wheel(-1000.0);

        let z0 = slow.stars.stars()[0].position.z;
        step(&mut slow, 0.01, &mut slow_rng);
        step(&mut fast, 0.01, &mut fast_rng);
        let slow_dz = slow.stars.stars()[0].position.z - z0;
        let fast_dz = fast.stars.stars()[0].position.z - z0;
        assert!(fast_dz > slow_dz * 1.9, "{fast_dz} vs {slow_dz}");
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut rng = SeededRandom::new(4);
        let mut state = state(&mut rng);
        let before = state.stars.stars()[0].position;
        let report = step(&mut state, -1.0, &mut rng);
        assert_eq!(report.delta, 0.0);
        assert_eq!(state.time, 0.0);
        assert_eq!(state.stars.stars()[0].position, before);
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn test_saturn_rotation_follows_delta() {
        let mut rng = SeededRandom::new(5);
        let mut state = state(&mut rng);
        step(&mut state, 0.2, &mut rng);
        assert!((state.saturn.rotation - 0.03).abs() < 1e-6);
        assert!((state.saturn.time - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_null_sink_accepts_state() {
        let mut rng = SeededRandom::new(6);
        let state = state(&mut rng);
        NullSink.draw(&state);
    }
}
