//! Per-display-frame loop controller.
//!
//! One step and one draw per display refresh. Frame times are measured with
//! [`Instant`], clamped, and fed into [`saturn_scene::step`]; the draw always
//! follows the step of the same frame.

use std::time::Instant;

use saturn_scene::{FrameSink, RandomSource, SimulationState, StepReport, step};
use tracing::{debug, info, warn};

/// Longest frame time fed into a step, in seconds. Longer gaps (a hidden
/// window, a debugger pause) are clamped.
pub const MAX_FRAME_TIME: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Running,
    Stopped,
}

pub struct RenderLoop {
    state: LoopState,
    previous_time: Option<Instant>,
    frame_count: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Uninitialized,
            previous_time: None,
            frame_count: 0,
        }
    }

    /// Begin running. Only an uninitialized loop can start; a stopped loop
    /// stays stopped.
    pub fn start(&mut self) -> bool {
        if self.state != LoopState::Uninitialized {
            return false;
        }
        self.state = LoopState::Running;
        self.previous_time = Some(Instant::now());
        info!("Render loop started");
        true
    }

    /// Run one frame using the wall-clock time since the previous frame.
    /// `None` when the loop is not running.
    pub fn frame(
        &mut self,
        sim: &mut SimulationState,
        rng: &mut dyn RandomSource,
        sink: &mut dyn FrameSink,
    ) -> Option<StepReport> {
        if self.state != LoopState::Running {
            return None;
        }
        let now = Instant::now();
        let delta = self
            .previous_time
            .map(|previous| now.duration_since(previous).as_secs_f32())
            .unwrap_or(0.0);
        self.previous_time = Some(now);
        self.frame_with_delta(delta, sim, rng, sink)
    }

    /// Run one frame with an explicit frame time in seconds.
    pub fn frame_with_delta(
        &mut self,
        delta: f32,
        sim: &mut SimulationState,
        rng: &mut dyn RandomSource,
        sink: &mut dyn FrameSink,
    ) -> Option<StepReport> {
        if self.state != LoopState::Running {
            return None;
        }
        let report = step(sim, clamp_frame_time(delta), rng);
        sink.draw(sim);
        self.frame_count += 1;

        if report.pool.exhausted {
            debug!("Shooting star pool exhausted, spawn skipped");
        }
        Some(report)
    }

    /// Stop for good. Returns whether this call did the stopping.
    pub fn stop(&mut self) -> bool {
        if self.state == LoopState::Stopped {
            return false;
        }
        self.state = LoopState::Stopped;
        self.previous_time = None;
        info!("Render loop stopped after {} frames", self.frame_count);
        true
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp to `[0, MAX_FRAME_TIME]`, warning when a long frame is cut short.
pub fn clamp_frame_time(delta: f32) -> f32 {
    if !delta.is_finite() || delta < 0.0 {
        return 0.0;
    }
    if delta > MAX_FRAME_TIME {
        warn!(
            "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
            delta * 1000.0,
            MAX_FRAME_TIME * 1000.0
        );
        return MAX_FRAME_TIME;
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use saturn_config::{InputConfig, SceneConfig};
    use saturn_scene::SeededRandom;

    struct RecordingSink {
        times: Vec<f32>,
    }

    impl FrameSink for RecordingSink {
        fn draw(&mut self, state: &SimulationState) {
            self.times.push(state.time);
        }
    }

    fn sim(rng: &mut dyn RandomSource) -> SimulationState {
        SimulationState::new(
            &SceneConfig::default(),
            &InputConfig::default(),
            Vec3::new(0.0, 0.0, 100.0),
            rng,
        )
    }

    #[test]
    fn test_loop_starts_uninitialized() {
        let loop_ = RenderLoop::default();
        assert_eq!(loop_.state(), LoopState::Uninitialized);
        assert!(!loop_.is_running());
    }

    #[test]
    fn test_frames_before_start_do_nothing() {
        let mut rng = SeededRandom::new(1);
        let mut state = sim(&mut rng);
        let mut sink = RecordingSink { times: Vec::new() };
        let mut loop_ = RenderLoop::new();
        assert!(
            loop_
                .frame_with_delta(0.1, &mut state, &mut rng, &mut sink)
                .is_none()
        );
        assert!(sink.times.is_empty());
        assert_eq!(state.frame, 0);
    }

    #[test]
    fn test_draw_sees_state_after_step() {
        let mut rng = SeededRandom::new(2);
        let mut state = sim(&mut rng);
        let mut sink = RecordingSink { times: Vec::new() };
        let mut loop_ = RenderLoop::new();
        assert!(loop_.start());

        for _ in 0..3 {
            loop_.frame_with_delta(0.1, &mut state, &mut rng, &mut sink);
        }
        assert_eq!(sink.times.len(), 3);
        assert!((sink.times[0] - 0.1).abs() < 1e-6);
        assert!((sink.times[2] - 0.3).abs() < 1e-5);
        assert_eq!(loop_.frame_count(), 3);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut rng = SeededRandom::new(3);
        let mut state = sim(&mut rng);
        let mut sink = RecordingSink { times: Vec::new() };
        let mut loop_ = RenderLoop::new();
        loop_.start();

        let report = loop_
            .frame_with_delta(5.0, &mut state, &mut rng, &mut sink)
            .unwrap();
        assert_eq!(report.delta, MAX_FRAME_TIME);
        assert_eq!(state.time, MAX_FRAME_TIME);
    }

    #[test]
    fn test_clamp_frame_time() {
        assert_eq!(clamp_frame_time(0.016), 0.016);
        assert_eq!(clamp_frame_time(1.0), MAX_FRAME_TIME);
        assert_eq!(clamp_frame_time(-0.5), 0.0);
        assert_eq!(clamp_frame_time(f32::NAN), 0.0);
    }

    #[test]
    fn test_stop_is_final_and_idempotent() {
        let mut rng = SeededRandom::new(4);
        let mut state = sim(&mut rng);
        let mut sink = RecordingSink { times: Vec::new() };
        let mut loop_ = RenderLoop::new();
        loop_.start();
        assert!(loop_.stop());
        assert!(!loop_.stop());
        assert!(!loop_.start(), "a stopped loop cannot restart");
        assert!(
            loop_
                .frame(&mut state, &mut rng, &mut sink)
                .is_none()
        );
        assert!(sink.times.is_empty());
    }

    #[test]
    fn test_wall_clock_frame_advances_time() {
        let mut rng = SeededRandom::new(5);
        let mut state = sim(&mut rng);
        let mut sink = RecordingSink { times: Vec::new() };
        let mut loop_ = RenderLoop::new();
        loop_.start();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let report = loop_.frame(&mut state, &mut rng, &mut sink).unwrap();
        assert!(report.delta > 0.0);
        assert!(report.delta <= MAX_FRAME_TIME);
    }
}
