//! Scalar control signals driven by pointer and wheel input.

use glam::Vec2;
use saturn_config::InputConfig;

/// Per-frame decay factor of the scroll sparkle.
pub const SPARKLE_DECAY: f32 = 0.92;
/// Sparkle below this snaps to exactly zero.
pub const SPARKLE_EPSILON: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSettings {
    pub wheel_speed_factor: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self::from(&InputConfig::default())
    }
}

impl From<&InputConfig> for ControlSettings {
    fn from(config: &InputConfig) -> Self {
        let (min_speed, max_speed) = if config.min_speed <= config.max_speed {
            (config.min_speed, config.max_speed)
        } else {
            (config.max_speed, config.min_speed)
        };
        Self {
            wheel_speed_factor: config.wheel_speed_factor,
            min_speed,
            max_speed,
        }
    }
}

/// Written by input events, read by the simulation step.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlSignals {
    /// Global speed multiplier for stars and clouds.
    pub speed: f32,
    /// Flash intensity after a wheel event, decaying every frame.
    pub scroll_sparkle: f32,
    /// Last pointer position in `[-1, 1]` on both axes, +Y up.
    ///
    /// Nothing in the scene reads it yet; it is kept so an orientation
    /// response can be added without touching the input path.
    pub pointer: Vec2,
    settings: ControlSettings,
}

impl ControlSignals {
    pub fn new(settings: ControlSettings) -> Self {
        Self {
            speed: 1.0_f32.clamp(settings.min_speed, settings.max_speed),
            scroll_sparkle: 0.0,
            pointer: Vec2::ZERO,
            settings,
        }
    }

    /// Wheel scroll of `delta_y` pixels (positive scrolls down).
    pub fn on_wheel(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        self.speed = (self.speed - delta_y * self.settings.wheel_speed_factor)
            .clamp(self.settings.min_speed, self.settings.max_speed);
        self.scroll_sparkle = 1.0;
    }

    /// Pointer at `(x, y)` surface pixels in a `width × height` surface.
    pub fn on_pointer_moved(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.pointer = Vec2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0);
    }

    /// One frame of sparkle decay.
    pub fn decay(&mut self) {
        self.scroll_sparkle *= SPARKLE_DECAY;
        if self.scroll_sparkle < SPARKLE_EPSILON {
            self.scroll_sparkle = 0.0;
        }
    }

    pub fn settings(&self) -> ControlSettings {
        self.settings
    }
}

impl Default for ControlSignals {
    fn default() -> Self {
        Self::new(ControlSettings::default())
    }
}
