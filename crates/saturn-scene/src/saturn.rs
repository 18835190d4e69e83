//! The planet and its ring system, rotating as one group.

use std::f32::consts::PI;

use glam::{Mat4, Vec3};

/// Center of the planet group.
pub const SATURN_CENTER: Vec3 = Vec3::new(0.0, 0.0, -50.0);
pub const PLANET_RADIUS: f32 = 35.0;
/// Yaw rate of the group in radians per second.
pub const SATURN_YAW_RATE: f32 = 0.15;
/// Tilt of the ring plane about X.
pub const RING_TILT: f32 = PI / 2.5;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SaturnSystem {
    /// Accumulated yaw in radians.
    pub rotation: f32,
    /// Elapsed seconds pushed into the planet and ring shading.
    pub time: f32,
}

impl SaturnSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, delta: f32, time: f32) {
        self.rotation += delta * SATURN_YAW_RATE;
        self.time = time;
    }

    pub fn group_matrix(&self) -> Mat4 {
        Mat4::from_translation(SATURN_CENTER) * Mat4::from_rotation_y(self.rotation)
    }

    pub fn planet_matrix(&self) -> Mat4 {
        self.group_matrix() * Mat4::from_scale(Vec3::splat(PLANET_RADIUS))
    }

    /// Both ring halves share this transform; they differ only in draw order.
    pub fn ring_matrix(&self) -> Mat4 {
        self.group_matrix() * Mat4::from_rotation_x(RING_TILT)
    }
}
