//! Drifting nebula cloud billboards.

use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec3};
use saturn_shading::NebulaColor;

use crate::random::RandomSource;

/// A cloud past this depth wraps back to [`CLOUD_RESET_Z`].
pub const CLOUD_WRAP_Z: f32 = 500.0;
pub const CLOUD_RESET_Z: f32 = -3000.0;
/// Radians per second around the view axis.
pub const CLOUD_SPIN_RATE: f32 = 0.01;
/// Units per second toward the viewer at speed 1.
pub const CLOUD_DRIFT_RATE: f32 = 20.0;
/// Subdivisions per side of the cloud quad, for the vertex wave.
pub const CLOUD_SEGMENTS: u32 = 16;

#[derive(Clone, Debug, PartialEq)]
pub struct NebulaCloud {
    pub color: NebulaColor,
    /// Edge length of the square billboard.
    pub size: f32,
    pub position: Vec3,
    /// Rotation about the Z axis in radians.
    pub rotation: f32,
}

impl NebulaCloud {
    /// Translation and spin; the size is applied in the vertex shader so the
    /// wave keeps working in local units.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_z(self.rotation), self.position)
    }
}

#[derive(Clone, Debug, Default)]
pub struct NebulaClouds {
    clouds: Vec<NebulaCloud>,
}

impl NebulaClouds {
    /// Clouds evenly spaced in angle around the origin, each at a random
    /// radius (500..1300) and depth (-3000..-1000).
    pub fn generate(count: usize, rng: &mut dyn RandomSource) -> Self {
        let clouds = (0..count)
            .map(|i| {
                let size = 400.0 + rng.next_f32() * 600.0;
                let color = NebulaColor::ALL[rng.index(NebulaColor::ALL.len())];
                let angle = (i as f32 / count as f32) * TAU;
                let radius = 500.0 + rng.next_f32() * 800.0;
                let z = -1000.0 - rng.next_f32() * 2000.0;
                let rotation = rng.next_f32() * TAU;
                NebulaCloud {
                    color,
                    size,
                    position: Vec3::new(angle.cos() * radius, angle.sin() * radius, z),
                    rotation,
                }
            })
            .collect();
        Self { clouds }
    }

    /// Spin each cloud and drift it toward the viewer, wrapping far behind
    /// once it passes [`CLOUD_WRAP_Z`].
    pub fn advance(&mut self, delta: f32, global_speed: f32) {
        for cloud in &mut self.clouds {
            cloud.rotation += delta * CLOUD_SPIN_RATE;
            cloud.position.z += delta * global_speed * CLOUD_DRIFT_RATE;
            if cloud.position.z > CLOUD_WRAP_Z {
                cloud.position.z = CLOUD_RESET_Z;
            }
        }
    }

    pub fn clouds(&self) -> &[NebulaCloud] {
        &self.clouds
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }
}
