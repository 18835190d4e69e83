//! Saturn nebula scene: owned simulation state, the per-frame step, and the GPU element renderers.

pub mod controls;
pub mod gpu;
pub mod nebula;
pub mod random;
pub mod saturn;
pub mod shooting_star;
pub mod simulation;
pub mod starfield;

pub use controls::{ControlSettings, ControlSignals, SPARKLE_DECAY, SPARKLE_EPSILON};
pub use gpu::{GpuScene, GpuSceneOptions};
pub use nebula::{NebulaCloud, NebulaClouds};
pub use random::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom, random_source};
pub use saturn::SaturnSystem;
pub use shooting_star::{PoolStep, ShootingStar, ShootingStarPool};
pub use simulation::{FrameSink, NullSink, SimulationState, StepReport, step};
pub use starfield::{StarField, StarParticle, reseed};
