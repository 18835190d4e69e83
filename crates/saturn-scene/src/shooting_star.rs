//! Pooled shooting stars streaking toward the viewer.
//!
//! The pool is allocated once at full capacity. Spawning reactivates an
//! idle entry; retiring only flips it back to idle.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec3;
use saturn_shading::NebulaColor;

use crate::random::RandomSource;

pub const SHOOTING_STAR_CAPACITY: usize = 30;
pub const TRAIL_CAPACITY: usize = 50;
/// Life lost per second.
pub const LIFE_DECAY_RATE: f32 = 0.3;
/// Retire when closer than this to the viewer.
pub const RETIRE_DISTANCE: f32 = 150.0;
/// Retire once past this depth.
pub const RETIRE_Z: f32 = 300.0;
pub const SPAWN_INTERVAL: f32 = 0.8;
pub const SPAWN_PROBABILITY: f32 = 0.08;

/// Speeds are in units per 1/60 s frame.
const FRAME_RATE_SCALE: f32 = 60.0;

#[derive(Clone, Debug)]
pub struct ShootingStar {
    active: bool,
    position: Vec3,
    direction: Vec3,
    speed: f32,
    life: f32,
    age: f32,
    color: NebulaColor,
    trail: VecDeque<Vec3>,
    trail_capacity: usize,
}

impl ShootingStar {
    pub fn new(trail_capacity: usize) -> Self {
        let trail_capacity = trail_capacity.max(1);
        Self {
            active: false,
            position: Vec3::ZERO,
            direction: Vec3::Z,
            speed: 0.0,
            life: 0.0,
            age: 0.0,
            color: NebulaColor::HotPink,
            trail: VecDeque::with_capacity(trail_capacity + 1),
            trail_capacity,
        }
    }

    /// Reinitialize every attribute and activate.
    ///
    /// Starts on a ring of radius 800..1200 around the Z axis at depth
    /// -1500..-1000, aimed at a random point within ±150 laterally and
    /// ±100 in depth of `viewer`.
    pub fn trigger(&mut self, viewer: Vec3, rng: &mut dyn RandomSource) {
        let angle = rng.next_f32() * TAU;
        let distance = 800.0 + rng.next_f32() * 400.0;
        let z_offset = -1000.0 - rng.next_f32() * 500.0;
        self.position = Vec3::new(angle.cos() * distance, angle.sin() * distance, z_offset);

        let target = Vec3::new(
            (rng.next_f32() - 0.5) * 300.0,
            (rng.next_f32() - 0.5) * 300.0,
            viewer.z + (rng.next_f32() - 0.5) * 200.0,
        );
        self.direction = (target - self.position).normalize_or(Vec3::Z);
        self.speed = 18.0 + rng.next_f32() * 14.0;
        self.color = NebulaColor::ALL[rng.index(NebulaColor::ALL.len())];

        self.life = 1.0;
        self.age = 0.0;
        self.trail.clear();
        self.active = true;
    }

    /// Advance one frame. No-op while idle. Returns whether still active.
    pub fn update(&mut self, delta: f32, viewer: Vec3) -> bool {
        if !self.active {
            return false;
        }

        self.position += self.direction * self.speed * delta * FRAME_RATE_SCALE;

        self.trail.push_front(self.position);
        while self.trail.len() > self.trail_capacity {
            self.trail.pop_back();
        }

        self.life -= delta * LIFE_DECAY_RATE;
        self.age += delta;

        if self.position.distance(viewer) < RETIRE_DISTANCE
            || self.life <= 0.0
            || self.position.z > RETIRE_Z
        {
            self.active = false;
        }
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn life(&self) -> f32 {
        self.life
    }

    /// Seconds since the last trigger.
    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn color(&self) -> NebulaColor {
        self.color
    }

    /// Newest position first.
    pub fn trail(&self) -> &VecDeque<Vec3> {
        &self.trail
    }

    /// Fill `out` with the trail, newest first; slots past the recorded
    /// history repeat the oldest point (or the head when there is none).
    pub fn fill_trail(&self, out: &mut [Vec3]) {
        let fallback = self.trail.back().copied().unwrap_or(self.position);
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.trail.get(i).copied().unwrap_or(fallback);
        }
    }
}

/// Spawn and retirement statistics of one pool step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStep {
    pub spawned: bool,
    /// The spawn roll succeeded but every entry was busy.
    pub exhausted: bool,
    pub retired: usize,
}

#[derive(Clone, Debug)]
pub struct ShootingStarPool {
    stars: Vec<ShootingStar>,
    timer: f32,
    spawn_interval: f32,
    spawn_probability: f32,
    viewer: Vec3,
}

impl ShootingStarPool {
    pub fn new(
        capacity: usize,
        trail_capacity: usize,
        spawn_interval: f32,
        spawn_probability: f32,
        viewer: Vec3,
    ) -> Self {
        Self {
            stars: (0..capacity).map(|_| ShootingStar::new(trail_capacity)).collect(),
            timer: 0.0,
            spawn_interval,
            spawn_probability,
            viewer,
        }
    }

    /// Accumulate the spawn timer, maybe trigger one idle star, then update
    /// every star.
    pub fn advance(&mut self, delta: f32, rng: &mut dyn RandomSource) -> PoolStep {
        let mut step = PoolStep::default();

        self.timer += delta;
        if self.timer > self.spawn_interval && rng.next_f32() < self.spawn_probability {
            match self.stars.iter_mut().find(|star| !star.is_active()) {
                Some(star) => {
                    star.trigger(self.viewer, rng);
                    self.timer = 0.0;
                    step.spawned = true;
                }
                None => {
                    log::trace!("Shooting star pool exhausted, spawn skipped");
                    step.exhausted = true;
                }
            }
        }

        for star in &mut self.stars {
            let was_active = star.is_active();
            if !star.update(delta, self.viewer) && was_active {
                step.retired += 1;
            }
        }
        step
    }

    pub fn stars(&self) -> &[ShootingStar] {
        &self.stars
    }

    pub fn active(&self) -> impl Iterator<Item = &ShootingStar> {
        self.stars.iter().filter(|star| star.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn capacity(&self) -> usize {
        self.stars.len()
    }

    pub fn trail_capacity(&self) -> usize {
        self.stars
            .first()
            .map(|star| star.trail_capacity)
            .unwrap_or(TRAIL_CAPACITY)
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn viewer(&self) -> Vec3 {
        self.viewer
    }
}
