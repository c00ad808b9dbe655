//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Entities are plain data, mutated in place by tick functions
//! - Randomness comes from a caller-supplied RNG only
//! - Iteration order is sequence order
//! - No rendering or platform dependencies

pub mod enemy;
pub mod particle;
pub mod player;
pub mod pool;
pub mod projectile;
pub mod swarm;
pub mod world;

pub use enemy::{
    Enemy, EnemyTickReport, pick_weighted_key, spawn_enemy, spawn_random_enemy, update_enemies,
};
pub use particle::{
    Particle, Special, TrailPoint, create_heal_particle, create_loot_particle, create_particle,
    create_particle_explosion,
};
pub use player::{FieldMode, Player};
pub use pool::{ParticlePool, auto_respawn_particles};
pub use projectile::{Projectile, ProjectileFactory, ProjectileKind, StandardProjectiles};
pub use swarm::{ParticleTickReport, update_particles};
pub use world::{StepReport, World};

use crate::Viewport;
use crate::consts::FRAME_MS;

/// Timing and bounds for one simulation tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Elapsed wall time since the previous tick
    pub dt_ms: f32,
    pub viewport: Viewport,
}

impl Frame {
    pub fn new(dt_ms: f32, viewport: Viewport) -> Self {
        Self { dt_ms, viewport }
    }

    /// Elapsed time relative to a nominal 60 Hz frame
    pub fn time_scale(&self) -> f32 {
        self.dt_ms / FRAME_MS
    }
}
