//! Particle Universe - simulation core for a particle-survival arcade game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (enemies, particles, pooling, combat)
//! - `config`: Data-driven enemy tables and spawn thresholds
//! - `audio`: Fire-and-forget sound notifications
//! - `render`: Reference drawing against an abstract surface
//! - `color`: CSS-style colors shared by entities and rendering

pub mod audio;
pub mod color;
pub mod config;
pub mod render;
pub mod sim;

pub use color::Color;
pub use config::{ConfigError, GameConfig};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Simulation tuning constants
pub mod consts {
    /// Reference frame duration (ms) that velocities are expressed against (~60 fps)
    pub const FRAME_MS: f32 = 16.67;

    /// Maximum particles advanced by a single `update_particles` call
    pub const MAX_UPDATES_PER_FRAME: usize = 100;
    /// Trail history kept per particle (most recent last)
    pub const TRAIL_LENGTH: usize = 5;

    /// Minimum axis-wise distance between the player and a freshly spawned particle
    pub const SPAWN_PADDING: f32 = 200.0;
    /// Attempts before particle spawn sampling gives up on the padding rule
    pub const SPAWN_ATTEMPTS: usize = 64;

    /// Enemies spawn this far outside the chosen screen edge
    pub const SPAWN_EDGE_OFFSET: f32 = 50.0;
    /// Cross-screen enemies die once they leave the screen by this margin
    pub const CROSS_SCREEN_MARGIN: f32 = 100.0;
    /// Any enemy beyond this margin is force-despawned
    pub const LEASH_MARGIN: f32 = 200.0;

    /// Chance for a non-boss enemy to roll elite
    pub const ELITE_CHANCE: f32 = 0.02;
    pub const ELITE_HEALTH_MULT: f32 = 1.5;
    pub const ELITE_DAMAGE_MULT: f32 = 1.3;
    pub const ELITE_SPEED_MULT: f32 = 1.1;

    /// Chance a defeated enemy drops a healing loot particle
    pub const LOOT_CHANCE: f32 = 0.15;
    /// Fraction of max health awarded as experience on defeat
    pub const XP_PER_MAX_HEALTH: f32 = 0.25;
    /// Field drain applied to enemies when the player sets none (per second)
    pub const DEFAULT_ATTRACTION_DAMAGE: f32 = 10.0;

    /// Chance for a generic particle to be a powerup
    pub const POWERUP_CHANCE: f32 = 0.02;
    /// Shrink-to-size target when a particle sets none
    pub const DEFAULT_TARGET_SIZE: f32 = 3.0;
    /// Size lost per tick while above target
    pub const SHRINK_RATE: f32 = 0.1;
    /// Effective field radius multiplier while powered up
    pub const POWERED_RADIUS_MULT: f32 = 1.5;
    /// Inner absorption radius as a fraction of the effective radius
    pub const SUCTION_FRACTION: f32 = 0.2;
    /// Absorption also requires being within this fraction of the player's size
    pub const ABSORB_SIZE_FRACTION: f32 = 0.8;

    /// Attract field shaping
    pub const ATTRACT_DAMPING: f32 = 0.9;
    pub const RADIAL_FORCE: f32 = 0.6;
    pub const TANGENTIAL_FORCE: f32 = 0.3;
    /// Repel field impulse
    pub const REPEL_FORCE: f32 = 0.2;
    /// Velocity retained (and flipped) on a viewport bounce
    pub const BOUNCE_DAMPING: f32 = 0.8;

    /// Explosion burst
    pub const EXPLOSION_COUNT: usize = 20;
    pub const EXPLOSION_SPEED: f32 = 5.0;
    /// Hostile lifetime in ticks (2 seconds at 60 fps)
    pub const HOSTILE_LIFESPAN: u32 = 120;
    pub const HOSTILE_HIT_DAMAGE: f32 = 5.0;

    /// Health restored by heal and loot particles
    pub const HEAL_AMOUNT: f32 = 10.0;
}

/// Screen (canvas) bounds the simulation runs inside
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True if `pos` lies within the screen grown by `margin` on every side
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }

    /// Uniformly random point on screen
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rand_between(rng, 0.0, self.width),
            rand_between(rng, 0.0, self.height),
        )
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Uniform sample in `[min, max)`; tolerates empty or inverted ranges
#[inline]
pub fn rand_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

/// Direction and distance from `from` to `to`
///
/// Coincident points use a divisor of 1, yielding a zero direction and a
/// reported distance of 1 instead of NaN.
#[inline]
pub fn unit_toward(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    let len = delta.length();
    let dist = if len > 0.0 { len } else { 1.0 };
    (delta / dist, dist)
}
