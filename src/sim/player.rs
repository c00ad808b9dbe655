//! The player entity
//!
//! Owned by the game loop and lent mutably to each subsystem for the
//! duration of a tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ATTRACTION_DAMAGE, POWERED_RADIUS_MULT};

/// Player field mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldMode {
    #[default]
    Neutral,
    /// Pull particles inward in a spiral; drains enemies
    Attract,
    /// Push particles away
    Repel,
    /// Drains enemies without moving particles
    Vortex,
}

impl FieldMode {
    /// Modes whose field hurts enemies inside it
    pub fn drains_enemies(self) -> bool {
        matches!(self, FieldMode::Attract | FieldMode::Vortex)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Physical body radius
    pub size: f32,
    /// Field of influence radius
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub mode: FieldMode,
    /// Remaining invincibility (ticks); hits land only when <= 0
    pub invincible_timer: f32,
    /// Invincibility granted per hit
    pub invincibility_cooldown: f32,
    /// Damage dealt to enemies on contact
    pub collision_damage: f32,
    /// Field drain on enemies per second; `None` uses the default
    pub attraction_damage: Option<f32>,
    /// Grows the effective field radius
    pub powered_up: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: 15.0,
            radius: 150.0,
            health: 100.0,
            max_health: 100.0,
            mode: FieldMode::Neutral,
            invincible_timer: 0.0,
            invincibility_cooldown: 60.0,
            collision_damage: 10.0,
            attraction_damage: None,
            powered_up: false,
        }
    }

    /// Field radius after powerup scaling
    pub fn effective_radius(&self) -> f32 {
        if self.powered_up {
            self.radius * POWERED_RADIUS_MULT
        } else {
            self.radius
        }
    }

    pub fn attraction_dps(&self) -> f32 {
        self.attraction_damage.unwrap_or(DEFAULT_ATTRACTION_DAMAGE)
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    /// Restore health, capped at max
    pub fn heal(&mut self, amount: f32) {
        self.health = self.max_health.min(self.health + amount);
    }

    /// Count invincibility down by one tick
    pub fn tick_invincibility(&mut self) {
        if self.invincible_timer > 0.0 {
            self.invincible_timer -= 1.0;
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}
