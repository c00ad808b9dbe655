//! Particle entities and factories
//!
//! Ambient particles drift until absorbed; hostile particles (boss attacks)
//! fly straight for a fixed lifespan and are never pooled.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::consts::*;
use crate::rand_between;

/// Special particle tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Special {
    /// Sets the powerup-collected flag when absorbed
    Powerup,
    /// Fast archetype
    Speed,
    /// Health pickup collected by touch, not by the field
    Heal,
}

/// Trail point for particle rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Shrink target; `None` uses `DEFAULT_TARGET_SIZE`
    pub target_size: Option<f32>,
    pub color: Color,
    /// Experience on absorption; `None` or zero absorbs for 1
    pub xp_value: Option<u32>,
    pub special: Option<Special>,
    /// Health restored when picked up
    pub heal_amount: f32,
    /// Field absorption restores `heal_amount` (enemy loot)
    pub heals_on_absorb: bool,
    pub hostile: bool,
    /// Remaining ticks for hostile particles
    pub lifespan: u32,
    /// Whether the particle may be returned to the pool
    pub poolable: bool,
    /// Recent positions, most recent last
    #[serde(skip)]
    pub trail: VecDeque<TrailPoint>,
}

impl Particle {
    /// Blank ambient particle at rest
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: DEFAULT_TARGET_SIZE,
            target_size: None,
            color: Color::hsl(200.0, 80.0, 60.0),
            xp_value: None,
            special: None,
            heal_amount: 0.0,
            heals_on_absorb: false,
            hostile: false,
            lifespan: 0,
            poolable: true,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Reinitialize a retired particle as a fresh ambient one
    ///
    /// Every field is reset; the trail keeps its allocation.
    pub fn reset_ambient<R: Rng + ?Sized>(&mut self, pos: Vec2, rng: &mut R) {
        self.pos = pos;
        self.size = rand_between(rng, 2.0, 6.0);
        self.color = Color::random_hue(rng, 0.0, 360.0);
        self.vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 3.0,
            (rng.random::<f32>() - 0.5) * 3.0,
        );
        self.target_size = None;
        self.xp_value = None;
        self.special = None;
        self.heal_amount = 0.0;
        self.heals_on_absorb = false;
        self.hostile = false;
        self.lifespan = 0;
        self.poolable = true;
        self.trail.clear();
    }

    /// Record current position to trail, dropping the oldest beyond capacity
    pub fn record_trail(&mut self) {
        self.trail.push_back(TrailPoint {
            pos: self.pos,
            size: self.size,
        });
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    /// Experience credited when absorbed
    pub fn absorb_xp(&self) -> u32 {
        self.xp_value.filter(|xp| *xp > 0).unwrap_or(1)
    }

    pub fn target_size(&self) -> f32 {
        self.target_size.unwrap_or(DEFAULT_TARGET_SIZE)
    }
}

/// Generic particle archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Archetype {
    Standard,
    Large,
    Fast,
}

impl Archetype {
    const ALL: [Archetype; 3] = [Archetype::Standard, Archetype::Large, Archetype::Fast];

    /// (hue start, size, xp, special)
    fn stats(self) -> (f32, f32, u32, Option<Special>) {
        match self {
            Archetype::Standard => (180.0, 3.0, 2, None),
            Archetype::Large => (60.0, 5.0, 5, None),
            Archetype::Fast => (300.0, 2.0, 7, Some(Special::Speed)),
        }
    }

    /// 80% standard; otherwise any archetype uniformly
    fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random::<f32>() > 0.8 {
            Self::ALL[rng.random_range(0..Self::ALL.len())]
        } else {
            Archetype::Standard
        }
    }
}

/// Create an ambient particle: rare powerup, else a weighted archetype
pub fn create_particle<R: Rng + ?Sized>(pos: Vec2, rng: &mut R) -> Particle {
    let mut p = Particle::new(pos);

    if rng.random::<f32>() < POWERUP_CHANCE {
        p.color = Color::gold();
        p.size = 10.0;
        p.xp_value = Some(50);
        p.special = Some(Special::Powerup);
    } else {
        let (hue, size, xp, special) = Archetype::roll(rng).stats();
        p.color = Color::random_hue(rng, hue, 60.0);
        p.size = size;
        p.xp_value = Some(xp);
        p.special = special;
    }

    let spread = if p.special == Some(Special::Speed) { 6.0 } else { 3.0 };
    p.vel = Vec2::new(
        (rng.random::<f32>() - 0.5) * spread,
        (rng.random::<f32>() - 0.5) * spread,
    );
    p
}

/// Touch-collected heal pickup; carries no experience and is never pooled
pub fn create_heal_particle<R: Rng + ?Sized>(pos: Vec2, rng: &mut R) -> Particle {
    let mut p = Particle::new(pos);
    p.size = 8.0;
    p.color = Color::light_green();
    p.xp_value = Some(0);
    p.special = Some(Special::Heal);
    p.heal_amount = HEAL_AMOUNT;
    p.poolable = false;
    p.vel = Vec2::new(
        (rng.random::<f32>() - 0.5) * 2.0,
        (rng.random::<f32>() - 0.5) * 2.0,
    );
    p
}

/// Healing drop left by a defeated enemy, restored on absorption
pub fn create_loot_particle<R: Rng + ?Sized>(pos: Vec2, rng: &mut R) -> Particle {
    let mut p = Particle::new(pos);
    p.size = 7.0;
    p.color = Color::light_green();
    p.heal_amount = HEAL_AMOUNT;
    p.heals_on_absorb = true;
    p.vel = Vec2::new(rand_between(rng, -1.0, 1.0), rand_between(rng, -1.0, 1.0));
    p
}

/// Append a radial burst of hostile particles centered on `center`
pub fn create_particle_explosion<R: Rng + ?Sized>(
    center: Vec2,
    particles: &mut Vec<Particle>,
    rng: &mut R,
) {
    particles.reserve(EXPLOSION_COUNT);
    for i in 0..EXPLOSION_COUNT {
        let angle = (i as f32 / EXPLOSION_COUNT as f32) * std::f32::consts::TAU;
        let speed = EXPLOSION_SPEED * rand_between(rng, 0.75, 1.25);

        let mut p = Particle::new(center);
        p.vel = Vec2::new(angle.cos(), angle.sin()) * speed;
        p.size = 5.0;
        p.color = Color::hsl(0.0, 100.0, 70.0);
        p.hostile = true;
        p.lifespan = HOSTILE_LIFESPAN;
        p.poolable = false;
        particles.push(p);
    }
}
