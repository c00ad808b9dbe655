//! Enemy projectiles
//!
//! Shooters only ask a factory for a projectile aimed from their position
//! at the player; the projectile sequence itself belongs to the caller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::LEASH_MARGIN;
use crate::{Viewport, unit_toward};

/// Projectile archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectileKind {
    #[default]
    Bullet,
    /// Fast, thin, weak
    Laser,
    /// Slow, large, heavy
    Orb,
}

impl ProjectileKind {
    /// Travel per tick
    pub fn speed(&self) -> f32 {
        match self {
            ProjectileKind::Bullet => 4.0,
            ProjectileKind::Laser => 7.0,
            ProjectileKind::Orb => 2.5,
        }
    }

    pub fn damage(&self) -> f32 {
        match self {
            ProjectileKind::Bullet => 8.0,
            ProjectileKind::Laser => 5.0,
            ProjectileKind::Orb => 15.0,
        }
    }

    pub fn size(&self) -> f32 {
        match self {
            ProjectileKind::Bullet => 4.0,
            ProjectileKind::Laser => 2.0,
            ProjectileKind::Orb => 9.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ProjectileKind,
    pub damage: f32,
    pub size: f32,
}

impl Projectile {
    /// Move one tick along the velocity
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Past the enemy leash margin; shooters may sit just outside the screen
    pub fn is_off_screen(&self, viewport: &Viewport) -> bool {
        !viewport.contains_with_margin(self.pos, LEASH_MARGIN)
    }
}

/// Builds projectiles for shooting enemies
pub trait ProjectileFactory {
    fn create(&self, origin: Vec2, target: Vec2, kind: ProjectileKind) -> Projectile;
}

/// Straight-line projectiles with per-kind stats
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardProjectiles;

impl ProjectileFactory for StandardProjectiles {
    fn create(&self, origin: Vec2, target: Vec2, kind: ProjectileKind) -> Projectile {
        let (dir, _) = unit_toward(origin, target);
        Projectile {
            pos: origin,
            vel: dir * kind.speed(),
            kind,
            damage: kind.damage(),
            size: kind.size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aims_at_target() {
        let p = StandardProjectiles.create(
            Vec2::new(0.0, 0.0),
            Vec2::new(30.0, 40.0),
            ProjectileKind::Bullet,
        );
        assert!((p.vel.length() - ProjectileKind::Bullet.speed()).abs() < 1e-5);
        assert!((p.vel.normalize() - Vec2::new(0.6, 0.8)).length() < 1e-5);
        assert_eq!(p.damage, 8.0);
    }

    #[test]
    fn test_coincident_target_stays_put() {
        let mut p = StandardProjectiles.create(
            Vec2::new(5.0, 5.0),
            Vec2::new(5.0, 5.0),
            ProjectileKind::Orb,
        );
        assert_eq!(p.vel, Vec2::ZERO);
        p.advance();
        assert_eq!(p.pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_leaves_screen() {
        let viewport = Viewport::new(100.0, 100.0);
        let mut p = StandardProjectiles.create(
            Vec2::new(295.0, 50.0),
            Vec2::new(400.0, 50.0),
            ProjectileKind::Laser,
        );
        assert!(!p.is_off_screen(&viewport));
        p.advance();
        assert!(p.is_off_screen(&viewport));
    }

    #[test]
    fn test_shot_from_spawn_edge_survives() {
        let viewport = Viewport::new(800.0, 600.0);
        // Enemies enter 50 units outside an edge
        let mut p = StandardProjectiles.create(
            Vec2::new(-50.0, 300.0),
            Vec2::new(400.0, 300.0),
            ProjectileKind::Laser,
        );
        p.advance();
        assert!(!p.is_off_screen(&viewport));
    }
}
