//! Enemy spawning, AI and combat
//!
//! Enemies enter 50 units outside a random screen edge, then each tick they
//! move by behavior, shoot on cooldown, soak field damage and trade contact
//! damage with the player. Defeated enemies award a quarter of their max
//! health as experience and sometimes drop healing loot.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Frame;
use super::particle::{Particle, create_loot_particle};
use super::player::Player;
use super::projectile::{Projectile, ProjectileFactory};
use crate::color::Color;
use crate::config::{Behavior, EnemyType, EnemyTypeTable, FaceGlyph, GameConfig};
use crate::consts::*;
use crate::{Viewport, rand_between, unit_toward};

/// Type keys that always spawn elite
const BOSS_KEYS: [&str; 2] = ["boss", "finalBoss"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    /// Last applied velocity (precomputed for cross-screen enemies)
    pub vel: Vec2,
    pub base_speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// Contact damage dealt to the player
    pub damage: f32,
    pub radius: f32,
    pub color: Color,
    pub face: Option<String>,
    pub elite: bool,
    /// Key into the config's enemy type table
    pub type_key: String,
    /// Ticks until the next shot
    pub shoot_timer: u32,
    /// Ticks until collision damage can land again
    pub collision_timer: u32,
}

impl Enemy {
    /// Remaining health as a fraction of max, for health bars
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).max(0.0)
        } else {
            0.0
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// Events produced by one `update_enemies` call
#[derive(Debug, Clone, Default)]
pub struct EnemyTickReport {
    /// Healing drops to merge into the particle sequence
    pub loot: Vec<Particle>,
    /// Experience from enemies defeated this tick
    pub experience: f32,
    pub defeated: u32,
    /// Enemies removed for leaving the screen
    pub despawned: u32,
    pub shots_fired: u32,
}

/// Spawn an enemy of the given type, or `None` if the type is unknown
pub fn spawn_enemy<R: Rng + ?Sized>(
    type_key: &str,
    config: &GameConfig,
    viewport: &Viewport,
    rng: &mut R,
) -> Option<Enemy> {
    let Some(ty) = config.enemy_type(type_key) else {
        log::debug!("Unknown enemy type `{}`, skipping spawn", type_key);
        return None;
    };
    let system = &config.enemy_system;

    let mut health = ty.health_override().unwrap_or(
        system.base_health + config.wave.number as f32 * system.health_increase_per_level,
    );
    let mut damage = ty.damage_override().unwrap_or(system.base_damage);
    let mut base_speed = ty.speed_override().unwrap_or(system.base_speed);

    let elite = BOSS_KEYS.contains(&type_key) || rng.random::<f32>() < ELITE_CHANCE;
    if elite {
        health *= ELITE_HEALTH_MULT;
        damage *= ELITE_DAMAGE_MULT;
        base_speed *= ELITE_SPEED_MULT;
        log::debug!("Elite `{}` spawned with {} health", type_key, health);
    }

    let pos = edge_spawn_point(viewport, rng);
    let face = match &ty.face {
        Some(FaceGlyph::One(glyph)) => Some(glyph.clone()),
        Some(FaceGlyph::Set(glyphs)) if !glyphs.is_empty() => {
            Some(glyphs[rng.random_range(0..glyphs.len())].clone())
        }
        _ => None,
    };

    let vel = if ty.behavior == Behavior::CrossScreen {
        let target = viewport.random_point(rng);
        let (dir, _) = unit_toward(pos, target);
        dir * base_speed
    } else {
        Vec2::ZERO
    };

    Some(Enemy {
        pos,
        vel,
        base_speed,
        health,
        max_health: health,
        damage,
        radius: ty.size_override().unwrap_or(system.base_size),
        color: if elite {
            Color::gold()
        } else {
            ty.color.clone().unwrap_or_default()
        },
        face,
        elite,
        type_key: type_key.to_string(),
        shoot_timer: ty.shoot_cooldown().unwrap_or(0),
        collision_timer: 0,
    })
}

/// Spawn an enemy of a type drawn by spawn weight
pub fn spawn_random_enemy<R: Rng + ?Sized>(
    config: &GameConfig,
    viewport: &Viewport,
    rng: &mut R,
) -> Option<Enemy> {
    let table = &config.enemy_system.types;
    let total: f32 = table.iter().map(|(_, ty)| ty.chance.max(0.0)).sum();
    let roll = rng.random::<f32>() * total;
    let key = pick_weighted_key(table, roll)?;
    spawn_enemy(key, config, viewport, rng)
}

/// Walk the cumulative weights and return the key `roll` lands in
///
/// Ties resolve by table order. A zero total, or a roll past every weight,
/// falls back to the first key.
pub fn pick_weighted_key(table: &EnemyTypeTable, mut roll: f32) -> Option<&str> {
    for (key, ty) in table.iter() {
        let chance = ty.chance.max(0.0);
        if roll < chance {
            return Some(key);
        }
        roll -= chance;
    }
    table.first_key()
}

/// Point 50 units outside a uniformly chosen screen edge
fn edge_spawn_point<R: Rng + ?Sized>(viewport: &Viewport, rng: &mut R) -> Vec2 {
    let (w, h) = (viewport.width, viewport.height);
    match rng.random_range(0..4u8) {
        0 => Vec2::new(-SPAWN_EDGE_OFFSET, rand_between(rng, 0.0, h)),
        1 => Vec2::new(w + SPAWN_EDGE_OFFSET, rand_between(rng, 0.0, h)),
        2 => Vec2::new(rand_between(rng, 0.0, w), -SPAWN_EDGE_OFFSET),
        _ => Vec2::new(rand_between(rng, 0.0, w), h + SPAWN_EDGE_OFFSET),
    }
}

/// Advance all enemies by one tick
///
/// Surviving enemies stay in `enemies` in their original order; new shots
/// are appended to `projectiles`.
pub fn update_enemies<R: Rng + ?Sized>(
    enemies: &mut Vec<Enemy>,
    player: &mut Player,
    projectiles: &mut Vec<Projectile>,
    config: &GameConfig,
    factory: &dyn ProjectileFactory,
    frame: Frame,
    rng: &mut R,
) -> EnemyTickReport {
    let fallback = EnemyType::default();
    let mut report = EnemyTickReport::default();

    enemies.retain_mut(|enemy| {
        let ty = config.enemy_type(&enemy.type_key).unwrap_or_else(|| {
            log::debug!("No type `{}`, using default behavior", enemy.type_key);
            &fallback
        });

        if enemy.collision_timer > 0 {
            enemy.collision_timer -= 1;
        }

        let mut on_screen = advance(enemy, ty, player, &frame.viewport);

        if shoot(enemy, ty, player, projectiles, factory) {
            report.shots_fired += 1;
        }

        let dist = enemy.pos.distance(player.pos);
        if player.mode.drains_enemies() && !ty.ignores_attraction && dist < player.radius {
            enemy.health -= player.attraction_dps() * (frame.dt_ms / 1000.0);
        }

        if dist < enemy.radius + player.size {
            resolve_contact(enemy, ty, player, config.enemy_system.collision_cooldown);
        }

        // Leash applies to every behavior
        if !frame.viewport.contains_with_margin(enemy.pos, LEASH_MARGIN) {
            on_screen = false;
        }

        if enemy.is_dead() {
            report.defeated += 1;
            report.experience += enemy.max_health * XP_PER_MAX_HEALTH;
            if rng.random::<f32>() < LOOT_CHANCE {
                report.loot.push(create_loot_particle(enemy.pos, &mut *rng));
            }
            return false;
        }
        if !on_screen {
            report.despawned += 1;
        }
        on_screen
    });

    report
}

/// Move by behavior; returns false once a cross-screen enemy has left
fn advance(enemy: &mut Enemy, ty: &EnemyType, player: &Player, viewport: &Viewport) -> bool {
    match ty.behavior {
        Behavior::CrossScreen => {
            enemy.pos += enemy.vel;
            viewport.contains_with_margin(enemy.pos, CROSS_SCREEN_MARGIN)
        }
        Behavior::Static => true,
        Behavior::SeekPlayer => {
            let (dir, dist) = unit_toward(enemy.pos, player.pos);
            let holding = ty.preferred_distance().is_some_and(|pref| dist < pref);
            enemy.vel = if holding {
                Vec2::ZERO
            } else {
                dir * enemy.base_speed
            };
            enemy.pos += enemy.vel;
            true
        }
    }
}

/// Count down and fire at the player when ready; returns true on a shot
fn shoot(
    enemy: &mut Enemy,
    ty: &EnemyType,
    player: &Player,
    projectiles: &mut Vec<Projectile>,
    factory: &dyn ProjectileFactory,
) -> bool {
    if enemy.shoot_timer > 0 {
        enemy.shoot_timer -= 1;
    }
    let Some(cooldown) = ty.shoot_cooldown() else {
        return false;
    };
    if enemy.shoot_timer > 0 {
        return false;
    }
    projectiles.push(factory.create(enemy.pos, player.pos, ty.projectile_type));
    enemy.shoot_timer = cooldown;
    true
}

/// Trade contact damage, each side throttled by its own timer
fn resolve_contact(enemy: &mut Enemy, ty: &EnemyType, player: &mut Player, collision_cooldown: u32) {
    if !player.is_invincible() {
        player.health -= enemy.damage;
        player.invincible_timer = player.invincibility_cooldown;
    }

    if !ty.ignores_collision && enemy.collision_timer == 0 {
        enemy.health -= player.collision_damage;
        enemy.collision_timer = collision_cooldown;
    }
}
