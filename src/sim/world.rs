//! Simulation world
//!
//! Owns every entity sequence plus the seeded RNG and runs one tick of
//! the enemy and particle subsystems in a fixed order.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::Frame;
use super::enemy::{Enemy, spawn_enemy, spawn_random_enemy, update_enemies};
use super::particle::{Particle, create_heal_particle, create_particle_explosion};
use super::player::Player;
use super::pool::{ParticlePool, auto_respawn_particles};
use super::projectile::{Projectile, ProjectileFactory};
use super::swarm::update_particles;
use crate::Viewport;
use crate::audio::SoundSink;
use crate::config::GameConfig;

/// Summary of one `World::step`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Experience from absorbed particles and defeated enemies
    pub experience: f32,
    pub absorbed: u32,
    pub defeated: u32,
    pub despawned: u32,
    pub shots_fired: u32,
    /// Projectiles that reached the player
    pub projectile_hits: u32,
    pub hostile_hits: u32,
    /// Loot particles dropped this tick
    pub loot_dropped: usize,
    pub respawned: usize,
    pub powerup_collected: bool,
}

#[derive(Debug)]
pub struct World {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub projectiles: Vec<Projectile>,
    pub pool: ParticlePool,
    /// Resume point for the amortized particle update
    pub cursor: usize,
    /// Total experience earned so far
    pub experience: f32,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
}

impl World {
    /// Empty world with the player centered in `viewport`
    pub fn new(seed: u64, viewport: &Viewport) -> Self {
        Self {
            player: Player::new(viewport.center()),
            enemies: Vec::new(),
            particles: Vec::new(),
            projectiles: Vec::new(),
            pool: ParticlePool::new(),
            cursor: 0,
            experience: 0.0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Scatter `count` ambient particles away from the player
    pub fn populate(&mut self, count: usize, viewport: &Viewport) {
        self.particles.reserve(count);
        for _ in 0..count {
            let p = self
                .pool
                .acquire(Some(&self.player), None, viewport, &mut self.rng);
            self.particles.push(p);
        }
    }

    /// Add an enemy of the given type; false if the type is unknown
    pub fn spawn_enemy(&mut self, type_key: &str, config: &GameConfig, viewport: &Viewport) -> bool {
        match spawn_enemy(type_key, config, viewport, &mut self.rng) {
            Some(enemy) => {
                self.enemies.push(enemy);
                true
            }
            None => false,
        }
    }

    /// Add an enemy drawn from the weighted type table
    pub fn spawn_random_enemy(&mut self, config: &GameConfig, viewport: &Viewport) -> bool {
        match spawn_random_enemy(config, viewport, &mut self.rng) {
            Some(enemy) => {
                self.enemies.push(enemy);
                true
            }
            None => false,
        }
    }

    pub fn drop_heal(&mut self, at: Vec2) {
        let p = create_heal_particle(at, &mut self.rng);
        self.particles.push(p);
    }

    /// Burst of hostile particles, e.g. a boss attack
    pub fn explode(&mut self, center: Vec2) {
        create_particle_explosion(center, &mut self.particles, &mut self.rng);
    }

    /// Advance the simulation by one tick
    ///
    /// Order: invincibility countdown, enemies, loot merge, projectiles,
    /// particles, respawn top-up.
    pub fn step(
        &mut self,
        dt_ms: f32,
        config: &GameConfig,
        viewport: &Viewport,
        factory: &dyn ProjectileFactory,
        sound: &mut dyn SoundSink,
    ) -> StepReport {
        let frame = Frame::new(dt_ms, *viewport);
        let mut report = StepReport::default();

        self.player.tick_invincibility();

        let enemy_report = update_enemies(
            &mut self.enemies,
            &mut self.player,
            &mut self.projectiles,
            config,
            factory,
            frame,
            &mut self.rng,
        );
        report.experience += enemy_report.experience;
        report.defeated = enemy_report.defeated;
        report.despawned = enemy_report.despawned;
        report.shots_fired = enemy_report.shots_fired;
        report.loot_dropped = enemy_report.loot.len();
        self.particles.extend(enemy_report.loot);

        report.projectile_hits = self.advance_projectiles(viewport);

        let particle_report = update_particles(
            &mut self.particles,
            &mut self.player,
            &mut self.pool,
            self.cursor,
            frame,
            sound,
        );
        self.cursor = particle_report.cursor;
        report.experience += particle_report.experience as f32;
        report.absorbed = particle_report.absorbed;
        report.hostile_hits = particle_report.hostile_hits;
        report.powerup_collected = particle_report.powerup_collected;

        report.respawned = auto_respawn_particles(
            &mut self.particles,
            &self.player,
            &mut self.pool,
            &config.particle_respawn,
            viewport,
            &mut self.rng,
            sound,
        );

        self.experience += report.experience;
        if report.defeated > 0 || report.powerup_collected {
            log::debug!(
                "Step: {} defeated, {} absorbed, powerup {}",
                report.defeated,
                report.absorbed,
                report.powerup_collected
            );
        }
        report
    }

    /// Move projectiles, apply hits on the player and cull spent ones
    fn advance_projectiles(&mut self, viewport: &Viewport) -> u32 {
        let player = &mut self.player;
        let mut hits = 0;
        self.projectiles.retain_mut(|shot| {
            shot.advance();
            if shot.pos.distance(player.pos) < player.size + shot.size {
                if !player.is_invincible() {
                    player.health -= shot.damage;
                    player.invincible_timer = player.invincibility_cooldown;
                }
                hits += 1;
                return false;
            }
            !shot.is_off_screen(viewport)
        });
        hits
    }
}
