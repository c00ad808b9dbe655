//! Particle pool
//!
//! Free-list of retired particle records. Acquire pops-or-constructs,
//! release pushes back. Only ambient (non-hostile, poolable) particles are
//! accepted back.

use glam::Vec2;
use rand::Rng;

use super::particle::{Particle, create_particle};
use super::player::Player;
use crate::Viewport;
use crate::audio::{SoundEvent, SoundSink};
use crate::config::ParticleRespawnConfig;
use crate::consts::{DEFAULT_TARGET_SIZE, SPAWN_ATTEMPTS, SPAWN_PADDING};

#[derive(Debug, Default)]
pub struct ParticlePool {
    free: Vec<Particle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Return a particle for reuse; returns false if it was dropped instead
    pub fn release(&mut self, particle: Particle) -> bool {
        if particle.hostile || !particle.poolable {
            return false;
        }
        self.free.push(particle);
        true
    }

    /// Take a particle for `at`, or for a random on-screen point
    ///
    /// Random points are resampled until they sit at least `SPAWN_PADDING`
    /// from the player on some axis. A caller-supplied point is used as-is.
    pub fn acquire<R: Rng + ?Sized>(
        &mut self,
        player: Option<&Player>,
        at: Option<Vec2>,
        viewport: &Viewport,
        rng: &mut R,
    ) -> Particle {
        let pos = match at {
            Some(pos) => pos,
            None => sample_spawn_point(player, viewport, rng),
        };

        match self.free.pop() {
            Some(mut particle) => {
                particle.reset_ambient(pos, rng);
                particle
            }
            None => create_particle(pos, rng),
        }
    }
}

fn too_close(pos: Vec2, player: &Player) -> bool {
    (pos.x - player.pos.x).abs() < SPAWN_PADDING && (pos.y - player.pos.y).abs() < SPAWN_PADDING
}

fn sample_spawn_point<R: Rng + ?Sized>(
    player: Option<&Player>,
    viewport: &Viewport,
    rng: &mut R,
) -> Vec2 {
    let mut pos = viewport.random_point(rng);
    let Some(player) = player else {
        return pos;
    };
    for _ in 1..SPAWN_ATTEMPTS {
        if !too_close(pos, player) {
            break;
        }
        pos = viewport.random_point(rng);
    }
    pos
}

/// Top up ambient particles when the live count drops below the floor
///
/// Returns the number of particles injected.
pub fn auto_respawn_particles<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    player: &Player,
    pool: &mut ParticlePool,
    settings: &ParticleRespawnConfig,
    viewport: &Viewport,
    rng: &mut R,
    sound: &mut dyn SoundSink,
) -> usize {
    if particles.len() >= settings.min_particles {
        return 0;
    }

    particles.reserve(settings.respawn_amount);
    for _ in 0..settings.respawn_amount {
        let mut p = pool.acquire(Some(player), None, viewport, rng);
        p.size = DEFAULT_TARGET_SIZE;
        p.target_size = Some(p.size);
        particles.push(p);
    }
    log::debug!(
        "Respawned {} particles (pool left: {})",
        settings.respawn_amount,
        pool.len()
    );
    sound.notify(SoundEvent::Respawn);
    settings.respawn_amount
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundLog;
    use crate::sim::particle::{Special, create_heal_particle, create_particle_explosion};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 720.0)
    }

    #[test]
    fn test_acquire_respects_padding() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut pool = ParticlePool::new();
        let player = Player::new(Vec2::new(640.0, 360.0));
        for _ in 0..500 {
            let p = pool.acquire(Some(&player), None, &viewport(), &mut rng);
            assert!(!too_close(p.pos, &player), "spawned at {:?}", p.pos);
        }
    }

    #[test]
    fn test_fixed_position_is_kept() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut pool = ParticlePool::new();
        let player = Player::new(Vec2::new(100.0, 100.0));
        // Inside the padding, but caller-supplied points are never resampled
        let p = pool.acquire(Some(&player), Some(Vec2::new(110.0, 90.0)), &viewport(), &mut rng);
        assert_eq!(p.pos, Vec2::new(110.0, 90.0));
    }

    #[test]
    fn test_tiny_viewport_terminates() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut pool = ParticlePool::new();
        let player = Player::new(Vec2::new(50.0, 50.0));
        let p = pool.acquire(Some(&player), None, &Viewport::new(100.0, 100.0), &mut rng);
        assert!(Viewport::new(100.0, 100.0).contains_with_margin(p.pos, 0.0));
    }

    #[test]
    fn test_release_rejects_hostile_and_heal() {
        let mut rng = Pcg32::seed_from_u64(14);
        let mut pool = ParticlePool::new();
        let mut burst = Vec::new();
        create_particle_explosion(Vec2::ZERO, &mut burst, &mut rng);
        assert!(!pool.release(burst.remove(0)));
        assert!(!pool.release(create_heal_particle(Vec2::ZERO, &mut rng)));
        assert!(pool.release(Particle::new(Vec2::ZERO)));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_reuse_pops_pool() {
        let mut rng = Pcg32::seed_from_u64(15);
        let mut pool = ParticlePool::new();
        pool.release(Particle::new(Vec2::ZERO));
        pool.release(Particle::new(Vec2::ZERO));
        let _ = pool.acquire(None, None, &viewport(), &mut rng);
        assert_eq!(pool.len(), 1);
        let _ = pool.acquire(None, None, &viewport(), &mut rng);
        let _ = pool.acquire(None, None, &viewport(), &mut rng);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_auto_respawn() {
        let mut rng = Pcg32::seed_from_u64(16);
        let mut pool = ParticlePool::new();
        let mut sound = SoundLog::new();
        let player = Player::new(Vec2::new(640.0, 360.0));
        let settings = ParticleRespawnConfig {
            min_particles: 10,
            respawn_amount: 4,
        };
        let mut particles: Vec<Particle> = (0..9).map(|_| Particle::new(Vec2::ZERO)).collect();

        let added = auto_respawn_particles(
            &mut particles, &player, &mut pool, &settings, &viewport(), &mut rng, &mut sound,
        );
        assert_eq!(added, 4);
        assert_eq!(particles.len(), 13);
        for p in &particles[9..] {
            assert_eq!(p.size, 3.0);
            assert_eq!(p.target_size, Some(3.0));
        }
        assert_eq!(sound.count(SoundEvent::Respawn), 1);

        // At or above the floor nothing happens
        let added = auto_respawn_particles(
            &mut particles, &player, &mut pool, &settings, &viewport(), &mut rng, &mut sound,
        );
        assert_eq!(added, 0);
        assert_eq!(sound.count(SoundEvent::Respawn), 1);
    }

    proptest! {
        #[test]
        fn prop_reacquired_particle_has_no_stale_state(
            seed in any::<u64>(),
            lifespan in 0u32..500,
            trail_len in 0usize..5,
            heal in 0.0f32..50.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut pool = ParticlePool::new();

            let mut used = Particle::new(Vec2::new(1.0, 1.0));
            used.vel = Vec2::new(99.0, -99.0);
            used.size = 42.0;
            used.target_size = Some(40.0);
            used.xp_value = Some(50);
            used.special = Some(Special::Powerup);
            used.heal_amount = heal;
            used.heals_on_absorb = true;
            used.lifespan = lifespan;
            for _ in 0..trail_len {
                used.record_trail();
            }
            prop_assert!(pool.release(used));

            let p = pool.acquire(None, None, &viewport(), &mut rng);
            prop_assert!(pool.is_empty());
            prop_assert!(p.trail.is_empty());
            prop_assert!((2.0..6.0).contains(&p.size));
            prop_assert!(p.vel.x.abs() <= 1.5 && p.vel.y.abs() <= 1.5);
            prop_assert_eq!(p.target_size, None);
            prop_assert_eq!(p.xp_value, None);
            prop_assert_eq!(p.special, None);
            prop_assert_eq!(p.heal_amount, 0.0);
            prop_assert!(!p.heals_on_absorb);
            prop_assert_eq!(p.lifespan, 0);
            prop_assert!(!p.hostile);
        }
    }
}
