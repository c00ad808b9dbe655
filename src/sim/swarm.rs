//! Amortized particle update
//!
//! Each call advances at most `MAX_UPDATES_PER_FRAME` surviving particles,
//! starting at a rotating cursor, so a large swarm costs a flat amount per
//! frame. Removed particles are tombstoned during the pass and compacted
//! afterwards, keeping sequence order.

use super::Frame;
use super::particle::{Particle, Special};
use super::player::{FieldMode, Player};
use super::pool::ParticlePool;
use crate::audio::{SoundEvent, SoundSink};
use crate::consts::*;
use crate::{Viewport, unit_toward};

/// Outcome of one `update_particles` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticleTickReport {
    pub experience: u32,
    pub absorbed: u32,
    /// Where the next call should resume
    pub cursor: usize,
    pub powerup_collected: bool,
    /// Hostile particles that struck the player
    pub hostile_hits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fate {
    Keep,
    Remove,
}

/// Update a window of particles starting at `cursor`
///
/// Absorbed ambient particles go back to `pool`; expired hostile particles
/// are dropped. The returned cursor indexes the first particle this call
/// did not reach, in the compacted sequence.
pub fn update_particles(
    particles: &mut Vec<Particle>,
    player: &mut Player,
    pool: &mut ParticlePool,
    cursor: usize,
    frame: Frame,
    sound: &mut dyn SoundSink,
) -> ParticleTickReport {
    let mut report = ParticleTickReport::default();
    let len = particles.len();
    if len == 0 {
        return report;
    }

    let budget = MAX_UPDATES_PER_FRAME.min(len);
    let start = cursor % len;
    let scale = frame.time_scale();

    let mut removed = vec![false; len];
    let mut kept = 0;
    let mut visited = 0;
    while kept < budget && visited < len {
        let idx = (start + visited) % len;
        visited += 1;

        let p = &mut particles[idx];
        let fate = if p.hostile {
            step_hostile(p, player, &mut report, sound)
        } else {
            step_ambient(p, player, scale, &frame.viewport, &mut report, sound)
        };
        match fate {
            Fate::Keep => kept += 1,
            Fate::Remove => removed[idx] = true,
        }
    }

    let next = (start + visited) % len;
    let shift = removed[..next].iter().filter(|r| **r).count();
    compact(particles, &removed, pool);

    report.cursor = if particles.is_empty() {
        0
    } else {
        (next - shift) % particles.len()
    };
    report
}

/// Drop tombstoned particles, preserving the order of the rest
fn compact(particles: &mut Vec<Particle>, removed: &[bool], pool: &mut ParticlePool) {
    if !removed.contains(&true) {
        return;
    }
    let mut write = 0;
    for read in 0..particles.len() {
        if !removed[read] {
            particles.swap(write, read);
            write += 1;
        }
    }
    for p in particles.drain(write..) {
        pool.release(p);
    }
}

fn step_hostile(
    p: &mut Particle,
    player: &mut Player,
    report: &mut ParticleTickReport,
    sound: &mut dyn SoundSink,
) -> Fate {
    p.pos += p.vel;
    p.lifespan = p.lifespan.saturating_sub(1);

    if p.pos.distance(player.pos) < player.size + p.size {
        player.health -= HOSTILE_HIT_DAMAGE;
        sound.notify(SoundEvent::Hit);
        report.hostile_hits += 1;
        p.lifespan = 0;
    }

    if p.lifespan == 0 {
        Fate::Remove
    } else {
        Fate::Keep
    }
}

fn step_ambient(
    p: &mut Particle,
    player: &mut Player,
    scale: f32,
    viewport: &Viewport,
    report: &mut ParticleTickReport,
    sound: &mut dyn SoundSink,
) -> Fate {
    if p.size > p.target_size() {
        p.size -= SHRINK_RATE;
    }

    let reach = player.effective_radius();
    if p.pos.distance_squared(player.pos) < reach * reach {
        let (inward, dist) = unit_toward(p.pos, player.pos);
        // Falloff uses the nominal radius even when powered up
        let falloff = (1.0 - dist / player.radius) * scale;

        match player.mode {
            FieldMode::Attract => {
                p.vel *= ATTRACT_DAMPING;
                p.vel += (inward * RADIAL_FORCE + inward.perp() * TANGENTIAL_FORCE) * falloff;

                if dist < reach * SUCTION_FRACTION && dist < player.size * ABSORB_SIZE_FRACTION {
                    absorb(p, player, report, sound);
                    return Fate::Remove;
                }
            }
            FieldMode::Repel => {
                p.vel -= inward * REPEL_FORCE * falloff;
            }
            FieldMode::Neutral | FieldMode::Vortex => {}
        }
    }

    p.pos += p.vel * scale;
    if p.pos.x < 0.0 || p.pos.x > viewport.width {
        p.vel.x *= -BOUNCE_DAMPING;
    }
    if p.pos.y < 0.0 || p.pos.y > viewport.height {
        p.vel.y *= -BOUNCE_DAMPING;
    }
    p.record_trail();
    Fate::Keep
}

fn absorb(
    p: &Particle,
    player: &mut Player,
    report: &mut ParticleTickReport,
    sound: &mut dyn SoundSink,
) {
    if p.special == Some(Special::Powerup) {
        report.powerup_collected = true;
    } else if p.heals_on_absorb {
        player.heal(p.heal_amount);
        sound.notify(SoundEvent::LevelUp);
    }
    report.experience += p.absorb_xp();
    report.absorbed += 1;
    sound.notify(SoundEvent::Absorb);
}
