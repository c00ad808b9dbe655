//! Particle Universe entry point
//!
//! On the web this exposes a `Simulation` handle to the page script, which
//! drives it from `requestAnimationFrame`. Natively it runs a short headless
//! session and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use glam::Vec2;
    use wasm_bindgen::prelude::*;

    use particle_universe::audio::WebAudio;
    use particle_universe::sim::{FieldMode, StandardProjectiles, World};
    use particle_universe::{GameConfig, Viewport};

    const INITIAL_PARTICLES: usize = 150;

    /// Simulation handle owned by the page script
    #[wasm_bindgen]
    pub struct Simulation {
        world: World,
        config: GameConfig,
        viewport: Viewport,
        audio: WebAudio,
    }

    #[wasm_bindgen]
    impl Simulation {
        #[wasm_bindgen(constructor)]
        pub fn new(width: f32, height: f32) -> Simulation {
            let seed = js_sys::Date::now() as u64;
            let viewport = Viewport::new(width, height);
            let config = GameConfig::load();
            let mut world = World::new(seed, &viewport);
            world.populate(INITIAL_PARTICLES, &viewport);
            log::info!("Simulation started with seed {}", seed);
            Simulation {
                world,
                config,
                viewport,
                audio: WebAudio::new(),
            }
        }

        pub fn resize(&mut self, width: f32, height: f32) {
            self.viewport = Viewport::new(width, height);
        }

        /// Advance one tick; returns experience earned during it
        pub fn step(&mut self, dt_ms: f32) -> f32 {
            let report = self.world.step(
                dt_ms,
                &self.config,
                &self.viewport,
                &StandardProjectiles,
                &mut self.audio,
            );
            if report.powerup_collected {
                self.world.player.powered_up = true;
            }
            report.experience
        }

        pub fn spawn_enemy(&mut self) -> bool {
            self.world.spawn_random_enemy(&self.config, &self.viewport)
        }

        pub fn set_player_position(&mut self, x: f32, y: f32) {
            self.world.player.pos = Vec2::new(x, y);
        }

        /// "attract", "repel" or "vortex"; anything else is neutral
        pub fn set_mode(&mut self, mode: &str) {
            self.world.player.mode = match mode {
                "attract" => FieldMode::Attract,
                "repel" => FieldMode::Repel,
                "vortex" => FieldMode::Vortex,
                _ => FieldMode::Neutral,
            };
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.audio.set_muted(muted);
        }

        pub fn health(&self) -> f32 {
            self.world.player.health
        }

        pub fn experience(&self) -> f32 {
            self.world.experience
        }

        pub fn particle_count(&self) -> usize {
            self.world.particles.len()
        }

        pub fn enemy_count(&self) -> usize {
            self.world.enemies.len()
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Particle Universe starting...");
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use particle_universe::audio::{SoundEvent, SoundLog};
    use particle_universe::sim::{FieldMode, StandardProjectiles, World};
    use particle_universe::{GameConfig, Viewport};

    const SEED: u64 = 42;
    const TICKS: u32 = 1200;
    const SPAWN_EVERY: u32 = 90;

    env_logger::init();
    log::info!("Particle Universe (native) starting headless session...");

    let config = GameConfig::load();
    if let Err(e) = config.validate() {
        log::error!("Invalid config: {}", e);
        return;
    }

    let viewport = Viewport::new(1280.0, 720.0);
    let mut world = World::new(SEED, &viewport);
    world.populate(150, &viewport);
    world.player.mode = FieldMode::Attract;

    let mut sound = SoundLog::new();
    let center = viewport.center();
    for tick in 0..TICKS {
        // Sweep the player around the screen center
        let angle = tick as f32 * 0.01;
        world.player.pos = center + Vec2::new(angle.cos(), angle.sin()) * 200.0;

        if tick % SPAWN_EVERY == 0 {
            world.spawn_random_enemy(&config, &viewport);
        }

        let report = world.step(
            particle_universe::consts::FRAME_MS,
            &config,
            &viewport,
            &StandardProjectiles,
            &mut sound,
        );
        if report.powerup_collected {
            world.player.powered_up = true;
        }
        if tick % 60 == 0 {
            log::info!(
                "tick {}: health {:.0}, xp {:.1}, particles {}, enemies {}",
                tick,
                world.player.health,
                world.experience,
                world.particles.len(),
                world.enemies.len()
            );
        }
        if !world.player.is_alive() {
            log::info!("Player defeated at tick {}", tick);
            break;
        }
    }

    log::info!(
        "Session over: {:.1} xp, {} absorbs, {} hits, {} respawns",
        world.experience,
        sound.count(SoundEvent::Absorb),
        sound.count(SoundEvent::Hit),
        sound.count(SoundEvent::Respawn)
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
