//! Reference drawing of simulation entities
//!
//! Rendering goes through the `DrawSurface` trait so the simulation never
//! touches a canvas directly. Colors are CSS strings.

use glam::Vec2;

use crate::sim::{Enemy, Particle, Special};

const HEALTH_BAR_HEIGHT: f32 = 4.0;
const HEALTH_BAR_OFFSET: f32 = 10.0;
const FACE_FONT_SCALE: f32 = 1.5;

/// Minimal 2D drawing surface (a canvas context, a test recorder, ...)
pub trait DrawSurface {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: &str);
    /// Text centered on `at`
    fn fill_text(&mut self, text: &str, at: Vec2, font_px: f32);
}

/// Bodies, faces and health bars
pub fn draw_enemies(surface: &mut dyn DrawSurface, enemies: &[Enemy]) {
    for enemy in enemies {
        surface.fill_circle(enemy.pos, enemy.radius, &enemy.color.css());

        if let Some(face) = &enemy.face {
            surface.fill_text(face, enemy.pos, enemy.radius * FACE_FONT_SCALE);
        }

        let width = enemy.radius * 2.0;
        let x = enemy.pos.x - enemy.radius;
        let y = enemy.pos.y - enemy.radius - HEALTH_BAR_OFFSET;
        surface.fill_rect(x, y, width, HEALTH_BAR_HEIGHT, "red");
        surface.fill_rect(
            x,
            y,
            width * enemy.health_fraction(),
            HEALTH_BAR_HEIGHT,
            "lime",
        );
    }
}

/// Trails oldest to newest, then the particle itself
pub fn draw_particles(surface: &mut dyn DrawSurface, particles: &[Particle]) {
    for p in particles {
        let len = p.trail.len() as f32;
        for (i, point) in p.trail.iter().enumerate() {
            let alpha = i as f32 / len;
            surface.fill_circle(point.pos, point.size * alpha, &p.color.css_with_alpha(alpha));
        }

        let color = p.color.css();
        if p.special == Some(Special::Heal) {
            let s = p.size;
            surface.fill_rect(p.pos.x - s, p.pos.y - s, s * 2.0, s * 2.0, &color);
            // White cross
            surface.fill_rect(p.pos.x - s / 2.0, p.pos.y - s * 1.5, s, s * 3.0, "white");
            surface.fill_rect(p.pos.x - s * 1.5, p.pos.y - s / 2.0, s * 3.0, s, "white");
        } else {
            surface.fill_circle(p.pos, p.size, &color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::sim::particle::{create_heal_particle, create_loot_particle};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Circle(Vec2, f32, String),
        Rect(f32, f32, f32, f32, String),
        Text(String, Vec2, f32),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl DrawSurface for Recorder {
        fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
            self.ops.push(Op::Circle(center, radius, color.to_string()));
        }

        fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: &str) {
            self.ops
                .push(Op::Rect(x, y, width, height, color.to_string()));
        }

        fn fill_text(&mut self, text: &str, at: Vec2, font_px: f32) {
            self.ops.push(Op::Text(text.to_string(), at, font_px));
        }
    }

    fn enemy(health: f32) -> Enemy {
        Enemy {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::ZERO,
            base_speed: 1.0,
            health,
            max_health: 40.0,
            damage: 10.0,
            radius: 20.0,
            color: Color::named("purple"),
            face: Some("x".to_string()),
            elite: false,
            type_key: "basic".to_string(),
            shoot_timer: 0,
            collision_timer: 0,
        }
    }

    #[test]
    fn test_enemy_health_bar() {
        let mut surface = Recorder::default();
        draw_enemies(&mut surface, &[enemy(10.0)]);
        assert_eq!(
            surface.ops,
            vec![
                Op::Circle(Vec2::new(100.0, 100.0), 20.0, "purple".to_string()),
                Op::Text("x".to_string(), Vec2::new(100.0, 100.0), 30.0),
                Op::Rect(80.0, 70.0, 40.0, 4.0, "red".to_string()),
                Op::Rect(80.0, 70.0, 10.0, 4.0, "lime".to_string()),
            ]
        );
    }

    #[test]
    fn test_overkilled_bar_is_empty() {
        let mut surface = Recorder::default();
        let mut faceless = enemy(-15.0);
        faceless.face = None;
        draw_enemies(&mut surface, &[faceless]);
        assert_eq!(surface.ops.len(), 3);
        assert_eq!(surface.ops[2], Op::Rect(80.0, 70.0, 0.0, 4.0, "lime".to_string()));
    }

    #[test]
    fn test_particle_trail_fades_in() {
        let mut p = Particle::new(Vec2::ZERO);
        p.color = Color::hsl(180.0, 80.0, 60.0);
        p.size = 4.0;
        for x in 0..4 {
            p.pos = Vec2::new(x as f32, 0.0);
            p.record_trail();
        }
        let mut surface = Recorder::default();
        draw_particles(&mut surface, &[p]);

        assert_eq!(surface.ops.len(), 5);
        assert_eq!(
            surface.ops[0],
            Op::Circle(Vec2::ZERO, 0.0, "hsla(180, 80%, 60%, 0)".to_string())
        );
        assert_eq!(
            surface.ops[2],
            Op::Circle(Vec2::new(2.0, 0.0), 2.0, "hsla(180, 80%, 60%, 0.5)".to_string())
        );
        assert_eq!(
            surface.ops[4],
            Op::Circle(Vec2::new(3.0, 0.0), 4.0, "hsl(180, 80%, 60%)".to_string())
        );
    }

    #[test]
    fn test_heal_particle_cross() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut heal = create_heal_particle(Vec2::new(50.0, 50.0), &mut rng);
        heal.size = 8.0;
        let mut surface = Recorder::default();
        draw_particles(&mut surface, &[heal]);

        assert_eq!(
            surface.ops,
            vec![
                Op::Rect(42.0, 42.0, 16.0, 16.0, "lightgreen".to_string()),
                Op::Rect(46.0, 38.0, 8.0, 24.0, "white".to_string()),
                Op::Rect(38.0, 46.0, 24.0, 8.0, "white".to_string()),
            ]
        );
    }

    #[test]
    fn test_loot_draws_as_circle() {
        let mut rng = Pcg32::seed_from_u64(2);
        let loot = create_loot_particle(Vec2::new(50.0, 50.0), &mut rng);
        let mut surface = Recorder::default();
        draw_particles(&mut surface, &[loot]);

        assert_eq!(
            surface.ops,
            vec![Op::Circle(Vec2::new(50.0, 50.0), 7.0, "lightgreen".to_string())]
        );
    }
}
