//! Game configuration
//!
//! Enemy type tables, base stats, wave number and particle respawn
//! thresholds. Read-only to the simulation. Loaded from JSON, optionally
//! overridden from LocalStorage on the web.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::color::Color;
use crate::sim::projectile::ProjectileKind;

/// Failure to accept a configuration document
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("enemy type `{key}` has invalid spawn chance {chance}")]
    InvalidChance { key: String, chance: f32 },
    #[error("config value `{field}` is out of range: {value}")]
    InvalidStat { field: String, value: f32 },
}

/// How an enemy moves each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Behavior {
    /// Walk toward the player (optionally holding a standoff distance)
    #[default]
    SeekPlayer,
    /// Never moves
    Static,
    /// Flies a straight line chosen at spawn and leaves the screen
    CrossScreen,
}

/// A single face glyph, or a set to pick from at spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FaceGlyph {
    One(String),
    Set(Vec<String>),
}

/// Definition of one enemy type
///
/// Stat overrides of zero count as unset and fall back to the
/// config-wide base values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnemyType {
    pub behavior: Behavior,
    pub health: Option<f32>,
    pub damage: Option<f32>,
    pub speed: Option<f32>,
    pub size: Option<f32>,
    pub color: Option<Color>,
    pub face: Option<FaceGlyph>,
    /// Ticks between shots
    pub shoot_cooldown: Option<u32>,
    pub projectile_type: ProjectileKind,
    /// Seekers stop advancing once closer than this
    pub preferred_distance: Option<f32>,
    pub ignores_attraction: bool,
    pub ignores_collision: bool,
    /// Spawn weight for random selection
    pub chance: f32,
}

fn set(value: Option<f32>) -> Option<f32> {
    value.filter(|v| *v != 0.0)
}

impl EnemyType {
    pub fn health_override(&self) -> Option<f32> {
        set(self.health)
    }

    pub fn damage_override(&self) -> Option<f32> {
        set(self.damage)
    }

    pub fn speed_override(&self) -> Option<f32> {
        set(self.speed)
    }

    pub fn size_override(&self) -> Option<f32> {
        set(self.size)
    }

    pub fn shoot_cooldown(&self) -> Option<u32> {
        self.shoot_cooldown.filter(|c| *c > 0)
    }

    pub fn preferred_distance(&self) -> Option<f32> {
        set(self.preferred_distance)
    }
}

/// Enemy types keyed by name, in document order
///
/// Order matters: weighted selection walks the table front to back and
/// falls back to the first key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnemyTypeTable {
    entries: Vec<(String, EnemyType)>,
}

impl EnemyTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a type; replacing keeps the original position
    pub fn insert(&mut self, key: impl Into<String>, ty: EnemyType) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = ty,
            None => self.entries.push((key, ty)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&EnemyType> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, t)| t)
    }

    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnemyType)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for EnemyTypeTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, ty) in &self.entries {
            map.serialize_entry(key, ty)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EnemyTypeTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = EnemyTypeTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of enemy type keys to type definitions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = EnemyTypeTable::new();
                while let Some((key, ty)) = access.next_entry::<String, EnemyType>()? {
                    table.insert(key, ty);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Enemy stats shared by all types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnemySystemConfig {
    pub types: EnemyTypeTable,
    pub base_health: f32,
    pub health_increase_per_level: f32,
    pub base_damage: f32,
    pub base_speed: f32,
    pub base_size: f32,
    /// Ticks between collision hits an enemy can take
    pub collision_cooldown: u32,
}

impl Default for EnemySystemConfig {
    fn default() -> Self {
        Self {
            types: default_enemy_types(),
            base_health: 20.0,
            health_increase_per_level: 5.0,
            base_damage: 10.0,
            base_speed: 1.5,
            base_size: 15.0,
            collision_cooldown: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub number: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self { number: 1 }
    }
}

/// Ambient particle floor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticleRespawnConfig {
    /// Respawn triggers when fewer particles than this are alive
    pub min_particles: usize,
    /// Particles injected per respawn
    pub respawn_amount: usize,
}

impl Default for ParticleRespawnConfig {
    fn default() -> Self {
        Self {
            min_particles: 50,
            respawn_amount: 20,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    pub enemy_system: EnemySystemConfig,
    pub wave: WaveConfig,
    pub particle_respawn: ParticleRespawnConfig,
}

impl GameConfig {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "particle_universe_config";

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject weights and stats the simulation can't use
    pub fn validate(&self) -> Result<(), ConfigError> {
        let system = &self.enemy_system;
        for (key, ty) in system.types.iter() {
            if !ty.chance.is_finite() || ty.chance < 0.0 {
                return Err(ConfigError::InvalidChance {
                    key: key.to_string(),
                    chance: ty.chance,
                });
            }
            let overrides = [
                ("health", ty.health),
                ("damage", ty.damage),
                ("speed", ty.speed),
                ("size", ty.size),
                ("preferredDistance", ty.preferred_distance),
            ];
            for (field, value) in overrides {
                if let Some(value) = value {
                    if !value.is_finite() || value < 0.0 {
                        return Err(ConfigError::InvalidStat {
                            field: format!("{key}.{field}"),
                            value,
                        });
                    }
                }
            }
        }

        let positive = [
            ("baseSpeed", system.base_speed),
            ("baseSize", system.base_size),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidStat {
                    field: field.to_string(),
                    value,
                });
            }
        }
        let non_negative = [
            ("baseHealth", system.base_health),
            ("healthIncreasePerLevel", system.health_increase_per_level),
            ("baseDamage", system.base_damage),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidStat {
                    field: field.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn enemy_type(&self, key: &str) -> Option<&EnemyType> {
        self.enemy_system.types.get(key)
    }

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

fn face_set(glyphs: &[&str]) -> Option<FaceGlyph> {
    Some(FaceGlyph::Set(glyphs.iter().map(|g| g.to_string()).collect()))
}

/// Stock enemy roster
fn default_enemy_types() -> EnemyTypeTable {
    let mut table = EnemyTypeTable::new();
    table.insert(
        "basic",
        EnemyType {
            color: Some(Color::named("red")),
            face: face_set(&["😠", "😡"]),
            chance: 60.0,
            ..Default::default()
        },
    );
    table.insert(
        "fast",
        EnemyType {
            speed: Some(3.0),
            size: Some(10.0),
            health: Some(12.0),
            color: Some(Color::named("orange")),
            face: Some(FaceGlyph::One("😤".to_string())),
            chance: 20.0,
            ..Default::default()
        },
    );
    table.insert(
        "tank",
        EnemyType {
            health: Some(80.0),
            damage: Some(20.0),
            speed: Some(0.8),
            size: Some(25.0),
            color: Some(Color::named("darkred")),
            face: Some(FaceGlyph::One("👹".to_string())),
            chance: 8.0,
            ..Default::default()
        },
    );
    table.insert(
        "hunter",
        EnemyType {
            speed: Some(1.2),
            color: Some(Color::named("purple")),
            face: Some(FaceGlyph::One("🎯".to_string())),
            shoot_cooldown: Some(120),
            projectile_type: ProjectileKind::Bullet,
            preferred_distance: Some(250.0),
            ignores_collision: true,
            chance: 6.0,
            ..Default::default()
        },
    );
    table.insert(
        "comet",
        EnemyType {
            behavior: Behavior::CrossScreen,
            speed: Some(4.0),
            size: Some(12.0),
            color: Some(Color::named("cyan")),
            ignores_attraction: true,
            chance: 4.0,
            ..Default::default()
        },
    );
    table.insert(
        "turret",
        EnemyType {
            behavior: Behavior::Static,
            health: Some(40.0),
            size: Some(18.0),
            color: Some(Color::named("slategray")),
            shoot_cooldown: Some(90),
            projectile_type: ProjectileKind::Laser,
            chance: 2.0,
            ..Default::default()
        },
    );
    table.insert(
        "boss",
        EnemyType {
            health: Some(500.0),
            damage: Some(25.0),
            speed: Some(0.7),
            size: Some(40.0),
            face: Some(FaceGlyph::One("💀".to_string())),
            shoot_cooldown: Some(60),
            projectile_type: ProjectileKind::Orb,
            ..Default::default()
        },
    );
    table.insert(
        "finalBoss",
        EnemyType {
            health: Some(1500.0),
            damage: Some(35.0),
            speed: Some(0.6),
            size: Some(55.0),
            face: Some(FaceGlyph::One("👁️".to_string())),
            shoot_cooldown: Some(40),
            projectile_type: ProjectileKind::Orb,
            ignores_attraction: true,
            ..Default::default()
        },
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.enemy_system.types.first_key(), Some("basic"));
        assert_eq!(config.enemy_type("boss").map(|t| t.chance), Some(0.0));
    }

    #[test]
    fn test_table_keeps_document_order() {
        let json = r#"{
            "enemySystem": {
                "types": {
                    "zeta": { "chance": 1 },
                    "alpha": { "chance": 2, "behavior": "crossScreen" },
                    "mid": { "chance": 3, "face": ["a", "b"] }
                }
            }
        }"#;
        let config = GameConfig::from_json(json).unwrap();
        let keys: Vec<&str> = config.enemy_system.types.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(
            config.enemy_type("alpha").map(|t| t.behavior),
            Some(Behavior::CrossScreen)
        );
        assert_eq!(
            config.enemy_type("mid").and_then(|t| t.face.clone()),
            Some(FaceGlyph::Set(vec!["a".to_string(), "b".to_string()]))
        );
        // Omitted sections fall back to defaults
        assert_eq!(config.wave.number, 1);
        assert_eq!(config.particle_respawn.min_particles, 50);
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let config = GameConfig::default();
        let json = config.to_json().unwrap();
        let back = GameConfig::from_json(&json).unwrap();
        assert_eq!(back.enemy_system.types, config.enemy_system.types);
    }

    #[test]
    fn test_zero_overrides_count_as_unset() {
        let ty = EnemyType {
            health: Some(0.0),
            speed: Some(2.0),
            shoot_cooldown: Some(0),
            preferred_distance: Some(0.0),
            ..Default::default()
        };
        assert_eq!(ty.health_override(), None);
        assert_eq!(ty.speed_override(), Some(2.0));
        assert_eq!(ty.shoot_cooldown(), None);
        assert_eq!(ty.preferred_distance(), None);
    }

    #[test]
    fn test_rejects_negative_chance() {
        let json = r#"{ "enemySystem": { "types": { "bad": { "chance": -1 } } } }"#;
        match GameConfig::from_json(json) {
            Err(ConfigError::InvalidChance { key, .. }) => assert_eq!(key, "bad"),
            other => panic!("expected InvalidChance, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_base_stats() {
        let json = r#"{ "enemySystem": { "baseSpeed": 0 } }"#;
        assert!(matches!(
            GameConfig::from_json(json),
            Err(ConfigError::InvalidStat { .. })
        ));
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut table = EnemyTypeTable::new();
        table.insert("a", EnemyType::default());
        table.insert("b", EnemyType::default());
        table.insert(
            "a",
            EnemyType {
                chance: 5.0,
                ..Default::default()
            },
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.first_key(), Some("a"));
        assert_eq!(table.get("a").map(|t| t.chance), Some(5.0));
    }
}
