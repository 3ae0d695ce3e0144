//! Game tuning
//!
//! Every section deserializes with defaults, so a config document only has to
//! name the values it overrides.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::spell::{BANISH_SPELL, Direction, SHIELD_SPELL};

/// Shortest enemy spawn interval a config may ask for
pub const MIN_SPAWN_INTERVAL_SECS: f32 = 0.1;

/// World extents, centered on the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Collider size (diameter)
    pub size: f32,
    /// Distance covered per frame by a movement spell
    pub move_speed: f32,
    /// Last frame index on which a movement spell still moves
    pub move_duration: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            move_speed: 20.0,
            move_duration: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Per-frame easing step, also the size of the deadband
    pub move_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { move_speed: 10.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleConfig {
    pub size: f32,
    pub min_count: u32,
    /// Inclusive
    pub max_count: u32,
}

impl Default for CollectibleConfig {
    fn default() -> Self {
        Self {
            size: 10.0,
            min_count: 3,
            max_count: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub size: f32,
    /// Distance travelled along the heading each frame
    pub speed: f32,
    /// Width of the random per-frame rotation perturbation (radians)
    pub rotation_change: f32,
    /// Collectibles closer than this pull the enemy's heading
    pub activation_radius: f32,
    /// Inward push applied after touching a world border
    pub border_evasion_speed: f32,
    pub min_count: u32,
    /// Inclusive
    pub max_count: u32,
    /// Wall-clock seconds between periodic spawns
    pub spawn_interval_secs: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            speed: 2.0,
            rotation_change: 0.3,
            activation_radius: 100.0,
            border_evasion_speed: 5.0,
            min_count: 1,
            max_count: 3,
            spawn_interval_secs: 10.0,
        }
    }
}

/// A spell whose behavior is supplied by the host's script evaluator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedSpellConfig {
    pub name: String,
    pub durability: u32,
    /// Opaque source handed to the evaluator
    pub script: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellConfig {
    /// Movement spells registered at startup, in registry order
    pub directions: Vec<Direction>,
    /// Frames a shield keeps the player protected
    pub protection_frames: u32,
    /// Charges granted by a shield pickup
    pub shield_charges: u32,
    /// Charges granted by a banish pickup
    pub banish_charges: u32,
    pub scripted: Vec<ScriptedSpellConfig>,
}

impl Default for SpellConfig {
    fn default() -> Self {
        Self {
            directions: Direction::ALL.to_vec(),
            protection_frames: 120,
            shield_charges: 1,
            banish_charges: 1,
            scripted: Vec::new(),
        }
    }
}

/// Key identifiers (as reported by the browser) for the control keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub confirm: String,
    pub cancel: String,
    pub delete: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            confirm: "Enter".into(),
            cancel: "Escape".into(),
            delete: "Backspace".into(),
        }
    }
}

/// Complete game tuning
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub camera: CameraConfig,
    pub collectibles: CollectibleConfig,
    pub enemies: EnemyConfig,
    pub spells: SpellConfig,
    pub keys: KeyConfig,
}

impl GameConfig {
    /// Parse and validate a JSON config document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world.width", self.world.width)?;
        positive("world.height", self.world.height)?;
        positive("player.size", self.player.size)?;
        positive("collectibles.size", self.collectibles.size)?;
        positive("enemies.size", self.enemies.size)?;

        at_least("player.move_speed", self.player.move_speed, 0.0)?;
        at_least("camera.move_speed", self.camera.move_speed, 0.0)?;
        at_least("enemies.speed", self.enemies.speed, 0.0)?;
        at_least("enemies.rotation_change", self.enemies.rotation_change, 0.0)?;
        at_least("enemies.activation_radius", self.enemies.activation_radius, 0.0)?;
        at_least(
            "enemies.border_evasion_speed",
            self.enemies.border_evasion_speed,
            0.0,
        )?;
        at_least(
            "enemies.spawn_interval_secs",
            self.enemies.spawn_interval_secs,
            MIN_SPAWN_INTERVAL_SECS,
        )?;

        ordered(
            "collectibles",
            self.collectibles.min_count,
            self.collectibles.max_count,
        )?;
        ordered("enemies", self.enemies.min_count, self.enemies.max_count)?;

        let mut names: Vec<String> = self
            .spells
            .directions
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        names.push(SHIELD_SPELL.to_string());
        names.push(BANISH_SPELL.to_string());
        names.sort();
        if let Some(pair) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(ConfigError::DuplicateSpell(pair[0].clone()));
        }

        for spell in &self.spells.scripted {
            if spell.name.is_empty() || !spell.name.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ConfigError::InvalidSpellName(spell.name.clone()));
            }
            let name = spell.name.to_ascii_lowercase();
            if names.contains(&name) {
                return Err(ConfigError::DuplicateSpell(name));
            }
            names.push(name);
        }

        Ok(())
    }

    pub fn half_extents(&self) -> glam::Vec2 {
        glam::Vec2::new(self.world.width / 2.0, self.world.height / 2.0)
    }
}

fn finite(what: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { what, value })
    }
}

fn positive(what: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(what, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { what, value })
    }
}

fn at_least(what: &'static str, value: f32, min: f32) -> Result<(), ConfigError> {
    finite(what, value)?;
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::BelowMinimum { what, value, min })
    }
}

fn ordered(what: &'static str, min: u32, max: u32) -> Result<(), ConfigError> {
    if min > max {
        Err(ConfigError::InvertedRange { what, min, max })
    } else {
        Ok(())
    }
}
