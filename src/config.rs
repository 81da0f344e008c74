//! Game tuning
//!
//! Every constant the simulation uses, gathered in one serde struct so a
//! driver can load overrides from JSON. Missing fields fall back to the
//! defaults in [`crate::consts`].

use std::fmt;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Size;

/// Damage rolled as `base + randomInt(spread)`, i.e. in `[base, base + spread)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRange {
    pub base: u32,
    pub spread: u32,
}

impl DamageRange {
    pub const fn new(base: u32, spread: u32) -> Self {
        Self { base, spread }
    }

    /// Draw one damage value from the shared RNG
    pub fn roll(&self, rng: &mut impl Rng) -> u32 {
        if self.spread == 0 {
            return self.base;
        }
        self.base + rng.random_range(0..self.spread)
    }

    /// Smallest and largest value `roll` can return
    pub fn bounds(&self) -> (u32, u32) {
        (self.base, self.base + self.spread.saturating_sub(1))
    }
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Playfield size; bullets outside it die
    pub screen: Size,
    /// Player and enemy size
    pub tile: Size,

    pub player_move_speed: f32,
    /// Radians per step
    pub player_turn_speed: f32,

    pub bullet_speed: f32,
    pub bullet_size: Size,

    pub enemy_move_speed: f32,
    /// Frames between enemy spawns (0 disables periodic spawning)
    pub enemy_spawn_interval: u32,
    /// Enemy-to-player distance that counts as contact
    pub melee_range: f32,

    pub explosion_growth: f32,
    pub explosion_min_radius: f32,
    pub explosion_max_radius: f32,

    pub bullet_damage: DamageRange,
    pub melee_damage: DamageRange,

    /// Starting (and maximum) health of players and enemies
    pub max_health: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen: Size::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            tile: Size::square(TILE_SIZE),

            player_move_speed: PLAYER_MOVE_SPEED,
            player_turn_speed: PLAYER_TURN_SPEED,

            bullet_speed: BULLET_SPEED,
            bullet_size: Size::square(BULLET_SIZE),

            enemy_move_speed: ENEMY_MOVE_SPEED,
            enemy_spawn_interval: ENEMY_SPAWN_INTERVAL,
            melee_range: MELEE_RANGE,

            explosion_growth: EXPLOSION_GROWTH,
            explosion_min_radius: EXPLOSION_MIN_RADIUS,
            explosion_max_radius: EXPLOSION_MAX_RADIUS,

            bullet_damage: DamageRange::new(BULLET_DAMAGE_BASE, BULLET_DAMAGE_SPREAD),
            melee_damage: DamageRange::new(MELEE_DAMAGE_BASE, MELEE_DAMAGE_SPREAD),

            max_health: MAX_HEALTH,
        }
    }
}

/// Failure to read, parse or accept a config file
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// Parsed, but a value the simulation cannot run with
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "invalid config: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl Config {
    /// Parse a (possibly partial) JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes that would break spawning or edge sampling
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, size) in [
            ("screen", self.screen),
            ("tile", self.tile),
            ("bullet_size", self.bullet_size),
        ] {
            if size.is_degenerate() {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {}x{}",
                    size.w, size.h
                )));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load a config file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using default config");
                Self::default()
            }
        }
    }

    /// Center of the playfield
    pub fn screen_center(&self) -> glam::Vec2 {
        self.screen.as_vec2() / 2.0
    }
}
