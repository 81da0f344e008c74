//! Arcade Shooter - a top-down arena shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic per-frame simulation (entities, collisions, world step)
//! - `controller`: Named buttons with held/tapped state and key bindings
//! - `config`: Data-driven game tuning
//! - `render`: Renderer-facing draw list built from the live entities

pub mod config;
pub mod controller;
pub mod render;
pub mod sim;

pub use config::{Config, ConfigError, DamageRange};
pub use controller::{Button, Controller};

use glam::Vec2;

/// Game configuration constants (defaults for [`Config`])
pub mod consts {
    /// The golden ratio, used for bullet speed and explosion growth
    pub const PHI: f32 = 1.618_034;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Player/enemy tile size
    pub const TILE_SIZE: f32 = 32.0;

    /// Player movement per step while up/down is held
    pub const PLAYER_MOVE_SPEED: f32 = 2.0;
    /// Player rotation per step while left/right is held (radians)
    pub const PLAYER_TURN_SPEED: f32 = 0.06;

    /// Bullet travel per step
    pub const BULLET_SPEED: f32 = 10.0 * PHI;
    pub const BULLET_SIZE: f32 = 4.0;

    /// Enemy travel per step toward the player
    pub const ENEMY_MOVE_SPEED: f32 = 1.0;
    /// Frames between periodic enemy spawns
    pub const ENEMY_SPAWN_INTERVAL: u32 = 100;
    /// Enemy-to-player distance that counts as contact
    pub const MELEE_RANGE: f32 = 1.0;

    /// Explosion radius multiplier per step
    pub const EXPLOSION_GROWTH: f32 = PHI;
    pub const EXPLOSION_MIN_RADIUS: f32 = 1.0;
    pub const EXPLOSION_MAX_RADIUS: f32 = 128.0;

    /// Bullet damage is BASE + randomInt(SPREAD)
    pub const BULLET_DAMAGE_BASE: u32 = 45;
    pub const BULLET_DAMAGE_SPREAD: u32 = 10;
    /// Contact damage is BASE + randomInt(SPREAD)
    pub const MELEE_DAMAGE_BASE: u32 = 10;
    pub const MELEE_DAMAGE_SPREAD: u32 = 10;

    pub const MAX_HEALTH: u32 = 100;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `direction` (radians, y grows downward)
#[inline]
pub fn heading(direction: f32) -> Vec2 {
    Vec2::new(direction.cos(), direction.sin())
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    heading(theta) * r
}
