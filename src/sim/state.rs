//! Entities and the world that owns them
//!
//! The world is the only mutator of its entities. Spawns append to the
//! collection and dead entities are removed by a single sweep per step.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::{Rect, Size};
use crate::config::Config;
use crate::{heading, normalize_angle};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// The player died
    GameOver,
}

/// Per-kind entity data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Player { health: u32 },
    /// Travels `velocity` units per step along its direction
    Bullet { velocity: f32 },
    Enemy { health: u32 },
    /// Cosmetic; `radius` grows by `growth` each step until past `max_radius`
    Explosion {
        radius: f32,
        growth: f32,
        max_radius: f32,
    },
}

/// A simulated entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub rect: Rect,
    /// Facing (radians, 0 = east, y grows downward)
    pub direction: f32,
    pub alive: bool,
    pub kind: EntityKind,
}

impl Entity {
    fn new(id: u32, rect: Rect, direction: f32, kind: EntityKind) -> Self {
        debug_assert!(
            !rect.size.is_degenerate(),
            "entity {id} spawned with degenerate size {:?}",
            rect.size
        );
        Self {
            id,
            rect,
            direction,
            alive: true,
            kind,
        }
    }

    pub fn player(id: u32, center: Vec2, size: Size, direction: f32, health: u32) -> Self {
        Self::new(
            id,
            Rect::from_center(center, size),
            direction,
            EntityKind::Player { health },
        )
    }

    pub fn bullet(id: u32, center: Vec2, size: Size, direction: f32, velocity: f32) -> Self {
        Self::new(
            id,
            Rect::from_center(center, size),
            direction,
            EntityKind::Bullet { velocity },
        )
    }

    pub fn enemy(id: u32, center: Vec2, size: Size, health: u32) -> Self {
        Self::new(
            id,
            Rect::from_center(center, size),
            0.0,
            EntityKind::Enemy { health },
        )
    }

    pub fn explosion(id: u32, center: Vec2, radius: f32, growth: f32, max_radius: f32) -> Self {
        Self::new(
            id,
            Rect::from_center(center, Size::square(radius * 2.0)),
            0.0,
            EntityKind::Explosion {
                radius,
                growth,
                max_radius,
            },
        )
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player { .. })
    }

    pub fn is_bullet(&self) -> bool {
        matches!(self.kind, EntityKind::Bullet { .. })
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, EntityKind::Enemy { .. })
    }

    pub fn is_explosion(&self) -> bool {
        matches!(self.kind, EntityKind::Explosion { .. })
    }

    /// Rotate by `delta` radians
    pub fn turn(&mut self, delta: f32) {
        self.direction = normalize_angle(self.direction + delta);
    }

    /// Move `distance` units along the current direction
    pub fn advance(&mut self, distance: f32) {
        self.rect.origin += heading(self.direction) * distance;
    }

    /// Health of players and enemies
    pub fn health(&self) -> Option<u32> {
        match self.kind {
            EntityKind::Player { health } | EntityKind::Enemy { health } => Some(health),
            _ => None,
        }
    }

    /// Subtract `amount` health, clamping at 0. Reaching 0 kills the entity.
    ///
    /// Returns true if this call killed it. Entities without health ignore damage.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        let (EntityKind::Player { health } | EntityKind::Enemy { health }) = &mut self.kind else {
            return false;
        };
        *health = health.saturating_sub(amount);
        if *health == 0 && self.alive {
            self.alive = false;
            return true;
        }
        false
    }

    /// Kind-specific self update: bullets fly forward, explosions grow
    pub fn update(&mut self) {
        match &mut self.kind {
            EntityKind::Bullet { velocity } => {
                let velocity = *velocity;
                self.advance(velocity);
            }
            EntityKind::Explosion {
                radius,
                growth,
                max_radius,
            } => {
                *radius *= *growth;
                let (radius, max_radius) = (*radius, *max_radius);
                self.rect.resize_centered(Size::square(radius * 2.0));
                if radius > max_radius {
                    self.alive = false;
                }
            }
            EntityKind::Player { .. } | EntityKind::Enemy { .. } => {}
        }
    }
}

/// Things that happened during one step, for sound/log hooks in the driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BulletFired { id: u32 },
    EnemySpawned { id: u32, position: Vec2 },
    BulletHit { bullet: u32, enemy: u32, damage: u32 },
    EnemyKilled { id: u32 },
    PlayerHit { enemy: u32, damage: u32 },
    PlayerKilled { id: u32 },
    BulletOffScreen { id: u32 },
    ExplosionSpawned { id: u32, position: Vec2 },
}

/// Serializable view of the world for renderers and tooling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub frame: u64,
    pub phase: GamePhase,
    pub entities: Vec<Entity>,
}

/// All simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub config: Config,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Steps simulated so far
    pub frame: u64,
    pub phase: GamePhase,
    rng: Pcg32,
    /// Live entities in spawn order
    entities: Vec<Entity>,
    next_id: u32,
}

impl World {
    /// A world with no entities
    pub fn empty(config: Config, seed: u64) -> Self {
        Self {
            config,
            seed,
            frame: 0,
            phase: GamePhase::Playing,
            rng: Pcg32::seed_from_u64(seed),
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// A fresh run: the player centered on screen, facing north
    pub fn new(config: Config, seed: u64) -> Self {
        let mut world = Self::empty(config, seed);
        let center = world.config.screen_center();
        world.spawn_player(center, -std::f32::consts::FRAC_PI_2);
        log::info!("New world with seed {seed}");
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, entity: Entity) -> u32 {
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    pub fn spawn_player(&mut self, center: Vec2, direction: f32) -> u32 {
        let id = self.next_entity_id();
        let entity = Entity::player(id, center, self.config.tile, direction, self.config.max_health);
        self.push(entity)
    }

    pub fn spawn_enemy(&mut self, center: Vec2) -> u32 {
        let id = self.next_entity_id();
        let entity = Entity::enemy(id, center, self.config.tile, self.config.max_health);
        self.push(entity)
    }

    pub fn spawn_bullet(&mut self, center: Vec2, direction: f32) -> u32 {
        let id = self.next_entity_id();
        let entity = Entity::bullet(
            id,
            center,
            self.config.bullet_size,
            direction,
            self.config.bullet_speed,
        );
        self.push(entity)
    }

    pub fn spawn_explosion(&mut self, center: Vec2) -> u32 {
        let id = self.next_entity_id();
        let entity = Entity::explosion(
            id,
            center,
            self.config.explosion_min_radius,
            self.config.explosion_growth,
            self.config.explosion_max_radius,
        );
        self.push(entity)
    }

    /// Live entities, in spawn order (which is also draw order)
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub(crate) fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Index of the first living player
    pub fn player_index(&self) -> Option<usize> {
        self.entities.iter().position(|e| e.is_player() && e.alive)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player_index().map(|i| &self.entities[i])
    }

    /// Uniform integer in `[0, n)`; 0 for `n == 0`
    pub fn random_int(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.random_range(0..n)
    }

    /// Shared RNG, for rolls that need a `Rng`
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// A uniform point on one of the four screen edges (edge chosen uniformly)
    pub fn random_edge_point(&mut self) -> Vec2 {
        // A hand-built config can skip validation; collapse bad sides to 0
        let (w, h) = (self.config.screen.w.max(0.0), self.config.screen.h.max(0.0));
        let edge = self.random_int(4);
        match edge {
            0 => Vec2::new(self.rng.random_range(0.0..=w), 0.0),
            1 => Vec2::new(w, self.rng.random_range(0.0..=h)),
            2 => Vec2::new(self.rng.random_range(0.0..=w), h),
            _ => Vec2::new(0.0, self.rng.random_range(0.0..=h)),
        }
    }

    /// Remove every dead entity, keeping survivors in order
    pub fn sweep_dead(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| e.alive);
        before - self.entities.len()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            frame: self.frame,
            phase: self.phase,
            entities: self.entities.clone(),
        }
    }
}
