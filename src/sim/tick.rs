//! Fixed-increment simulation step
//!
//! One call to [`tick`] advances the world by one frame. The phases run in a
//! fixed order, which decides what can happen to an entity twice in a frame:
//!
//! 1. player input (move/turn from held buttons, fire on a tap)
//! 2. periodic enemy spawn
//! 3. bullet vs enemy hits
//! 4. one update pass over every living entity: enemies chase the player and
//!    resolve contact, bullets fly and die off-screen, explosions grow
//! 5. mortality sweep
//! 6. controller frame reset
//!
//! Entities spawned before the update pass (bullets, enemies, hit explosions)
//! take part in it. Explosions spawned during the pass first update next frame.

use glam::Vec2;

use super::collision::{distance, is_on_screen, segments, segments_intersect};
use super::state::{Entity, EntityKind, GameEvent, GamePhase, World};
use crate::controller::{self, Controller};
use crate::heading;

/// Advance the world by one frame, returning what happened
///
/// Consumes the controller's button states and clears its tap flags at the
/// end; callers must not reset the controller themselves.
pub fn tick(world: &mut World, controller: &mut Controller) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if world.phase == GamePhase::GameOver {
        controller.reset_frame();
        return events;
    }

    world.frame += 1;

    apply_player_input(world, controller, &mut events);
    spawn_enemies(world, &mut events);
    resolve_bullet_hits(world, &mut events);
    update_entities(world, &mut events);

    let removed = world.sweep_dead();
    if events
        .iter()
        .any(|e| matches!(e, GameEvent::PlayerKilled { .. }))
    {
        world.phase = GamePhase::GameOver;
        log::info!("Game over at frame {}", world.frame);
    }

    log::trace!(
        "frame {}: {} entities, {} removed, {} events",
        world.frame,
        world.entities().len(),
        removed,
        events.len()
    );

    controller.reset_frame();
    events
}

fn apply_player_input(world: &mut World, controller: &Controller, events: &mut Vec<GameEvent>) {
    let Some(index) = world.player_index() else {
        return;
    };
    let move_speed = world.config.player_move_speed;
    let turn_speed = world.config.player_turn_speed;

    let player = &mut world.entities_mut()[index];
    if controller.is_pressed(controller::UP) {
        player.advance(move_speed);
    }
    if controller.is_pressed(controller::DOWN) {
        player.advance(-move_speed);
    }
    if controller.is_pressed(controller::LEFT) {
        player.turn(-turn_speed);
    }
    if controller.is_pressed(controller::RIGHT) {
        player.turn(turn_speed);
    }

    if controller.is_tapped(controller::SHOOT) {
        let (center, direction) = (player.center(), player.direction);
        let id = world.spawn_bullet(center, direction);
        log::debug!("Bullet {id} fired from {center} heading {direction:.3}");
        events.push(GameEvent::BulletFired { id });
    }
}

fn spawn_enemies(world: &mut World, events: &mut Vec<GameEvent>) {
    let interval = world.config.enemy_spawn_interval;
    if interval == 0 || world.frame % u64::from(interval) != 0 {
        return;
    }
    let position = world.random_edge_point();
    let id = world.spawn_enemy(position);
    log::info!("Enemy {id} spawned at {position}");
    events.push(GameEvent::EnemySpawned { id, position });
}

/// Each bullet's next-step path against the leading edge of every enemy
///
/// Only the first rotated edge (`segments(..)[0]`) of an enemy is tested. A
/// bullet stops at the first enemy it hits.
fn resolve_bullet_hits(world: &mut World, events: &mut Vec<GameEvent>) {
    let (bullets, enemies): (Vec<usize>, Vec<usize>) = {
        let entities = world.entities();
        let alive_where = |pred: fn(&Entity) -> bool| -> Vec<usize> {
            entities
                .iter()
                .enumerate()
                .filter(|(_, e)| e.alive && pred(e))
                .map(|(i, _)| i)
                .collect()
        };
        (alive_where(Entity::is_bullet), alive_where(Entity::is_enemy))
    };
    let damage_range = world.config.bullet_damage;

    for bi in bullets {
        let bullet = &world.entities()[bi];
        let EntityKind::Bullet { velocity } = bullet.kind else {
            continue;
        };
        let start = bullet.center();
        let end = start + heading(bullet.direction) * velocity;

        for &ei in &enemies {
            let enemy = &world.entities()[ei];
            if !enemy.alive {
                continue;
            }
            let (q0, q1) = segments(&enemy.rect, enemy.direction)[0];
            if !segments_intersect(start, end, q0, q1) {
                continue;
            }

            let damage = damage_range.roll(world.rng());
            let entities = world.entities_mut();
            let (bullet_id, enemy_id) = (entities[bi].id, entities[ei].id);
            entities[bi].alive = false;
            let killed = entities[ei].apply_damage(damage);

            log::debug!("Bullet {bullet_id} hit enemy {enemy_id} for {damage}");
            events.push(GameEvent::BulletHit {
                bullet: bullet_id,
                enemy: enemy_id,
                damage,
            });
            if killed {
                log::info!("Enemy {enemy_id} destroyed");
                events.push(GameEvent::EnemyKilled { id: enemy_id });
            }
            spawn_explosion(world, start, events);
            break;
        }
    }
}

fn update_entities(world: &mut World, events: &mut Vec<GameEvent>) {
    let player = world
        .player_index()
        .map(|i| (i, world.entities()[i].rect.origin));
    let screen = world.config.screen;

    // Spawns during the pass land past `count` and are not visited
    let count = world.entities().len();
    for i in 0..count {
        let entity = &world.entities()[i];
        if !entity.alive {
            continue;
        }
        let kind = entity.kind;
        match kind {
            EntityKind::Enemy { .. } => {
                if let Some((player_index, target)) = player {
                    chase_player(world, i, player_index, target, events);
                }
            }
            EntityKind::Bullet { .. } => {
                let bullet = &mut world.entities_mut()[i];
                bullet.update();
                if !is_on_screen(&bullet.rect, screen) {
                    bullet.alive = false;
                    let (id, center) = (bullet.id, bullet.center());
                    log::debug!("Bullet {id} left the screen at {center}");
                    events.push(GameEvent::BulletOffScreen { id });
                    spawn_explosion(world, center, events);
                }
            }
            EntityKind::Explosion { .. } => world.entities_mut()[i].update(),
            EntityKind::Player { .. } => {}
        }
    }
}

/// Turn enemy `index` toward `target` (the player's origin) and step toward it
/// without overshooting; closing within melee range hits the player
fn chase_player(
    world: &mut World,
    index: usize,
    player_index: usize,
    target: Vec2,
    events: &mut Vec<GameEvent>,
) {
    let speed = world.config.enemy_move_speed;
    let melee_range = world.config.melee_range;
    let damage_range = world.config.melee_damage;

    let enemy = &mut world.entities_mut()[index];
    let delta = target - enemy.rect.origin;
    enemy.direction = delta.y.atan2(delta.x);
    enemy.advance(speed.min(delta.length()));

    if distance(enemy.rect.origin, target) >= melee_range {
        return;
    }
    if !world.entities()[player_index].alive {
        return;
    }

    let damage = damage_range.roll(world.rng());
    let entities = world.entities_mut();
    entities[index].alive = false;
    let (enemy_id, center) = (entities[index].id, entities[index].center());
    let player = &mut entities[player_index];
    let player_id = player.id;
    let killed = player.apply_damage(damage);

    log::debug!("Enemy {enemy_id} reached the player for {damage}");
    events.push(GameEvent::PlayerHit {
        enemy: enemy_id,
        damage,
    });
    if killed {
        log::info!("Player {player_id} killed by enemy {enemy_id}");
        events.push(GameEvent::PlayerKilled { id: player_id });
    }
    spawn_explosion(world, center, events);
}

fn spawn_explosion(world: &mut World, position: Vec2, events: &mut Vec<GameEvent>) {
    let id = world.spawn_explosion(position);
    events.push(GameEvent::ExplosionSpawned { id, position });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn quiet_config() -> Config {
        Config {
            enemy_spawn_interval: 0,
            ..Config::default()
        }
    }

    fn world_with_player(direction: f32) -> (World, u32) {
        let mut world = World::empty(quiet_config(), 12345);
        let id = world.spawn_player(Vec2::new(400.0, 300.0), direction);
        (world, id)
    }

    #[test]
    fn test_tick_advances_frame_and_resets_taps() {
        let (mut world, _) = world_with_player(0.0);
        let mut controller = Controller::with_default_bindings();
        controller.on_key_down("f");

        tick(&mut world, &mut controller);
        assert_eq!(world.frame, 1);
        assert!(!controller.is_tapped(controller::SHOOT));
        assert!(controller.is_pressed(controller::SHOOT));
    }

    #[test]
    fn test_held_up_moves_player_forward() {
        let (mut world, id) = world_with_player(-FRAC_PI_2);
        let mut controller = Controller::with_default_bindings();
        controller.on_key_down("ArrowUp");

        for _ in 0..10 {
            tick(&mut world, &mut controller);
        }
        let player = world.entity(id).expect("player alive");
        assert!((player.center() - Vec2::new(400.0, 280.0)).length() < 1e-3);
    }

    #[test]
    fn test_held_right_turns_player() {
        let (mut world, id) = world_with_player(0.0);
        let mut controller = Controller::with_default_bindings();
        controller.on_key_down("d");

        for _ in 0..5 {
            tick(&mut world, &mut controller);
        }
        let player = world.entity(id).expect("player alive");
        assert!((player.direction - 0.3).abs() < 1e-5);
        assert_eq!(player.center(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_holding_fire_shoots_once() {
        let (mut world, _) = world_with_player(0.0);
        let mut controller = Controller::with_default_bindings();
        let mut fired = 0;
        for _ in 0..5 {
            // First press, then key repeat
            controller.on_key_down(" ");
            fired += tick(&mut world, &mut controller)
                .iter()
                .filter(|e| matches!(e, GameEvent::BulletFired { .. }))
                .count();
        }
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_new_bullet_moves_on_spawn_frame() {
        let (mut world, _) = world_with_player(0.0);
        let mut controller = Controller::with_default_bindings();
        controller.on_key_down("f");

        tick(&mut world, &mut controller);
        let bullet = world
            .entities()
            .iter()
            .find(|e| e.is_bullet())
            .expect("bullet spawned");
        let expected = 400.0 + world.config.bullet_speed;
        assert!((bullet.center().x - expected).abs() < 1e-3);
        assert!((bullet.center().y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_periodic_spawn_interval() {
        let config = Config {
            enemy_spawn_interval: 10,
            ..Config::default()
        };
        let mut world = World::empty(config, 5);
        let mut controller = Controller::new();

        for _ in 0..9 {
            assert!(tick(&mut world, &mut controller).is_empty());
        }
        let events = tick(&mut world, &mut controller);
        assert!(matches!(events.as_slice(), [GameEvent::EnemySpawned { .. }]));
        assert_eq!(world.entities().iter().filter(|e| e.is_enemy()).count(), 1);
    }

    #[test]
    fn test_enemy_faces_player_and_clamps_step() {
        let (mut world, _) = world_with_player(0.0);
        let enemy = world.spawn_enemy(Vec2::new(400.5, 300.0));
        let mut controller = Controller::new();

        let events = tick(&mut world, &mut controller);
        // Half a unit away: the clamped step lands exactly on the player
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerHit { .. })));
        assert!(world.entity(enemy).is_none());
    }

    #[test]
    fn test_enemy_heading_points_at_player() {
        let (mut world, _) = world_with_player(0.0);
        let enemy = world.spawn_enemy(Vec2::new(400.0, 100.0));
        let mut controller = Controller::new();

        tick(&mut world, &mut controller);
        let enemy = world.entity(enemy).expect("enemy alive");
        assert!((enemy.direction - FRAC_PI_2).abs() < 1e-5);
        assert!((enemy.center() - Vec2::new(400.0, 101.0)).length() < 1e-3);
    }

    #[test]
    fn test_contact_damage_range() {
        let (mut world, player) = world_with_player(0.0);
        world.spawn_enemy(Vec2::new(400.0, 300.0));
        let mut controller = Controller::new();

        let events = tick(&mut world, &mut controller);
        let damage = events
            .iter()
            .find_map(|e| match e {
                GameEvent::PlayerHit { damage, .. } => Some(*damage),
                _ => None,
            })
            .expect("contact");
        assert!((10..=19).contains(&damage));
        assert_eq!(world.entity(player).and_then(Entity::health), Some(100 - damage));
        assert!(events.iter().any(|e| matches!(e, GameEvent::ExplosionSpawned { .. })));
    }

    #[test]
    fn test_player_death_ends_run() {
        let (mut world, player) = world_with_player(0.0);
        if let Some(p) = world.entity_mut(player) {
            p.kind = EntityKind::Player { health: 5 };
        }
        world.spawn_enemy(Vec2::new(400.0, 300.0));
        let mut controller = Controller::with_default_bindings();

        let events = tick(&mut world, &mut controller);
        assert!(events.contains(&GameEvent::PlayerKilled { id: player }));
        assert_eq!(world.phase, GamePhase::GameOver);
        assert!(world.player().is_none());

        // Frozen: no frame advance, but taps still cleared
        controller.on_key_down("f");
        assert!(tick(&mut world, &mut controller).is_empty());
        assert_eq!(world.frame, 1);
        assert!(!controller.is_tapped(controller::SHOOT));
    }

    #[test]
    fn test_explosion_spawned_in_pass_waits_a_frame() {
        let (mut world, _) = world_with_player(0.0);
        world.spawn_enemy(Vec2::new(400.0, 300.0));
        let mut controller = Controller::new();

        tick(&mut world, &mut controller);
        let explosion = world
            .entities()
            .iter()
            .find(|e| e.is_explosion())
            .expect("contact explosion");
        assert!(matches!(explosion.kind, EntityKind::Explosion { radius, .. } if radius == 1.0));
    }

    #[test]
    fn test_hit_uses_only_leading_edge() {
        // Enemy facing east: its first edge is the vertical right side, which
        // the intersection test never reports, so a bullet crossing it is
        // not a hit.
        let mut world = World::empty(quiet_config(), 3);
        let enemy = world.spawn_enemy(Vec2::new(300.0, 300.0));
        let bullet = world.spawn_bullet(Vec2::new(305.0, 300.5), 0.0);
        let mut controller = Controller::new();

        let events = tick(&mut world, &mut controller);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::BulletHit { .. })));
        assert!(world.entity(bullet).is_some());
        assert_eq!(world.entity(enemy).and_then(Entity::health), Some(100));
    }

    #[test]
    fn test_bullet_hits_at_most_one_enemy() {
        let mut world = World::empty(quiet_config(), 8);
        // Two enemies stacked on the same spot, both facing the bullet
        let a = world.spawn_enemy(Vec2::new(320.0, 320.0));
        let b = world.spawn_enemy(Vec2::new(320.0, 320.0));
        for id in [a, b] {
            if let Some(e) = world.entity_mut(id) {
                e.direction = -3.0 * PI / 4.0;
            }
        }
        world.spawn_bullet(Vec2::new(300.0, 300.0), PI / 4.0);
        let mut controller = Controller::new();

        let events = tick(&mut world, &mut controller);
        let hits: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::BulletHit { enemy, .. } => Some(*enemy),
                _ => None,
            })
            .collect();
        assert_eq!(hits, vec![a]);
        assert_eq!(world.entity(b).and_then(Entity::health), Some(100));
    }

    #[test]
    fn test_determinism() {
        // Two worlds with the same seed and inputs stay identical
        let config = Config {
            enemy_spawn_interval: 20,
            ..Config::default()
        };
        let mut world1 = World::new(config.clone(), 99999);
        let mut world2 = World::new(config, 99999);
        let mut c1 = Controller::with_default_bindings();
        let mut c2 = Controller::with_default_bindings();

        for frame in 0..300u32 {
            for c in [&mut c1, &mut c2] {
                if frame % 7 == 0 {
                    c.on_key_down("f");
                } else {
                    c.on_key_up("f");
                }
                if frame % 50 == 0 {
                    c.on_key_down("ArrowRight");
                } else if frame % 50 == 25 {
                    c.on_key_up("ArrowRight");
                }
            }
            let e1 = tick(&mut world1, &mut c1);
            let e2 = tick(&mut world2, &mut c2);
            assert_eq!(e1, e2);
        }
        assert_eq!(world1.frame, world2.frame);
        assert_eq!(world1.entities(), world2.entities());
    }
}
