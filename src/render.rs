//! Draw list for an external renderer
//!
//! The simulation never draws. A renderer asks for [`draw_list`] once per
//! frame and paints each command in order (spawn order is draw order).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::heading;
use crate::sim::{Entity, EntityKind, Rect, World, rotated_corners};

/// Colors for game elements
pub mod colors {
    pub const PLAYER: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const PLAYER_HEADING: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const ENEMY: [f32; 4] = [0.2, 0.9, 0.3, 1.0];
    pub const BULLET: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const EXPLOSION: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const HEALTH_FILL: [f32; 4] = [0.1, 0.9, 0.1, 1.0];
    pub const HEALTH_EMPTY: [f32; 4] = [0.6, 0.0, 0.0, 1.0];
}

/// Height of the health bar and its gap above the entity
const HEALTH_BAR_HEIGHT: f32 = 4.0;
const HEALTH_BAR_GAP: f32 = 4.0;

/// One primitive to paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Closed outline through the rotated corners
    Outline { corners: [Vec2; 4], color: [f32; 4] },
    /// Line from `from` to `to`
    Line {
        from: Vec2,
        to: Vec2,
        color: [f32; 4],
    },
    FilledCircle {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    FilledRect { rect: Rect, color: [f32; 4] },
}

/// Generate the shapes for one entity
pub fn entity_shapes(entity: &Entity, max_health: u32) -> Vec<Shape> {
    let mut shapes = Vec::with_capacity(4);
    match entity.kind {
        EntityKind::Player { .. } => {
            shapes.push(Shape::Outline {
                corners: rotated_corners(&entity.rect, entity.direction),
                color: colors::PLAYER,
            });
            // Heading marker, one tile width long
            let center = entity.center();
            shapes.push(Shape::Line {
                from: center,
                to: center + heading(entity.direction) * entity.rect.w(),
                color: colors::PLAYER_HEADING,
            });
        }
        EntityKind::Enemy { .. } => shapes.push(Shape::Outline {
            corners: rotated_corners(&entity.rect, entity.direction),
            color: colors::ENEMY,
        }),
        EntityKind::Bullet { .. } => shapes.push(Shape::FilledCircle {
            center: entity.center(),
            radius: entity.rect.w() / 2.0,
            color: colors::BULLET,
        }),
        EntityKind::Explosion { radius, .. } => shapes.push(Shape::FilledCircle {
            center: entity.center(),
            radius,
            color: colors::EXPLOSION,
        }),
    }
    shapes.extend(health_bar(entity, max_health));
    shapes
}

/// Background plus filled part of a health bar above damaged entities
fn health_bar(entity: &Entity, max_health: u32) -> Vec<Shape> {
    let Some(health) = entity.health() else {
        return Vec::new();
    };
    if health >= max_health || max_health == 0 {
        return Vec::new();
    }

    let fraction = health as f32 / max_health as f32;
    let rect = &entity.rect;
    let y = rect.y() - HEALTH_BAR_GAP - HEALTH_BAR_HEIGHT;
    vec![
        Shape::FilledRect {
            rect: Rect::new(rect.x(), y, rect.w(), HEALTH_BAR_HEIGHT),
            color: colors::HEALTH_EMPTY,
        },
        Shape::FilledRect {
            rect: Rect::new(rect.x(), y, rect.w() * fraction, HEALTH_BAR_HEIGHT),
            color: colors::HEALTH_FILL,
        },
    ]
}

/// Every shape for the current frame, in draw order
pub fn draw_list(world: &World) -> Vec<Shape> {
    world
        .entities()
        .iter()
        .flat_map(|e| entity_shapes(e, world.config.max_health))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::Size;

    #[test]
    fn test_player_has_outline_and_heading() {
        let player = Entity::player(1, Vec2::new(100.0, 100.0), Size::square(32.0), 0.0, 100);
        let shapes = entity_shapes(&player, 100);
        assert_eq!(shapes.len(), 2);
        assert!(matches!(shapes[0], Shape::Outline { .. }));
        match shapes[1] {
            Shape::Line { from, to, .. } => {
                assert_eq!(from, Vec2::new(100.0, 100.0));
                assert!((to - Vec2::new(132.0, 100.0)).length() < 1e-4);
            }
            ref other => panic!("expected heading line, got {other:?}"),
        }
    }

    #[test]
    fn test_health_bar_only_when_damaged() {
        let mut enemy = Entity::enemy(1, Vec2::new(50.0, 50.0), Size::square(32.0), 100);
        assert_eq!(entity_shapes(&enemy, 100).len(), 1);

        enemy.apply_damage(25);
        let shapes = entity_shapes(&enemy, 100);
        assert_eq!(shapes.len(), 3);
        match shapes[2] {
            Shape::FilledRect { rect, .. } => assert!((rect.w() - 24.0).abs() < 1e-4),
            ref other => panic!("expected health fill, got {other:?}"),
        }
    }

    #[test]
    fn test_explosion_is_circle_of_its_radius() {
        let explosion = Entity::explosion(1, Vec2::new(10.0, 10.0), 3.0, 2.0, 64.0);
        let shapes = entity_shapes(&explosion, 100);
        assert_eq!(
            shapes,
            vec![Shape::FilledCircle {
                center: Vec2::new(10.0, 10.0),
                radius: 3.0,
                color: colors::EXPLOSION,
            }]
        );
    }

    #[test]
    fn test_draw_list_follows_spawn_order() {
        let mut world = World::new(Config::default(), 1);
        world.spawn_bullet(Vec2::new(10.0, 10.0), 0.0);
        let shapes = draw_list(&world);
        assert_eq!(shapes.len(), 3);
        assert!(matches!(shapes[2], Shape::FilledCircle { .. }));
    }
}
