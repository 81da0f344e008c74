//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame increments only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{
    Segment, bounding_box, distance, is_on_screen, rotated_corners, segment_intersection,
    segments, segments_intersect,
};
pub use rect::{Rect, Size};
pub use state::{Entity, EntityKind, GameEvent, GamePhase, World, WorldSnapshot};
pub use tick::tick;
