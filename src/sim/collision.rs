//! Collision geometry for rotated rectangles
//!
//! Entities are axis-aligned rects plus a facing direction. For collision the
//! rect is rotated about its center by re-projecting each corner at the
//! circumscribing radius, and its edges are tested with a slope/intercept
//! line intersection.
//!
//! The intersection test is deliberately approximate: vertical segments and
//! parallel (including collinear) segments never report a hit. Gameplay
//! outcomes depend on this, so it must stay as-is.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::Vec2;

use super::rect::{Rect, Size};
use crate::polar_to_cartesian;

/// A line segment between two points
pub type Segment = (Vec2, Vec2);

/// Euclidean distance between two points
#[inline]
pub fn distance(p: Vec2, q: Vec2) -> f32 {
    p.distance(q)
}

/// The four corners of `rect` rotated by `direction` about its center
///
/// Corner `k` lies at angle `direction - π/4 + k·π/2` from the center, at the
/// distance the unrotated corners have from it. With `direction == 0` this is
/// top-right, bottom-right, bottom-left, top-left (screen coordinates).
pub fn rotated_corners(rect: &Rect, direction: f32) -> [Vec2; 4] {
    let center = rect.center();
    let radius = distance(center, rect.origin);
    std::array::from_fn(|k| {
        let theta = direction - FRAC_PI_4 + k as f32 * FRAC_PI_2;
        center + polar_to_cartesian(radius, theta)
    })
}

/// The four edges of the rotated rect, as consecutive corner pairs
pub fn segments(rect: &Rect, direction: f32) -> [Segment; 4] {
    let corners = rotated_corners(rect, direction);
    std::array::from_fn(|k| (corners[k], corners[(k + 1) % 4]))
}

/// Axis-aligned envelope of a set of corners
pub fn bounding_box(corners: &[Vec2; 4]) -> Rect {
    let min = corners.iter().copied().fold(Vec2::splat(f32::INFINITY), Vec2::min);
    let max = corners
        .iter()
        .copied()
        .fold(Vec2::splat(f32::NEG_INFINITY), Vec2::max);
    Rect {
        origin: min,
        size: Size::new(max.x - min.x, max.y - min.y),
    }
}

/// Intersection point of two segments, using slope/intercept form
///
/// Returns `None` when the x-extents don't overlap, when either segment is
/// vertical, or when the slopes are equal.
pub fn segment_intersection(p0: Vec2, p1: Vec2, q0: Vec2, q1: Vec2) -> Option<Vec2> {
    let (p_min, p_max) = (p0.x.min(p1.x), p0.x.max(p1.x));
    let (q_min, q_max) = (q0.x.min(q1.x), q0.x.max(q1.x));

    // Fast reject
    if p_max < q_min || q_max < p_min {
        return None;
    }

    let p_dx = p1.x - p0.x;
    let q_dx = q1.x - q0.x;
    if p_dx == 0.0 || q_dx == 0.0 {
        return None;
    }

    let m1 = (p1.y - p0.y) / p_dx;
    let m2 = (q1.y - q0.y) / q_dx;
    if m1 == m2 {
        return None;
    }

    let b1 = p0.y - m1 * p0.x;
    let b2 = q0.y - m2 * q0.x;
    let x = (b2 - b1) / (m1 - m2);

    let in_p = x >= p_min && x <= p_max;
    let in_q = x >= q_min && x <= q_max;
    (in_p && in_q).then(|| Vec2::new(x, m1 * x + b1))
}

/// Whether two segments intersect (see [`segment_intersection`])
#[inline]
pub fn segments_intersect(p0: Vec2, p1: Vec2, q0: Vec2, q1: Vec2) -> bool {
    segment_intersection(p0, p1, q0, q1).is_some()
}

/// Whether any part of `rect` overlaps the screen `[0, w) x [0, h)`
pub fn is_on_screen(rect: &Rect, screen: Size) -> bool {
    let max = rect.max();
    max.x >= 0.0 && max.y >= 0.0 && rect.x() < screen.w && rect.y() < screen.h
}
