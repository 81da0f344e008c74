//! Axis-aligned rectangle geometry
//!
//! A rect is stored as origin (top-left, y grows downward) plus size. The
//! center is always derived, so `center == origin + size / 2` cannot drift.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Size {
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    pub const fn square(side: f32) -> Self {
        Self { w: side, h: side }
    }

    #[inline]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// True when either side is zero, negative or NaN
    pub fn is_degenerate(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Size::new(w, h),
        }
    }

    /// Build a rect of `size` whose center sits at `center`
    pub fn from_center(center: Vec2, size: Size) -> Self {
        Self {
            origin: center - size.as_vec2() / 2.0,
            size,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.size.w
    }

    #[inline]
    pub fn h(&self) -> f32 {
        self.size.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size.as_vec2() / 2.0
    }

    /// Move the rect so its center sits at `center`
    pub fn set_center(&mut self, center: Vec2) {
        self.origin = center - self.size.as_vec2() / 2.0;
    }

    /// Resize around the current center
    pub fn resize_centered(&mut self, size: Size) {
        let center = self.center();
        self.size = size;
        self.set_center(center);
    }

    /// Largest x/y corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size.as_vec2()
    }
}
