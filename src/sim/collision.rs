//! Axis-aligned bounding box collision
//!
//! Every pairwise check in the game (projectile vs enemy, projectile vs ship,
//! enemy body vs ship) goes through [`is_colliding`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Arena;

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from a top-left position and a size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Anything with a collision box
pub trait Bounds {
    fn bounds(&self) -> Rect;
}

impl Bounds for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Strict AABB overlap test. Rectangles that only share an edge do not collide.
#[inline]
pub fn is_colliding(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Convenience wrapper over [`is_colliding`] for entity types
#[inline]
pub fn collides<A: Bounds + ?Sized, B: Bounds + ?Sized>(a: &A, b: &B) -> bool {
    is_colliding(&a.bounds(), &b.bounds())
}

/// True once the bottom edge reaches the arena's defense line
#[inline]
pub fn crossed_defense_line(rect: &Rect, arena: &Arena) -> bool {
    rect.bottom() >= arena.defense_line()
}
