//! Axis-aligned bounding boxes
//!
//! Every collision check in the game is an AABB overlap test, so this is the
//! one geometric primitive the whole resolver is built on.

use glam::Vec2;

/// Axis-aligned bounding box, top-left anchored (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Construct from a center point
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size * 0.5,
            size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Overlap test; touching edges do not count as overlap
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// True once the box has fully left a `(width, height)` playfield
    /// anchored at the origin
    pub fn outside(&self, field: Vec2) -> bool {
        self.right() < 0.0 || self.left() > field.x || self.bottom() < 0.0 || self.top() > field.y
    }

    /// Clamp the box so it stays entirely inside the playfield
    pub fn clamp_to(&mut self, field: Vec2) {
        self.pos.x = self.pos.x.clamp(0.0, (field.x - self.size.x).max(0.0));
        self.pos.y = self.pos.y.clamp(0.0, (field.y - self.size.y).max(0.0));
    }
}
