// Axis-aligned bounding boxes for the broad phase

use crate::math::Vec2;

/// An Axis-Aligned Bounding Box defined by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec2,
    pub max: Vec2,
}

impl AABB {
    /// Creates a box spanning the two corners in any order.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        AABB {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Zero-sized box at `p`.
    pub fn point(p: Vec2) -> Self {
        AABB { min: p, max: p }
    }

    /// Smallest box containing every point, `None` for an empty slice.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = AABB::point(*first);
        for p in rest {
            aabb.include(*p);
        }
        Some(aabb)
    }

    /// Grows the box to contain `p`.
    pub fn include(&mut self, p: Vec2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Overlap test. Boxes that only touch still overlap; only a strict gap
    /// on some axis separates them.
    pub fn overlaps(&self, other: &AABB) -> bool {
        !(self.max.x < other.min.x
            || self.max.y < other.min.y
            || self.min.x > other.max.x
            || self.min.y > other.max.y)
    }

    pub fn merge(&mut self, other: &AABB) {
        self.include(other.min);
        self.include(other.max);
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

impl Default for AABB {
    fn default() -> Self {
        AABB::point(Vec2::ZERO)
    }
}
