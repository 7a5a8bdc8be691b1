use crate::math::{Transform, Vec2};

/// A single point, offset from its owner's origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointShape {
    pub offset: Vec2,
}

impl PointShape {
    pub fn new(offset: Vec2) -> Self {
        Self { offset }
    }

    pub fn position(&self, transform: &Transform) -> Vec2 {
        transform.apply(self.offset)
    }
}
