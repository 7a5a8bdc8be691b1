pub mod box_shape;
pub mod circle;
pub mod point;

pub use box_shape::BoxShape;
pub use circle::CircleShape;
pub use point::PointShape;

use crate::collision::AABB;
use crate::math::Transform;

/// Geometry of a rigid collider, in the owner's local frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    Point(PointShape),
    Box(BoxShape),
    Circle(CircleShape),
    Group(Vec<ColliderShape>),
}

impl ColliderShape {
    /// World-space bounding box under `transform`. An empty group collapses
    /// to the owner's origin.
    pub fn bounds(&self, transform: &Transform) -> AABB {
        match self {
            ColliderShape::Point(p) => AABB::point(p.position(transform)),
            ColliderShape::Box(b) => b.bounds(transform),
            ColliderShape::Circle(c) => c.bounds(transform),
            ColliderShape::Group(children) => {
                let mut iter = children.iter().map(|child| child.bounds(transform));
                match iter.next() {
                    Some(first) => iter.fold(first, |mut acc, aabb| {
                        acc.merge(&aabb);
                        acc
                    }),
                    None => AABB::point(transform.position),
                }
            }
        }
    }
}

/// A rigid collider: a shape plus the bounding box from its last placement.
///
/// The collider does not own a transform. Callers move it by calling
/// [`Collider::refresh_bounds`] with the owner's current transform before
/// testing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub shape: ColliderShape,
    bounds: AABB,
}

impl Collider {
    /// Wraps a shape, with bounds computed at the identity transform.
    pub fn new(shape: ColliderShape) -> Self {
        let bounds = shape.bounds(&Transform::identity());
        Self { shape, bounds }
    }

    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    pub fn refresh_bounds(&mut self, transform: &Transform) {
        self.bounds = self.shape.bounds(transform);
    }
}

impl From<ColliderShape> for Collider {
    fn from(shape: ColliderShape) -> Self {
        Collider::new(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    #[test]
    fn test_group_bounds_cover_children() {
        let group = ColliderShape::Group(vec![
            ColliderShape::Circle(CircleShape::new(Vec2::new(-2.0, 0.0), 1.0)),
            ColliderShape::Box(BoxShape::new(Vec2::new(2.0, 0.0), Vec2::new(0.5, 0.5), 0.0)),
            ColliderShape::Point(PointShape::new(Vec2::new(0.0, 4.0))),
        ]);
        let bounds = group.bounds(&Transform::from_position(Vec2::new(0.0, 1.0)));
        assert_eq!(bounds.min, Vec2::new(-3.0, 0.0));
        assert_eq!(bounds.max, Vec2::new(2.5, 5.0));
    }

    #[test]
    fn test_empty_group_bounds() {
        let t = Transform::from_position(Vec2::new(3.0, -1.0));
        let bounds = ColliderShape::Group(Vec::new()).bounds(&t);
        assert_eq!(bounds, AABB::point(Vec2::new(3.0, -1.0)));
    }

    #[test]
    fn test_collider_refresh_bounds() {
        let mut collider = Collider::new(ColliderShape::Circle(CircleShape::new(Vec2::ZERO, 1.0)));
        assert_eq!(collider.bounds().max, Vec2::new(1.0, 1.0));
        collider.refresh_bounds(&Transform::from_position(Vec2::new(10.0, 0.0)));
        assert_eq!(collider.bounds().min, Vec2::new(9.0, -1.0));
    }
}
