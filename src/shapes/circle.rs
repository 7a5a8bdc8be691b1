use crate::collision::AABB;
use crate::math::{Transform, Vec2};

/// A solid circle offset from its owner's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleShape {
    pub offset: Vec2,
    pub radius: f64,
}

impl CircleShape {
    pub fn new(offset: Vec2, radius: f64) -> Self {
        assert!(radius >= 0.0, "Circle radius cannot be negative");
        Self { offset, radius }
    }

    /// Center in world coordinates.
    pub fn center(&self, transform: &Transform) -> Vec2 {
        transform.apply(self.offset)
    }

    pub fn bounds(&self, transform: &Transform) -> AABB {
        let center = self.center(transform);
        let extent = Vec2::new(self.radius, self.radius);
        AABB::new(center - extent, center + extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_circle_new() {
        let c = CircleShape::new(Vec2::new(1.0, 0.0), 5.0);
        assert_eq!(c.radius, 5.0);
        assert_eq!(c.offset, Vec2::new(1.0, 0.0));
    }

    #[test]
    #[should_panic]
    fn test_circle_new_negative_radius() {
        CircleShape::new(Vec2::ZERO, -1.0);
    }

    #[test]
    fn test_circle_bounds_follow_transform() {
        let c = CircleShape::new(Vec2::new(1.0, 0.0), 0.5);
        let t = Transform::new(Vec2::new(2.0, 2.0), std::f64::consts::FRAC_PI_2);
        assert!((c.center(&t) - Vec2::new(2.0, 3.0)).magnitude() < EPSILON);
        let b = c.bounds(&t);
        assert!((b.min - Vec2::new(1.5, 2.5)).magnitude() < EPSILON);
        assert!((b.max - Vec2::new(2.5, 3.5)).magnitude() < EPSILON);
    }
}
