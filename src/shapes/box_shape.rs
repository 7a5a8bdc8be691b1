use crate::collision::AABB;
use crate::math::{Transform, Vec2};

/// An oriented rectangle, positioned and rotated relative to its owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShape {
    pub center: Vec2,
    pub half_extents: Vec2,
    /// Rotation relative to the owner, radians.
    pub rotation: f64,
}

impl BoxShape {
    pub fn new(center: Vec2, half_extents: Vec2, rotation: f64) -> Self {
        assert!(
            half_extents.x >= 0.0 && half_extents.y >= 0.0,
            "Box extents cannot be negative"
        );
        Self {
            center,
            half_extents,
            rotation,
        }
    }

    /// Axis-aligned box of the given full size centered on the owner.
    pub fn from_size(size: Vec2) -> Self {
        Self::new(Vec2::ZERO, size * 0.5, 0.0)
    }

    /// Corners in world coordinates, counter-clockwise starting bottom-left
    /// in the box's own frame.
    pub fn corners(&self, transform: &Transform) -> [Vec2; 4] {
        let Vec2 { x: hx, y: hy } = self.half_extents;
        [
            Vec2::new(-hx, -hy),
            Vec2::new(hx, -hy),
            Vec2::new(hx, hy),
            Vec2::new(-hx, hy),
        ]
        .map(|corner| transform.apply(self.center + corner.rotate(self.rotation)))
    }

    /// Edge `i` runs from corner `i` to corner `i + 1`.
    pub fn edges(&self, transform: &Transform) -> [(Vec2, Vec2); 4] {
        let c = self.corners(transform);
        [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
    }

    pub fn bounds(&self, transform: &Transform) -> AABB {
        AABB::from_points(&self.corners(transform)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;
    const EPSILON: f64 = 1e-9;

    #[test]
    #[should_panic]
    fn test_box_new_negative_extents() {
        BoxShape::new(Vec2::ZERO, Vec2::new(1.0, -1.0), 0.0);
    }

    #[test]
    fn test_box_corners_are_counter_clockwise() {
        let b = BoxShape::from_size(Vec2::new(2.0, 4.0));
        let corners = b.corners(&Transform::from_position(Vec2::new(1.0, 1.0)));
        assert_eq!(corners[0], Vec2::new(0.0, -1.0));
        assert_eq!(corners[2], Vec2::new(2.0, 3.0));

        let area: f64 = b
            .edges(&Transform::identity())
            .iter()
            .map(|(p, q)| p.cross(*q))
            .sum::<f64>()
            * 0.5;
        assert!((area - 8.0).abs() < EPSILON);
    }

    #[test]
    fn test_rotated_box_bounds() {
        let b = BoxShape::new(Vec2::ZERO, Vec2::new(1.0, 1.0), FRAC_PI_4);
        let bounds = b.bounds(&Transform::identity());
        let reach = 2.0_f64.sqrt();
        assert!((bounds.max - Vec2::new(reach, reach)).magnitude() < EPSILON);
        assert!((bounds.min + Vec2::new(reach, reach)).magnitude() < EPSILON);
    }
}
