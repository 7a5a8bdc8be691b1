use super::vec2::Vec2;

/// Rigid 2D placement of a body: a translation and a rotation about it.
///
/// Colliders never own one of these; callers hand in a fresh transform for
/// every query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f64, // radians, counter-clockwise
}

impl Transform {
    pub fn new(position: Vec2, rotation: f64) -> Self {
        Self { position, rotation }
    }

    pub fn identity() -> Self {
        Self::new(Vec2::ZERO, 0.0)
    }

    /// Transform with no rotation.
    pub fn from_position(position: Vec2) -> Self {
        Self::new(position, 0.0)
    }

    /// Maps a local point to world space: rotate, then translate.
    pub fn apply(self, point: Vec2) -> Vec2 {
        self.rotate_vector(point) + self.position
    }

    /// Maps a world point back into local space.
    pub fn apply_inverse(self, point: Vec2) -> Vec2 {
        (point - self.position).rotate(-self.rotation)
    }

    /// Rotates a direction (velocity, axis, offset) without translating it.
    pub fn rotate_vector(self, v: Vec2) -> Vec2 {
        v.rotate(self.rotation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_transform_identity_leaves_points() {
        let p = Vec2::new(5.0, -3.0);
        let tp = Transform::identity().apply(p);
        assert!((tp - p).magnitude() < EPSILON);
        assert_eq!(Transform::default(), Transform::identity());
    }

    #[test]
    fn test_transform_rotates_before_translating() {
        let t = Transform::new(Vec2::new(10.0, 5.0), PI / 2.0);
        let tp = t.apply(Vec2::new(1.0, 0.0));
        assert!((tp.x - 10.0).abs() < EPSILON);
        assert!((tp.y - 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_transform_rotate_vector_ignores_position() {
        let t = Transform::new(Vec2::new(100.0, -100.0), PI);
        let v = t.rotate_vector(Vec2::new(2.0, 0.0));
        assert!((v.x - -2.0).abs() < EPSILON);
        assert!(v.y.abs() < EPSILON);
    }

    #[test]
    fn test_transform_inverse_round_trips() {
        let t = Transform::new(Vec2::new(-3.0, 7.5), 1.234);
        let local = Vec2::new(0.4, -2.0);
        let back = t.apply_inverse(t.apply(local));
        assert!((back - local).magnitude() < EPSILON);
    }
}
