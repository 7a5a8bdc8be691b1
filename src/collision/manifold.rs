use crate::math::Vec2;

/// A point of one soft body found inside another body's boundary.
///
/// Produced fresh by every pair test. `invert` records which side owns what:
/// with `invert == false` the point belongs to the first body passed to the
/// test and the edge to the second; with `invert == true` it is the other way
/// around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftContact {
    pub invert: bool,
    /// Index of the penetrating point in its body.
    pub point: usize,
    /// Index of the nearest boundary edge in the other body.
    pub edge: usize,
    /// Parameter of the projection along the edge, in `[0, 1]`.
    pub edge_t: f64,
    /// Distance from the point to its projection.
    pub distance: f64,
    /// The projection itself, in world coordinates.
    pub nearest: Vec2,
}

/// Contact between two rigid collider shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidContact {
    /// Penetration depth along `normal`.
    pub travel: f64,
    /// Contact point in world coordinates.
    pub point: Vec2,
    /// Unit normal pointing from shape B toward shape A.
    pub normal: Vec2,
}

impl RigidContact {
    /// The same contact seen with A and B swapped.
    pub fn flipped(self) -> Self {
        RigidContact {
            normal: -self.normal,
            ..self
        }
    }
}
