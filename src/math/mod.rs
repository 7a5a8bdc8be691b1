pub mod transform;
pub mod vec2;

pub use transform::Transform;
pub use vec2::Vec2;

/// Lengths, areas and determinants below this are treated as zero.
pub const GEOMETRY_EPSILON: f64 = 1e-9;
