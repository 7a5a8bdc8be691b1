//! Error types for soft body construction and integration.

use crate::math::Vec2;
use thiserror::Error;

/// Caller/input errors. None of these are recoverable mid-step: a body that
/// produces one must be fixed before it is advanced again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("soft body needs at least {required} points, found {found}")]
    TooFewPoints { required: usize, found: usize },

    #[error("point {index} has invalid mass {mass}")]
    InvalidMass { index: usize, mass: f64 },

    #[error("point index {index} out of bounds (count: {count})")]
    IndexOutOfBounds { index: usize, count: usize },

    #[error("spring {spring} has (near) zero length")]
    DegenerateSpring { spring: usize },

    #[error("boundary edge {edge} has (near) zero length")]
    DegenerateEdge { edge: usize },

    #[error("enclosed area {area} is too small for a pressure body")]
    DegenerateVolume { area: f64 },

    #[error("boundary edges do not form closed loops around point {point}")]
    OpenBoundary { point: usize },

    #[error("boundary is wound clockwise (signed area {area})")]
    ClockwiseWinding { area: f64 },

    #[error("rest shape is not centered on the origin (mean offset {offset:?})")]
    UncenteredRestShape { offset: Vec2 },

    #[error("rest shape has {rest} offsets for {points} points")]
    RestShapeMismatch { points: usize, rest: usize },

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    #[error("integration produced a non-finite state at point {index}")]
    NonFiniteState { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = PhysicsError::IndexOutOfBounds { index: 7, count: 4 };
        assert_eq!(err.to_string(), "point index 7 out of bounds (count: 4)");

        let err = PhysicsError::TooFewPoints {
            required: 3,
            found: 2,
        };
        assert_eq!(err.to_string(), "soft body needs at least 3 points, found 2");

        let err = PhysicsError::InvalidTimeStep(-0.5);
        assert!(err.to_string().contains("-0.5"));
    }
}
