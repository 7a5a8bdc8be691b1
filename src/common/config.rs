//! Global simulation parameters shared by every body.

use crate::math::Vec2;

/// Environment every force model reads from.
///
/// ```
/// use softbody_engine::common::WorldConfig;
/// use softbody_engine::math::Vec2;
///
/// let config = WorldConfig::new()
///     .with_gravity(Vec2::new(0.0, -20.0))
///     .with_air_pressure(1.2)
///     .with_linear_drag(0.05);
/// assert_eq!(config.gravity, Vec2::new(0.0, -20.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    /// Gravitational acceleration, math coordinates (y up). Default `(0, -9.81)`.
    pub gravity: Vec2,
    /// Scales aerodynamic drag on boundary edges. Default `1.0`.
    pub air_pressure: f64,
    /// Drag coefficient used when neither the body nor a point overrides it.
    /// Default `0.0` (no drag).
    pub linear_drag: f64,
}

impl WorldConfig {
    pub fn new() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            air_pressure: 1.0,
            linear_drag: 0.0,
        }
    }

    /// A config with every external force switched off.
    pub fn zero() -> Self {
        Self {
            gravity: Vec2::ZERO,
            air_pressure: 0.0,
            linear_drag: 0.0,
        }
    }

    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_air_pressure(mut self, air_pressure: f64) -> Self {
        self.air_pressure = air_pressure.max(0.0);
        self
    }

    pub fn with_linear_drag(mut self, linear_drag: f64) -> Self {
        self.linear_drag = linear_drag.max(0.0);
        self
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new()
    }
}
