//! Defines the aggregate material parameters of a soft body.

/// Stiffness, damping, gas and drag parameters shared by every point and
/// spring of one soft body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftBodyMaterial {
    /// Mass assigned to each point by the generators. Must be positive.
    pub point_mass: f64,
    /// Hooke constant of every spring.
    pub spring_stiffness: f64,
    /// Damping along each spring's axis.
    pub spring_damping: f64,
    /// Pull toward the shape-matched rest position.
    pub shape_stiffness: f64,
    /// Ideal gas `nRT`: pressure is this divided by the enclosed area.
    pub gas_constant: f64,
    /// Drag coefficient. `None` falls back to the world default.
    pub linear_drag: Option<f64>,
    /// Points of the same body closer than this are pushed apart when
    /// self-collision is enabled.
    pub self_collision_radius: f64,
}

impl SoftBodyMaterial {
    pub fn new() -> Self {
        Self {
            point_mass: 1.0,
            spring_stiffness: 200.0,
            spring_damping: 5.0,
            shape_stiffness: 50.0,
            gas_constant: 10.0,
            linear_drag: None,
            self_collision_radius: 0.1,
        }
    }

    pub fn with_point_mass(mut self, point_mass: f64) -> Self {
        self.point_mass = point_mass;
        self
    }

    pub fn with_springs(mut self, stiffness: f64, damping: f64) -> Self {
        self.spring_stiffness = stiffness.max(0.0);
        self.spring_damping = damping.max(0.0);
        self
    }

    pub fn with_shape_stiffness(mut self, shape_stiffness: f64) -> Self {
        self.shape_stiffness = shape_stiffness.max(0.0);
        self
    }

    pub fn with_gas_constant(mut self, gas_constant: f64) -> Self {
        self.gas_constant = gas_constant;
        self
    }

    pub fn with_linear_drag(mut self, linear_drag: f64) -> Self {
        self.linear_drag = Some(linear_drag.max(0.0));
        self
    }

    pub fn with_self_collision_radius(mut self, radius: f64) -> Self {
        self.self_collision_radius = radius.max(0.0);
        self
    }
}

impl Default for SoftBodyMaterial {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_builder() {
        let material = SoftBodyMaterial::new()
            .with_point_mass(0.5)
            .with_springs(-1.0, 2.0)
            .with_linear_drag(0.3);
        assert_eq!(material.point_mass, 0.5);
        assert_eq!(material.spring_stiffness, 0.0);
        assert_eq!(material.spring_damping, 2.0);
        assert_eq!(material.linear_drag, Some(0.3));
    }

    #[test]
    fn test_material_default_defers_drag_to_world() {
        assert_eq!(SoftBodyMaterial::default().linear_drag, None);
    }
}
