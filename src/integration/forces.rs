//! Internal and external force models of a soft body.
//!
//! Every model adds its contribution into a shared per-point force buffer,
//! so they can run in any order. Each is evaluated against the positions and
//! velocities of the current integration stage, not the body's committed
//! state.

use crate::common::{PhysicsError, WorldConfig};
use crate::math::{Vec2, GEOMETRY_EPSILON};
use crate::objects::soft_body::{shape_frame, signed_area, BodyFlags, SoftBody};

/// Positions and velocities of the body at one integration stage.
#[derive(Debug, Clone, Copy)]
pub struct StageState<'a> {
    pub positions: &'a [Vec2],
    pub velocities: &'a [Vec2],
}

/// A force field acting on the points of a soft body.
pub trait ForceModel {
    /// Adds this model's force on every point into `forces`.
    fn accumulate(
        &self,
        body: &SoftBody,
        world: &WorldConfig,
        state: &StageState<'_>,
        forces: &mut [Vec2],
    ) -> Result<(), PhysicsError>;
}

/// Damped Hooke springs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpringForce;

impl ForceModel for SpringForce {
    fn accumulate(
        &self,
        body: &SoftBody,
        _world: &WorldConfig,
        state: &StageState<'_>,
        forces: &mut [Vec2],
    ) -> Result<(), PhysicsError> {
        let stiffness = body.material().spring_stiffness;
        let damping = body.material().spring_damping;
        for (i, spring) in body.springs().iter().enumerate() {
            let diff = state.positions[spring.a] - state.positions[spring.b];
            let length = diff.magnitude();
            if length < GEOMETRY_EPSILON {
                return Err(PhysicsError::DegenerateSpring { spring: i });
            }
            let dir = diff / length;
            let stretch = spring.rest_length - length;
            let closing = (state.velocities[spring.b] - state.velocities[spring.a]).dot(dir);
            let f = stiffness * stretch + damping * closing;

            forces[spring.a] += dir * f;
            forces[spring.b] -= dir * f;
        }
        Ok(())
    }
}

/// Pulls every point toward its slot in the rest shape after that shape has
/// been moved and rotated onto the current point cloud.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeMatchForce;

impl ForceModel for ShapeMatchForce {
    fn accumulate(
        &self,
        body: &SoftBody,
        _world: &WorldConfig,
        state: &StageState<'_>,
        forces: &mut [Vec2],
    ) -> Result<(), PhysicsError> {
        let stiffness = body.material().shape_stiffness;
        let (centroid, angle) = shape_frame(state.positions, body.rest_shape());
        for (i, rest) in body.rest_shape().iter().enumerate() {
            let target = centroid + rest.rotate(angle);
            forces[i] += (target - state.positions[i]) * stiffness;
        }
        Ok(())
    }
}

/// Ideal-gas pressure pushing the boundary outward.
#[derive(Debug, Clone, Copy, Default)]
pub struct PressureForce;

impl ForceModel for PressureForce {
    fn accumulate(
        &self,
        body: &SoftBody,
        _world: &WorldConfig,
        state: &StageState<'_>,
        forces: &mut [Vec2],
    ) -> Result<(), PhysicsError> {
        let area = signed_area(body.edges(), |i| state.positions[i]);
        if area <= GEOMETRY_EPSILON {
            return Err(PhysicsError::DegenerateVolume { area });
        }
        let pressure = body.material().gas_constant / area;

        for edge in body.edges() {
            // Scaling by the unnormalized edge vector makes the push
            // proportional to edge length. The quarter turn is outward only
            // for counter-clockwise loops.
            let diff = state.positions[edge.a] - state.positions[edge.b];
            let push = Vec2::new(-diff.y * pressure, diff.x * pressure);
            forces[edge.a] += push;
            forces[edge.b] += push;
        }
        Ok(())
    }
}

/// Uniform gravity, scaled by each point's mass.
#[derive(Debug, Clone, Copy, Default)]
pub struct GravityForce;

impl ForceModel for GravityForce {
    fn accumulate(
        &self,
        body: &SoftBody,
        world: &WorldConfig,
        _state: &StageState<'_>,
        forces: &mut [Vec2],
    ) -> Result<(), PhysicsError> {
        for (force, point) in forces.iter_mut().zip(body.points()) {
            *force += world.gravity * point.mass();
        }
        Ok(())
    }
}

/// Air resistance on the windward side of the boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragForce;

impl DragForce {
    fn coefficient(body: &SoftBody, world: &WorldConfig, index: usize) -> f64 {
        body.points()[index]
            .linear_drag
            .or(body.material().linear_drag)
            .unwrap_or(world.linear_drag)
    }
}

impl ForceModel for DragForce {
    fn accumulate(
        &self,
        body: &SoftBody,
        world: &WorldConfig,
        state: &StageState<'_>,
        forces: &mut [Vec2],
    ) -> Result<(), PhysicsError> {
        if world.air_pressure == 0.0 {
            return Ok(());
        }
        for (i, edge) in body.edges().iter().enumerate() {
            let drag = 0.5
                * (Self::coefficient(body, world, edge.a) + Self::coefficient(body, world, edge.b));
            if drag == 0.0 {
                continue;
            }

            let along = state.positions[edge.b] - state.positions[edge.a];
            let length = along.magnitude();
            if length < GEOMETRY_EPSILON {
                return Err(PhysicsError::DegenerateEdge { edge: i });
            }
            let normal = -along.perpendicular();
            let velocity = (state.velocities[edge.a] + state.velocities[edge.b]) * 0.5;
            let facing = normal.dot(velocity);
            // Leeward edges are not pulled along.
            if facing <= 0.0 {
                continue;
            }

            let magnitude =
                0.5 * world.air_pressure * drag * facing * velocity.magnitude() / length;
            let resist = normal * (-magnitude / length);
            forces[edge.a] += resist;
            forces[edge.b] += resist;
        }
        Ok(())
    }
}

/// The models a body with `flags` runs, in evaluation order. Gravity is
/// always present and drag always comes last.
pub fn force_models(flags: BodyFlags) -> Vec<&'static dyn ForceModel> {
    let mut models: Vec<&'static dyn ForceModel> = Vec::with_capacity(5);
    if flags.contains(BodyFlags::SPRINGS) {
        models.push(&SpringForce);
    }
    if flags.contains(BodyFlags::SHAPE_MATCH) {
        models.push(&ShapeMatchForce);
    }
    if flags.contains(BodyFlags::PRESSURE) {
        models.push(&PressureForce);
    }
    models.push(&GravityForce);
    models.push(&DragForce);
    models
}
