use super::forces::{force_models, ForceModel, StageState};
use crate::collision::self_collision::resolve_self_collisions;
use crate::common::{PhysicsError, WorldConfig};
use crate::math::Vec2;
use crate::objects::soft_body::{BodyFlags, SoftBody};

/// (fraction of `dt` the stage is projected from the snapshot, RK4 weight)
const STAGES: [(f64, f64); 4] = [
    (0.0, 1.0 / 6.0),
    (0.5, 1.0 / 3.0),
    (0.5, 1.0 / 3.0),
    (1.0, 1.0 / 6.0),
];

/// Working memory for one `advance` call: nine per-point vectors.
struct Scratch {
    x0: Vec<Vec2>,
    v0: Vec<Vec2>,
    xs: Vec<Vec2>,
    vs: Vec<Vec2>,
    force: Vec<Vec2>,
    kx: Vec<Vec2>,
    kv: Vec<Vec2>,
    acc_x: Vec<Vec2>,
    acc_v: Vec<Vec2>,
}

impl Scratch {
    fn snapshot(body: &SoftBody) -> Self {
        let n = body.num_points();
        let x0: Vec<Vec2> = body.positions().collect();
        let v0: Vec<Vec2> = body.points().iter().map(|p| p.velocity).collect();
        Self {
            xs: x0.clone(),
            vs: v0.clone(),
            kx: v0.clone(),
            x0,
            v0,
            force: vec![Vec2::ZERO; n],
            kv: vec![Vec2::ZERO; n],
            acc_x: vec![Vec2::ZERO; n],
            acc_v: vec![Vec2::ZERO; n],
        }
    }
}

/// Advances `body` by exactly `dt` with fourth-order Runge-Kutta over every
/// force model the body has enabled.
///
/// The body is only written once all four stages have been evaluated; if any
/// stage hits degenerate geometry, or the result is not finite, the error is
/// returned and the body keeps its previous state. After the commit the
/// self-collision pass runs (when enabled) and the bounding box, centroid and
/// orientation caches are rebuilt.
pub fn advance(body: &mut SoftBody, world: &WorldConfig, dt: f64) -> Result<(), PhysicsError> {
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(PhysicsError::InvalidTimeStep(dt));
    }
    let n = body.num_points();
    if n < 2 {
        return Err(PhysicsError::TooFewPoints {
            required: 2,
            found: n,
        });
    }
    // Masses can be changed through `point_mut` after the body was validated.
    if let Some((index, point)) = body
        .points()
        .iter()
        .enumerate()
        .find(|(_, p)| !(p.mass() > 0.0 && p.mass().is_finite()))
    {
        return Err(PhysicsError::InvalidMass {
            index,
            mass: point.mass(),
        });
    }

    let models = force_models(body.flags());
    let inv_mass: Vec<f64> = body.points().iter().map(|p| p.inv_mass()).collect();
    let mut s = Scratch::snapshot(body);

    for (fraction, weight) in STAGES {
        let h = dt * fraction;
        for i in 0..n {
            s.xs[i] = s.x0[i] + s.kx[i] * h;
            s.vs[i] = s.v0[i] + s.kv[i] * h;
        }

        evaluate(&models, body, world, &s.xs, &s.vs, &mut s.force)?;

        for i in 0..n {
            s.kx[i] = s.vs[i];
            s.kv[i] = s.force[i] * inv_mass[i];
            s.acc_x[i] += s.kx[i] * weight;
            s.acc_v[i] += s.kv[i] * weight;
        }
    }

    for i in 0..n {
        let position = s.x0[i] + s.acc_x[i] * dt;
        let velocity = s.v0[i] + s.acc_v[i] * dt;
        if !position.is_finite() || !velocity.is_finite() {
            return Err(PhysicsError::NonFiniteState { index: i });
        }
        s.xs[i] = position;
        s.vs[i] = velocity;
    }
    for (point, (&position, &velocity)) in body.points.iter_mut().zip(s.xs.iter().zip(&s.vs)) {
        point.position = position;
        point.velocity = velocity;
    }

    if body.flags().contains(BodyFlags::SELF_COLLIDING) {
        let pushed = resolve_self_collisions(body);
        if pushed > 0 {
            log::trace!("separated {pushed} self-colliding point pairs");
        }
    }

    body.refresh_bounds();
    body.refresh_frame();
    Ok(())
}

/// Net force on every point for one stage state.
fn evaluate(
    models: &[&dyn ForceModel],
    body: &SoftBody,
    world: &WorldConfig,
    positions: &[Vec2],
    velocities: &[Vec2],
    forces: &mut [Vec2],
) -> Result<(), PhysicsError> {
    forces.fill(Vec2::ZERO);
    let state = StageState {
        positions,
        velocities,
    };
    for model in models {
        model.accumulate(body, world, &state, forces)?;
    }
    Ok(())
}
