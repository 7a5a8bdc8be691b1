use crate::math::GEOMETRY_EPSILON;
use crate::objects::soft_body::SoftBody;

/// Pushes apart every pair of points of `body` closer than the material's
/// self-collision radius, leaving each such pair exactly one radius apart.
///
/// This is a direct position correction with no effect on velocities. Every
/// unordered pair is tested, so the cost grows with the square of the point
/// count. Coincident points have no separation direction and are skipped.
///
/// Returns the number of pairs that were moved.
pub fn resolve_self_collisions(body: &mut SoftBody) -> usize {
    let radius = body.material().self_collision_radius;
    if radius <= 0.0 {
        return 0;
    }

    let points = &mut body.points;
    let mut pushed = 0;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let delta = points[j].position - points[i].position;
            let distance = delta.magnitude();
            if distance >= radius || distance < GEOMETRY_EPSILON {
                continue;
            }
            let correction = delta * ((radius - distance) * 0.5 / distance);
            points[i].position -= correction;
            points[j].position += correction;
            pushed += 1;
        }
    }
    pushed
}
