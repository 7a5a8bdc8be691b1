use super::manifold::SoftContact;
use crate::math::Vec2;
use crate::objects::soft_body::SoftBody;

/// Resolves a contact reported by [`check_soft_bodies`](super::check_soft_bodies)
/// for the same `(a, b)` pair.
///
/// Positions are corrected first: the penetrating point and the two edge
/// endpoints are moved so the point lies on the edge again, in proportion to
/// their masses and to where along the edge the contact sits. Velocities are
/// then made equal at the contact with a fully inelastic exchange, unless
/// the point is already moving out through the corrected edge.
pub fn resolve_soft_contact(a: &mut SoftBody, b: &mut SoftBody, contact: &SoftContact) {
    let (point_body, edge_body) = if contact.invert { (b, a) } else { (a, b) };
    let Some(&edge) = edge_body.edges.get(contact.edge) else {
        return;
    };
    if contact.point >= point_body.points.len() {
        return;
    }

    let t = contact.edge_t;
    let point = point_body.points[contact.point];
    let start = edge_body.points[edge.a];
    let end = edge_body.points[edge.b];

    let edge_mass = (1.0 - t) * start.mass() + t * end.mass();
    let point_mass = point.mass();

    // Positional correction. The edge endpoints move by `wa * offset` and
    // `wb * offset`, the point by `wp * offset`, which closes the gap
    // exactly while keeping the mass-weighted displacement balanced.
    let offset = start.position.lerp(end.position, t) - point.position;
    let denominator = edge_mass + point_mass * ((1.0 - t) * (1.0 - t) + t * t);
    let wa = point_mass * (1.0 - t) / denominator;
    let wb = point_mass * t / denominator;
    let wp = edge_mass / denominator;

    let start_position = start.position - offset * wa;
    let end_position = end.position - offset * wb;
    edge_body.points[edge.a].position = start_position;
    edge_body.points[edge.b].position = end_position;
    point_body.points[contact.point].position = point.position + offset * wp;

    // Velocity exchange in the frame of the edge's weighted mean velocity.
    let edge_velocity = start.velocity.lerp(end.velocity, t);
    let relative = point.velocity - edge_velocity;
    let along = end_position - start_position;
    let outward = Vec2::new(along.y, -along.x);
    if relative.dot(outward) > 0.0 {
        log::trace!("contact already separating, velocities left alone");
    } else {
        let spread = 1.0 / ((1.0 - t) * (1.0 - t) + t * t);
        let shared = relative * (point_mass / (point_mass + spread * edge_mass));
        point_body.points[contact.point].velocity = edge_velocity + shared;
        edge_body.points[edge.a].velocity += shared * (spread * (1.0 - t));
        edge_body.points[edge.b].velocity += shared * (spread * t);
    }

    point_body.refresh_bounds();
    edge_body.refresh_bounds();
}
