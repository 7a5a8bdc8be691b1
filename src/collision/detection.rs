use super::manifold::SoftContact;
use crate::math::{Vec2, GEOMETRY_EPSILON};
use crate::objects::soft_body::SoftBody;

/// Tests two soft bodies for a single point-in-boundary contact.
///
/// After a bounding-box rejection, the points of `a` are tested against the
/// boundary of `b` and the first one found inside becomes the contact. If
/// none is inside, the test is repeated with the roles swapped and the
/// returned contact has `invert` set.
///
/// Only shallow penetrations are detected, and both boundaries must be
/// closed, counter-clockwise and free of self-intersections.
pub fn check_soft_bodies(a: &SoftBody, b: &SoftBody) -> Option<SoftContact> {
    if !a.bounds().overlaps(&b.bounds()) {
        log::trace!("soft body pair rejected by bounds");
        return None;
    }
    find_contact(a, b, false).or_else(|| find_contact(b, a, true))
}

/// First point of `inner` inside the boundary of `outer`, with the edge of
/// `outer` closest to it.
fn find_contact(inner: &SoftBody, outer: &SoftBody, invert: bool) -> Option<SoftContact> {
    if outer.edges().is_empty() {
        return None;
    }
    let outer_bounds = outer.bounds();
    inner
        .positions()
        .enumerate()
        .filter(|(_, p)| outer_bounds.contains(*p))
        .find(|(_, p)| point_in_boundary(*p, outer))
        .and_then(|(point, position)| {
            let (edge, edge_t, distance, nearest) = nearest_edge(position, outer)?;
            Some(SoftContact {
                invert,
                point,
                edge,
                edge_t,
                distance,
                nearest,
            })
        })
}

/// Crossing-number test: a ray from `point` toward `+x` crosses the boundary
/// an odd number of times when the point is inside.
///
/// An edge counts when exactly one endpoint lies strictly above the ray, so
/// a vertex sitting on the ray is counted once.
pub fn point_in_boundary(point: Vec2, body: &SoftBody) -> bool {
    let points = body.points();
    let mut inside = false;
    for edge in body.edges() {
        let p1 = points[edge.a].position;
        let p2 = points[edge.b].position;
        if (p1.y > point.y) != (p2.y > point.y) {
            let crossing_x = p1.x + (point.y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y);
            if point.x < crossing_x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Boundary edge of `body` nearest to `point`.
///
/// Only projections landing inside an edge (`t` in `[0, 1]`) are considered;
/// for a point inside a closed boundary one always exists except at sharp
/// reflex corners, where the nearest clamped projection is used instead.
/// Returns `(edge index, t, distance, projected point)`.
pub fn nearest_edge(point: Vec2, body: &SoftBody) -> Option<(usize, f64, f64, Vec2)> {
    let points = body.points();
    let mut best: Option<(usize, f64, f64, Vec2)> = None;
    let mut fallback: Option<(usize, f64, f64, Vec2)> = None;

    for (index, edge) in body.edges().iter().enumerate() {
        let p1 = points[edge.a].position;
        let p2 = points[edge.b].position;
        let along = p2 - p1;
        let length_sq = along.magnitude_squared();
        if length_sq < GEOMETRY_EPSILON * GEOMETRY_EPSILON {
            continue;
        }

        let t = (point - p1).dot(along) / length_sq;
        let clamped = t.clamp(0.0, 1.0);
        let projected = p1 + along * clamped;
        let distance = point.distance(projected);
        let candidate = (index, clamped, distance, projected);

        if (0.0..=1.0).contains(&t) {
            if best.map_or(true, |b| distance < b.2) {
                best = Some(candidate);
            }
        } else if fallback.map_or(true, |f| distance < f.2) {
            fallback = Some(candidate);
        }
    }
    best.or(fallback)
}
