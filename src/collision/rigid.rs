use super::manifold::RigidContact;
use super::raycast::{ray_circle_exit, ray_segment};
use crate::math::{Transform, Vec2, GEOMETRY_EPSILON};
use crate::shapes::{BoxShape, CircleShape, Collider, ColliderShape, PointShape};

/// Edges of the opposite box a box vertex is swept against. The fourth edge
/// is never tested, so a vertex that can only have entered through it is
/// missed.
const BOX_EDGES_SWEPT: usize = 3;

/// Broad phase on the colliders' cached bounds, then the exact shape test.
///
/// `va` and `vb` are the owners' linear velocities; the swept tests use them
/// to work out which feature a penetrating vertex came through. The returned
/// normal points from `b` toward `a`.
pub fn check_collider_pair(
    a: &Collider,
    ta: &Transform,
    va: Vec2,
    b: &Collider,
    tb: &Transform,
    vb: Vec2,
) -> Option<RigidContact> {
    if !a.bounds().overlaps(&b.bounds()) {
        log::trace!("collider pair rejected by bounds");
        return None;
    }
    collide_shapes(&a.shape, ta, va, &b.shape, tb, vb)
}

/// Narrow-phase test between two shapes placed by their owners' transforms.
///
/// Groups are searched child by child and the first hit is returned, which
/// is not necessarily the deepest.
pub fn collide_shapes(
    a: &ColliderShape,
    ta: &Transform,
    va: Vec2,
    b: &ColliderShape,
    tb: &Transform,
    vb: Vec2,
) -> Option<RigidContact> {
    match (a, b) {
        (ColliderShape::Group(children), _) => children
            .iter()
            .find_map(|child| collide_shapes(child, ta, va, b, tb, vb)),
        (_, ColliderShape::Group(children)) => children
            .iter()
            .find_map(|child| collide_shapes(a, ta, va, child, tb, vb)),

        (ColliderShape::Point(p), ColliderShape::Point(q)) => point_point(p, ta, va, q, tb, vb),
        (ColliderShape::Point(p), ColliderShape::Box(q)) => point_box(p, ta, va, q, tb, vb),
        (ColliderShape::Point(p), ColliderShape::Circle(q)) => point_circle(p, ta, va, q, tb, vb),
        (ColliderShape::Box(p), ColliderShape::Box(q)) => box_box(p, ta, va, q, tb, vb),
        (ColliderShape::Box(p), ColliderShape::Circle(q)) => box_circle(p, ta, q, tb),
        (ColliderShape::Circle(p), ColliderShape::Circle(q)) => circle_circle(p, ta, q, tb),

        // Lower triangle: swap the operands and turn the normal around.
        (ColliderShape::Box(p), ColliderShape::Point(q)) => {
            point_box(q, tb, vb, p, ta, va).map(RigidContact::flipped)
        }
        (ColliderShape::Circle(p), ColliderShape::Point(q)) => {
            point_circle(q, tb, vb, p, ta, va).map(RigidContact::flipped)
        }
        (ColliderShape::Circle(p), ColliderShape::Box(q)) => {
            box_circle(q, tb, p, ta).map(RigidContact::flipped)
        }
    }
}

/// Direction to cast from a penetrating vertex: back along its motion
/// relative to the other shape, or straight away from the other shape's
/// center when there is no relative motion.
fn sweep_direction(relative_velocity: Vec2, vertex: Vec2, other_center: Vec2) -> Vec2 {
    if relative_velocity.magnitude_squared() > GEOMETRY_EPSILON {
        return (-relative_velocity).normalize();
    }
    let radial = vertex - other_center;
    if radial.magnitude_squared() > GEOMETRY_EPSILON {
        radial.normalize()
    } else {
        Vec2::RIGHT
    }
}

/// Casts from `vertex` along `dir` against counter-clockwise `edges`. An odd
/// number of crossings means the vertex is inside; the nearest crossing is
/// the feature it entered through.
///
/// An edge only counts when exactly one endpoint lies strictly left of the
/// ray, so a ray through a shared corner crosses once and a ray grazing a
/// corner from outside crosses zero or two times.
fn sweep_vertex(vertex: Vec2, dir: Vec2, edges: &[(Vec2, Vec2)]) -> Option<(f64, RigidContact)> {
    let left_of_ray = |p: Vec2| dir.cross(p - vertex) > 0.0;
    let mut crossings = 0;
    let mut nearest: Option<(f64, Vec2, Vec2)> = None;
    for &(start, end) in edges {
        if left_of_ray(start) == left_of_ray(end) {
            continue;
        }
        if let Some((s, _)) = ray_segment(vertex, dir, start, end) {
            crossings += 1;
            if nearest.map_or(true, |(best, _, _)| s < best) {
                let along = end - start;
                nearest = Some((s, vertex + dir * s, Vec2::new(along.y, -along.x).normalize()));
            }
        }
    }
    if crossings % 2 == 0 {
        return None;
    }
    let (s, hit, normal) = nearest?;
    let travel = (hit - vertex).dot(normal);
    // A vertex outside the polygon can still cross an odd number of the
    // edges tested when not all of them are swept.
    if travel < 0.0 {
        return None;
    }
    Some((
        s,
        RigidContact {
            travel,
            point: hit,
            normal,
        },
    ))
}

fn point_point(
    a: &PointShape,
    ta: &Transform,
    va: Vec2,
    b: &PointShape,
    tb: &Transform,
    vb: Vec2,
) -> Option<RigidContact> {
    let pa = a.position(ta);
    let pb = b.position(tb);
    if pa.distance(pb) >= GEOMETRY_EPSILON {
        return None;
    }

    let (da, db) = (va.normalize(), vb.normalize());
    let bisector = db - da;
    let normal = if bisector.magnitude_squared() > GEOMETRY_EPSILON {
        bisector.normalize()
    } else if da != Vec2::ZERO {
        -da
    } else if db != Vec2::ZERO {
        db
    } else {
        Vec2::UP
    };
    Some(RigidContact {
        travel: 0.0,
        point: pa,
        normal,
    })
}

fn point_box(
    a: &PointShape,
    ta: &Transform,
    va: Vec2,
    b: &BoxShape,
    tb: &Transform,
    vb: Vec2,
) -> Option<RigidContact> {
    let vertex = a.position(ta);
    let dir = sweep_direction(va - vb, vertex, tb.apply(b.center));
    sweep_vertex(vertex, dir, &b.edges(tb)).map(|(_, contact)| contact)
}

fn point_circle(
    a: &PointShape,
    ta: &Transform,
    va: Vec2,
    b: &CircleShape,
    tb: &Transform,
    vb: Vec2,
) -> Option<RigidContact> {
    let vertex = a.position(ta);
    let center = b.center(tb);
    let dir = sweep_direction(va - vb, vertex, center);
    let s = ray_circle_exit(vertex, dir, center, b.radius)?;

    let hit = vertex + dir * s;
    let normal = (hit - center) / b.radius;
    Some(RigidContact {
        travel: (hit - vertex).dot(normal),
        point: hit,
        normal,
    })
}

fn box_box(
    a: &BoxShape,
    ta: &Transform,
    va: Vec2,
    b: &BoxShape,
    tb: &Transform,
    vb: Vec2,
) -> Option<RigidContact> {
    let a_edges = a.edges(ta);
    let b_edges = b.edges(tb);
    let a_center = ta.apply(a.center);
    let b_center = tb.apply(b.center);

    let mut best: Option<(f64, RigidContact)> = None;
    let mut keep_earliest = |candidate: Option<(f64, RigidContact)>| {
        if let Some((s, contact)) = candidate {
            if best.map_or(true, |(best_s, _)| s < best_s) {
                best = Some((s, contact));
            }
        }
    };

    for vertex in a.corners(ta) {
        let dir = sweep_direction(va - vb, vertex, b_center);
        keep_earliest(sweep_vertex(vertex, dir, &b_edges[..BOX_EDGES_SWEPT]));
    }
    for vertex in b.corners(tb) {
        let dir = sweep_direction(vb - va, vertex, a_center);
        keep_earliest(
            sweep_vertex(vertex, dir, &a_edges[..BOX_EDGES_SWEPT])
                .map(|(s, contact)| (s, contact.flipped())),
        );
    }
    best.map(|(_, contact)| contact)
}

fn box_circle(
    a: &BoxShape,
    ta: &Transform,
    b: &CircleShape,
    tb: &Transform,
) -> Option<RigidContact> {
    let center = b.center(tb);
    let radius = b.radius;

    // Nearest feature of the box outline: an edge projection or a corner.
    let mut nearest: Option<(f64, Vec2, Vec2)> = None;
    for (start, end) in a.edges(ta) {
        let along = end - start;
        let length_sq = along.magnitude_squared();
        let t = if length_sq < GEOMETRY_EPSILON * GEOMETRY_EPSILON {
            0.0
        } else {
            ((center - start).dot(along) / length_sq).clamp(0.0, 1.0)
        };
        let feature = start + along * t;
        let distance_sq = feature.distance_squared(center);
        if nearest.map_or(true, |(best, _, _)| distance_sq < best) {
            let outward = Vec2::new(along.y, -along.x).normalize();
            nearest = Some((distance_sq, feature, outward));
        }
    }
    let (distance_sq, feature, outward) = nearest?;
    let distance = distance_sq.sqrt();

    let local = ta.apply_inverse(center) - a.center;
    let local = local.rotate(-a.rotation);
    let inside = local.x.abs() <= a.half_extents.x && local.y.abs() <= a.half_extents.y;

    if inside {
        let normal = if distance > GEOMETRY_EPSILON {
            (center - feature) / distance
        } else {
            -outward
        };
        return Some(RigidContact {
            travel: radius + distance,
            point: center + normal * radius,
            normal,
        });
    }

    if radius * radius - distance_sq < 0.0 || distance < GEOMETRY_EPSILON {
        return None;
    }
    let normal = (feature - center) / distance;
    Some(RigidContact {
        travel: radius - distance,
        point: center + normal * radius,
        normal,
    })
}

fn circle_circle(
    a: &CircleShape,
    ta: &Transform,
    b: &CircleShape,
    tb: &Transform,
) -> Option<RigidContact> {
    let ca = a.center(ta);
    let cb = b.center(tb);
    let reach = a.radius + b.radius;
    let distance = ca.distance(cb);
    if distance >= reach {
        return None;
    }
    let normal = if distance > GEOMETRY_EPSILON {
        (ca - cb) / distance
    } else {
        Vec2::UP
    };
    Some(RigidContact {
        travel: reach - distance,
        point: cb + normal * b.radius,
        normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    fn circle(radius: f64) -> ColliderShape {
        ColliderShape::Circle(CircleShape::new(Vec2::ZERO, radius))
    }

    fn square(half: f64) -> ColliderShape {
        ColliderShape::Box(BoxShape::new(Vec2::ZERO, Vec2::new(half, half), 0.0))
    }

    fn point() -> ColliderShape {
        ColliderShape::Point(PointShape::default())
    }

    fn at(x: f64, y: f64) -> Transform {
        Transform::from_position(Vec2::new(x, y))
    }

    /// Both shapes at rest.
    fn resting(
        a: &ColliderShape,
        ta: &Transform,
        b: &ColliderShape,
        tb: &Transform,
    ) -> Option<RigidContact> {
        collide_shapes(a, ta, Vec2::ZERO, b, tb, Vec2::ZERO)
    }

    /// A point at `(x, y)` moving with `velocity` against a resting shape at
    /// the origin.
    fn moving_point(x: f64, y: f64, velocity: Vec2, other: &ColliderShape) -> Option<RigidContact> {
        collide_shapes(
            &point(),
            &at(x, y),
            velocity,
            other,
            &at(0.0, 0.0),
            Vec2::ZERO,
        )
    }

    fn assert_vec(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).magnitude() < EPSILON,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_circle_circle_overlap_and_miss() {
        let hit = resting(&circle(1.0), &at(0.0, 0.0), &circle(1.0), &at(1.5, 0.0)).unwrap();
        assert!((hit.travel - 0.5).abs() < EPSILON);
        assert_vec(hit.normal, Vec2::new(-1.0, 0.0));
        assert_vec(hit.point, Vec2::new(0.5, 0.0));

        assert!(resting(&circle(1.0), &at(0.0, 0.0), &circle(1.0), &at(2.5, 0.0)).is_none());
    }

    #[test]
    fn test_concentric_circles_use_fallback_normal() {
        let hit = resting(&circle(1.0), &at(0.0, 0.0), &circle(2.0), &at(0.0, 0.0)).unwrap();
        assert!((hit.travel - 3.0).abs() < EPSILON);
        assert_vec(hit.normal, Vec2::UP);
    }

    #[test]
    fn test_point_point() {
        let hit = collide_shapes(
            &point(),
            &at(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            &point(),
            &at(1.0, 1.0),
            Vec2::new(-1.0, 0.0),
        )
        .unwrap();
        assert_eq!(hit.travel, 0.0);
        assert_vec(hit.normal, Vec2::new(-1.0, 0.0));

        assert!(resting(&point(), &at(0.0, 0.0), &point(), &at(0.1, 0.0)).is_none());
    }

    #[test]
    fn test_point_entering_box_from_above() {
        let hit = moving_point(0.0, 0.8, Vec2::new(0.0, -1.0), &square(1.0)).unwrap();
        assert!((hit.travel - 0.2).abs() < EPSILON);
        assert_vec(hit.normal, Vec2::new(0.0, 1.0));
        assert_vec(hit.point, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_point_entering_box_through_corner() {
        // The backward ray leaves through the corner shared by the right and
        // top edges and must only be counted once.
        let hit = moving_point(0.5, 0.5, Vec2::new(-1.0, -1.0), &square(1.0)).unwrap();
        assert!((hit.travel - 0.5).abs() < EPSILON);
        assert_vec(hit.normal, Vec2::new(0.0, 1.0));
        assert_vec(hit.point, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_point_grazing_box_corner_stays_outside() {
        // The backward ray touches the top-right corner from outside.
        assert!(moving_point(2.0, 0.0, Vec2::new(1.0, -1.0), &square(1.0)).is_none());
    }

    #[test]
    fn test_point_outside_box() {
        // Moving toward the box: the backward ray points away from it.
        assert!(moving_point(0.0, 1.5, Vec2::new(0.0, -1.0), &square(1.0)).is_none());
        // Moving away: the backward ray passes through the box twice.
        assert!(moving_point(0.0, 1.5, Vec2::new(0.0, 1.0), &square(1.0)).is_none());
    }

    #[test]
    fn test_swapped_order_flips_normal() {
        let forward = moving_point(0.0, 0.8, Vec2::new(0.0, -1.0), &square(1.0)).unwrap();
        let backward = collide_shapes(
            &square(1.0),
            &at(0.0, 0.0),
            Vec2::ZERO,
            &point(),
            &at(0.0, 0.8),
            Vec2::new(0.0, -1.0),
        )
        .unwrap();
        assert_eq!(backward, forward.flipped());
    }

    #[test]
    fn test_point_inside_circle() {
        let hit = moving_point(0.5, 0.0, Vec2::new(-1.0, 0.0), &circle(1.0)).unwrap();
        assert!((hit.travel - 0.5).abs() < EPSILON);
        assert_vec(hit.normal, Vec2::new(1.0, 0.0));

        assert!(moving_point(2.0, 0.0, Vec2::ZERO, &circle(1.0)).is_none());
    }

    #[test]
    fn test_box_box_corner_overlap() {
        // B's lower-left corner sits inside A's right side.
        let hit = collide_shapes(
            &square(1.0),
            &at(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            &square(1.0),
            &at(1.8, 0.5),
            Vec2::ZERO,
        )
        .unwrap();
        assert!((hit.travel - 0.2).abs() < EPSILON);
        assert_vec(hit.normal, Vec2::new(-1.0, 0.0));
        assert_vec(hit.point, Vec2::new(1.0, -0.5));
    }

    #[test]
    fn test_box_box_separated() {
        assert!(resting(&square(1.0), &at(0.0, 0.0), &square(1.0), &at(5.0, 0.0)).is_none());
    }

    #[test]
    fn test_box_circle_center_outside() {
        let hit = resting(&square(1.0), &at(0.0, 0.0), &circle(0.5), &at(1.3, 0.0)).unwrap();
        assert!((hit.travel - 0.2).abs() < EPSILON);
        assert_vec(hit.normal, Vec2::new(-1.0, 0.0));

        let flipped = resting(&circle(0.5), &at(1.3, 0.0), &square(1.0), &at(0.0, 0.0)).unwrap();
        assert_vec(flipped.normal, Vec2::new(1.0, 0.0));

        assert!(resting(&square(1.0), &at(0.0, 0.0), &circle(0.5), &at(2.0, 0.0)).is_none());
    }

    #[test]
    fn test_box_circle_center_inside() {
        let hit = resting(&square(1.0), &at(0.0, 0.0), &circle(0.5), &at(0.8, 0.0)).unwrap();
        assert!((hit.travel - 0.7).abs() < EPSILON);
        assert_vec(hit.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_group_returns_first_hit() {
        let group = ColliderShape::Group(vec![
            ColliderShape::Circle(CircleShape::new(Vec2::new(-10.0, 0.0), 1.0)),
            ColliderShape::Circle(CircleShape::new(Vec2::new(1.0, 0.0), 1.0)),
            ColliderShape::Circle(CircleShape::new(Vec2::new(1.5, 0.0), 1.0)),
        ]);
        let hit = resting(&group, &at(0.0, 0.0), &circle(1.0), &at(2.5, 0.0)).unwrap();
        assert!((hit.travel - 0.5).abs() < EPSILON);

        let hit = resting(&circle(1.0), &at(2.5, 0.0), &group, &at(0.0, 0.0)).unwrap();
        assert_vec(hit.normal, Vec2::new(1.0, 0.0));

        let empty = ColliderShape::Group(Vec::new());
        assert!(resting(&empty, &at(0.0, 0.0), &circle(1.0), &at(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_collider_pair_uses_cached_bounds() {
        let mut a = Collider::new(circle(1.0));
        let b = Collider::new(circle(1.0));
        let ta = at(1.5, 0.0);
        let tb = at(0.0, 0.0);

        // Bounds still at the origin: overlap passes and the shapes collide.
        assert!(check_collider_pair(&a, &ta, Vec2::ZERO, &b, &tb, Vec2::ZERO).is_some());

        let far = at(10.0, 0.0);
        a.refresh_bounds(&far);
        assert!(check_collider_pair(&a, &far, Vec2::ZERO, &b, &tb, Vec2::ZERO).is_none());

        a.refresh_bounds(&ta);
        let hit = check_collider_pair(&a, &ta, Vec2::ZERO, &b, &tb, Vec2::ZERO).unwrap();
        assert!((hit.travel - 0.5).abs() < EPSILON);
        assert_vec(hit.normal, Vec2::new(1.0, 0.0));
    }
}
