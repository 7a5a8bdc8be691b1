// Analytic ray queries used by the swept rigid collider tests

use crate::math::{Vec2, GEOMETRY_EPSILON};

/// Intersects the ray `origin + dir * s` with the segment `a -> b`.
///
/// Returns `(s, u)` where `u` is the parameter along the segment. Only hits
/// in front of the origin (`s >= 0`) and on the segment (`u` in `[0, 1]`)
/// are reported. Parallel rays never hit.
pub fn ray_segment(origin: Vec2, dir: Vec2, a: Vec2, b: Vec2) -> Option<(f64, f64)> {
    let edge = b - a;
    let denominator = dir.cross(edge);
    if denominator.abs() < GEOMETRY_EPSILON {
        return None;
    }
    let to_start = a - origin;
    let s = to_start.cross(edge) / denominator;
    let u = to_start.cross(dir) / denominator;
    if s >= 0.0 && (0.0..=1.0).contains(&u) {
        Some((s, u))
    } else {
        None
    }
}

/// Distance along `dir` at which a ray starting inside the circle leaves it.
///
/// Returns `None` when the origin is not strictly inside, so a ray that only
/// passes through the circle further ahead is not reported.
pub fn ray_circle_exit(origin: Vec2, dir: Vec2, center: Vec2, radius: f64) -> Option<f64> {
    let a = dir.magnitude_squared();
    if a < GEOMETRY_EPSILON {
        return None;
    }
    let offset = origin - center;
    let b = 2.0 * dir.dot(offset);
    let c = offset.magnitude_squared() - radius * radius;
    if c >= 0.0 {
        return None;
    }
    // c < 0 keeps the discriminant positive.
    let discriminant = b * b - 4.0 * a * c;
    Some((-b + discriminant.sqrt()) / (2.0 * a))
}
