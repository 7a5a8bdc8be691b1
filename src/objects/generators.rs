//! Mesh generators that fill a soft body with points, springs and a
//! counter-clockwise boundary.

use std::f64::consts::TAU;

use super::soft_body::{BodyFlags, SoftBody};
use crate::common::{PhysicsError, SoftBodyMaterial};
use crate::math::Vec2;

impl SoftBody {
    /// Replaces the body's geometry with a ring of `num_points` points.
    ///
    /// Neighbouring points are joined by springs and edges; each point of the
    /// first half also gets a cross spring to the point opposite it.
    pub fn populate_circle(
        &mut self,
        center: Vec2,
        radius: f64,
        num_points: usize,
    ) -> Result<(), PhysicsError> {
        if num_points < 3 {
            self.clear();
            return Err(PhysicsError::TooFewPoints {
                required: 3,
                found: num_points,
            });
        }

        let positions: Vec<Vec2> = (0..num_points)
            .map(|i| center + Vec2::from_angle(TAU * i as f64 / num_points as f64) * radius)
            .collect();

        let ring: Vec<(usize, usize)> = (0..num_points)
            .map(|i| (i, (i + 1) % num_points))
            .collect();
        let mut springs = ring.clone();
        if num_points >= 4 {
            let half = num_points / 2;
            springs.extend((0..half).map(|i| (i, i + half)));
        }

        self.install(positions, &springs, &ring)
    }

    /// Replaces the body's geometry with a grid of
    /// `(detail_x + 1) x (detail_y + 1)` points spanning `size` around
    /// `center`.
    ///
    /// Grid neighbours are joined by springs. With `truss` set, both
    /// diagonals of every cell are braced as well. The boundary runs around
    /// the perimeter counter-clockwise.
    pub fn populate_rect(
        &mut self,
        center: Vec2,
        size: Vec2,
        detail_x: usize,
        detail_y: usize,
        truss: bool,
    ) -> Result<(), PhysicsError> {
        let dx = detail_x.max(1);
        let dy = detail_y.max(1);
        let columns = dx + 1;
        let index = |i: usize, j: usize| j * columns + i;

        let origin = center - size * 0.5;
        let mut positions = Vec::with_capacity(columns * (dy + 1));
        for j in 0..=dy {
            for i in 0..=dx {
                positions.push(
                    origin
                        + Vec2::new(
                            size.x * i as f64 / dx as f64,
                            size.y * j as f64 / dy as f64,
                        ),
                );
            }
        }

        let mut springs = Vec::new();
        for j in 0..=dy {
            for i in 0..=dx {
                if i < dx {
                    springs.push((index(i, j), index(i + 1, j)));
                }
                if j < dy {
                    springs.push((index(i, j), index(i, j + 1)));
                }
                if truss && i < dx && j < dy {
                    springs.push((index(i, j), index(i + 1, j + 1)));
                    springs.push((index(i + 1, j), index(i, j + 1)));
                }
            }
        }

        let mut edges = Vec::with_capacity(2 * (dx + dy));
        edges.extend((0..dx).map(|i| (index(i, 0), index(i + 1, 0))));
        edges.extend((0..dy).map(|j| (index(dx, j), index(dx, j + 1))));
        edges.extend((1..=dx).rev().map(|i| (index(i, dy), index(i - 1, dy))));
        edges.extend((1..=dy).rev().map(|j| (index(0, j), index(0, j - 1))));

        self.install(positions, &springs, &edges)
    }

    /// Shorthand for [`SoftBody::new`] followed by [`SoftBody::populate_circle`].
    pub fn circle(
        flags: BodyFlags,
        material: SoftBodyMaterial,
        center: Vec2,
        radius: f64,
        num_points: usize,
    ) -> Result<Self, PhysicsError> {
        let mut body = SoftBody::new(flags, material);
        body.populate_circle(center, radius, num_points)?;
        Ok(body)
    }

    /// Shorthand for [`SoftBody::new`] followed by [`SoftBody::populate_rect`].
    pub fn rect(
        flags: BodyFlags,
        material: SoftBodyMaterial,
        center: Vec2,
        size: Vec2,
        detail_x: usize,
        detail_y: usize,
        truss: bool,
    ) -> Result<Self, PhysicsError> {
        let mut body = SoftBody::new(flags, material);
        body.populate_rect(center, size, detail_x, detail_y, truss)?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    fn assert_consistent(body: &SoftBody) {
        let n = body.num_points();
        assert_eq!(body.positions().count(), n);
        assert_eq!(body.rest_shape().len(), n);
        for spring in body.springs() {
            assert!(spring.a < n && spring.b < n);
        }
        for edge in body.edges() {
            assert!(edge.a < n && edge.b < n);
        }
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_circle_layout() {
        let body = SoftBody::circle(
            BodyFlags::SPRINGS | BodyFlags::PRESSURE,
            SoftBodyMaterial::default(),
            Vec2::new(1.0, 2.0),
            2.0,
            12,
        )
        .unwrap();

        assert_consistent(&body);
        assert_eq!(body.num_points(), 12);
        assert_eq!(body.edges().len(), 12);
        assert_eq!(body.springs().len(), 12 + 6);
        assert!((body.centroid() - Vec2::new(1.0, 2.0)).magnitude() < EPSILON);
        assert!(body.enclosed_area() > 0.0);
        for p in body.positions() {
            assert!((p.distance(Vec2::new(1.0, 2.0)) - 2.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_circle_needs_three_points() {
        let err = SoftBody::circle(
            BodyFlags::SPRINGS,
            SoftBodyMaterial::default(),
            Vec2::ZERO,
            1.0,
            2,
        )
        .unwrap_err();
        assert_eq!(
            err,
            PhysicsError::TooFewPoints {
                required: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_rect_without_truss() {
        let body = SoftBody::rect(
            BodyFlags::SPRINGS,
            SoftBodyMaterial::default(),
            Vec2::ZERO,
            Vec2::new(4.0, 2.0),
            4,
            2,
            false,
        )
        .unwrap();

        assert_consistent(&body);
        assert_eq!(body.num_points(), 5 * 3);
        // 4 * 3 horizontal + 5 * 2 vertical
        assert_eq!(body.springs().len(), 22);
        assert_eq!(body.edges().len(), 2 * (4 + 2));
        assert!((body.enclosed_area() - 8.0).abs() < EPSILON);
        assert_eq!(body.boundary_loops().len(), 1);
        assert_eq!(body.boundary_loops()[0].len(), 12);
    }

    #[test]
    fn test_rect_with_truss_adds_diagonals() {
        let plain = SoftBody::rect(
            BodyFlags::SPRINGS,
            SoftBodyMaterial::default(),
            Vec2::ZERO,
            Vec2::new(2.0, 2.0),
            2,
            2,
            false,
        )
        .unwrap();
        let braced = SoftBody::rect(
            BodyFlags::SPRINGS,
            SoftBodyMaterial::default(),
            Vec2::ZERO,
            Vec2::new(2.0, 2.0),
            2,
            2,
            true,
        )
        .unwrap();

        assert_consistent(&braced);
        assert_eq!(braced.springs().len(), plain.springs().len() + 2 * 4);
        let diagonal = braced
            .springs()
            .iter()
            .find(|s| (s.rest_length - 2.0_f64.sqrt()).abs() < EPSILON);
        assert!(diagonal.is_some());
    }

    #[test]
    fn test_rect_bounds_match_size() {
        let body = SoftBody::rect(
            BodyFlags::SHAPE_MATCH,
            SoftBodyMaterial::default(),
            Vec2::new(10.0, 5.0),
            Vec2::new(3.0, 1.0),
            1,
            1,
            false,
        )
        .unwrap();
        assert_eq!(body.bounds().min, Vec2::new(8.5, 4.5));
        assert_eq!(body.bounds().max, Vec2::new(11.5, 5.5));
    }

    #[test]
    fn test_repopulate_then_clear_leaves_nothing_behind() {
        let mut body = SoftBody::new(BodyFlags::SPRINGS, SoftBodyMaterial::default());
        body.populate_circle(Vec2::ZERO, 1.0, 8).unwrap();
        body.populate_rect(Vec2::ZERO, Vec2::new(1.0, 1.0), 3, 3, true)
            .unwrap();
        assert_consistent(&body);
        assert_eq!(body.num_points(), 16);

        body.clear();
        assert_eq!(body.num_points(), 0);
        assert!(body.springs().is_empty());
        assert!(body.edges().is_empty());
        assert!(body.boundary_loops().is_empty());
    }
}
