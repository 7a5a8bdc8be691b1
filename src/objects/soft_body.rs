use bitflags::bitflags;

use crate::collision::AABB;
use crate::common::{PhysicsError, SoftBodyMaterial};
use crate::math::{Vec2, GEOMETRY_EPSILON};

bitflags! {
    /// Which internal behaviours a soft body runs. Independently combinable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BodyFlags: u8 {
        const SPRINGS = 0b0001;
        const SHAPE_MATCH = 0b0010;
        const PRESSURE = 0b0100;
        const SELF_COLLIDING = 0b1000;
    }
}

/// A point mass of a soft body. Owned by the body and addressed by index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: Vec2,
    pub velocity: Vec2,
    mass: f64,
    inv_mass: f64,
    /// Per-point drag coefficient, overriding the body and world values.
    pub linear_drag: Option<f64>,
}

impl Point {
    /// Creates a resting point. A non-positive mass is reported when the
    /// owning body is validated or advanced.
    pub fn new(position: Vec2, mass: f64) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass,
            inv_mass: 1.0 / mass,
            linear_drag: None,
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inv_mass(&self) -> f64 {
        self.inv_mass
    }

    /// Changes the mass, keeping the cached reciprocal in sync.
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
        self.inv_mass = 1.0 / mass;
    }
}

/// A damped spring between two points of the same body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub a: usize,
    pub b: usize,
    pub rest_length: f64,
}

/// A boundary segment `a -> b`. Boundary loops are wound counter-clockwise
/// in math coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

/// A deformable mesh of point masses.
///
/// Points, springs and boundary edges live in flat arrays owned by the body;
/// springs and edges refer to points by index. The bounding box, centroid and
/// orientation are caches rebuilt after every step.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftBody {
    pub(crate) points: Vec<Point>,
    pub(crate) rest_shape: Vec<Vec2>,
    pub(crate) springs: Vec<Spring>,
    pub(crate) edges: Vec<Edge>,
    flags: BodyFlags,
    material: SoftBodyMaterial,
    bounds: AABB,
    centroid: Vec2,
    orientation: f64,
}

impl SoftBody {
    /// Creates an empty body. Populate it with one of the generators or use
    /// [`SoftBody::from_parts`].
    pub fn new(flags: BodyFlags, material: SoftBodyMaterial) -> Self {
        Self {
            points: Vec::new(),
            rest_shape: Vec::new(),
            springs: Vec::new(),
            edges: Vec::new(),
            flags,
            material,
            bounds: AABB::default(),
            centroid: Vec2::ZERO,
            orientation: 0.0,
        }
    }

    /// Builds a body from explicit geometry. Rest lengths come from the
    /// initial positions and the rest shape is the positions re-centered on
    /// their centroid.
    pub fn from_parts(
        flags: BodyFlags,
        material: SoftBodyMaterial,
        positions: Vec<Vec2>,
        springs: &[(usize, usize)],
        edges: &[(usize, usize)],
    ) -> Result<Self, PhysicsError> {
        let mut body = Self::new(flags, material);
        body.install(positions, springs, edges)?;
        Ok(body)
    }

    /// Replaces the body's geometry. On error the body is left empty.
    pub(crate) fn install(
        &mut self,
        positions: Vec<Vec2>,
        springs: &[(usize, usize)],
        edges: &[(usize, usize)],
    ) -> Result<(), PhysicsError> {
        self.clear();
        let count = positions.len();
        let check = |index: usize| {
            if index < count {
                Ok(index)
            } else {
                Err(PhysicsError::IndexOutOfBounds { index, count })
            }
        };

        let mut spring_list = Vec::with_capacity(springs.len());
        for &(a, b) in springs {
            let (a, b) = (check(a)?, check(b)?);
            spring_list.push(Spring {
                a,
                b,
                rest_length: positions[a].distance(positions[b]),
            });
        }
        let mut edge_list = Vec::with_capacity(edges.len());
        for &(a, b) in edges {
            edge_list.push(Edge {
                a: check(a)?,
                b: check(b)?,
            });
        }

        let centroid = mean(&positions);
        let mass = self.material.point_mass;
        self.rest_shape = positions.iter().map(|&p| p - centroid).collect();
        self.points = positions.into_iter().map(|p| Point::new(p, mass)).collect();
        self.springs = spring_list;
        self.edges = edge_list;

        if let Err(err) = self.validate() {
            log::warn!("rejecting soft body: {err}");
            self.clear();
            return Err(err);
        }
        self.refresh_bounds();
        self.refresh_frame();
        Ok(())
    }

    /// Drops every point, spring and edge and releases their buffers.
    pub fn clear(&mut self) {
        self.points = Vec::new();
        self.rest_shape = Vec::new();
        self.springs = Vec::new();
        self.edges = Vec::new();
        self.bounds = AABB::default();
        self.centroid = Vec2::ZERO;
        self.orientation = 0.0;
    }

    /// Checks every structural invariant the force models and the collision
    /// code rely on.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let count = self.points.len();
        let required = if self.flags.contains(BodyFlags::PRESSURE) {
            3
        } else {
            2
        };
        if count < required {
            return Err(PhysicsError::TooFewPoints {
                required,
                found: count,
            });
        }
        if self.rest_shape.len() != count {
            return Err(PhysicsError::RestShapeMismatch {
                points: count,
                rest: self.rest_shape.len(),
            });
        }

        for (index, point) in self.points.iter().enumerate() {
            if !(point.mass > 0.0 && point.mass.is_finite()) {
                return Err(PhysicsError::InvalidMass {
                    index,
                    mass: point.mass,
                });
            }
        }

        let in_bounds = |index: usize| {
            if index < count {
                Ok(())
            } else {
                Err(PhysicsError::IndexOutOfBounds { index, count })
            }
        };
        for (i, spring) in self.springs.iter().enumerate() {
            in_bounds(spring.a)?;
            in_bounds(spring.b)?;
            let length = self.points[spring.a].position.distance(self.points[spring.b].position);
            if length < GEOMETRY_EPSILON {
                return Err(PhysicsError::DegenerateSpring { spring: i });
            }
        }
        for (i, edge) in self.edges.iter().enumerate() {
            in_bounds(edge.a)?;
            in_bounds(edge.b)?;
            let length = self.points[edge.a].position.distance(self.points[edge.b].position);
            if length < GEOMETRY_EPSILON {
                return Err(PhysicsError::DegenerateEdge { edge: i });
            }
        }

        let offset = mean(&self.rest_shape);
        let scale = self
            .rest_shape
            .iter()
            .fold(1.0_f64, |acc, r| acc.max(r.magnitude()));
        if offset.magnitude() > 1e-6 * scale {
            return Err(PhysicsError::UncenteredRestShape { offset });
        }

        let pressure = self.flags.contains(BodyFlags::PRESSURE);
        if pressure && self.edges.is_empty() {
            return Err(PhysicsError::OpenBoundary { point: 0 });
        }
        if !self.edges.is_empty() {
            self.check_closed_loops()?;
            let area = self.enclosed_area();
            if area < -GEOMETRY_EPSILON {
                return Err(PhysicsError::ClockwiseWinding { area });
            }
            if pressure && area <= GEOMETRY_EPSILON {
                return Err(PhysicsError::DegenerateVolume { area });
            }
        }
        Ok(())
    }

    /// Every point on the boundary must have exactly one outgoing and one
    /// incoming edge, which makes the edge set a union of closed loops.
    fn check_closed_loops(&self) -> Result<(), PhysicsError> {
        let mut outgoing = vec![0u32; self.points.len()];
        let mut incoming = vec![0u32; self.points.len()];
        for edge in &self.edges {
            outgoing[edge.a] += 1;
            incoming[edge.b] += 1;
        }
        for point in 0..self.points.len() {
            if outgoing[point] != incoming[point] || outgoing[point] > 1 {
                return Err(PhysicsError::OpenBoundary { point });
            }
        }
        Ok(())
    }

    /// Signed area enclosed by the boundary edges (shoelace formula).
    /// Positive for counter-clockwise loops.
    pub fn enclosed_area(&self) -> f64 {
        signed_area(&self.edges, |i| self.points[i].position)
    }

    /// Switches capabilities on or off. The new combination is validated and
    /// the old flags are restored if it is rejected.
    pub fn set_flags(&mut self, flags: BodyFlags) -> Result<(), PhysicsError> {
        let previous = self.flags;
        self.flags = flags;
        if let Err(err) = self.validate() {
            self.flags = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn flags(&self) -> BodyFlags {
        self.flags
    }

    pub fn material(&self) -> &SoftBodyMaterial {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut SoftBodyMaterial {
        &mut self.material
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point_mut(&mut self, index: usize) -> Option<&mut Point> {
        self.points.get_mut(index)
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().map(|p| p.position)
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn rest_shape(&self) -> &[Vec2] {
        &self.rest_shape
    }

    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    /// Estimated rotation of the body relative to its rest shape, radians.
    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    /// Total mass of all points.
    pub fn mass(&self) -> f64 {
        self.points.iter().map(|p| p.mass).sum()
    }

    /// Moves every point, keeping velocities.
    pub fn translate(&mut self, offset: Vec2) {
        for point in &mut self.points {
            point.position += offset;
        }
        self.refresh_bounds();
        self.centroid += offset;
    }

    /// Gives every point the same velocity.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        for point in &mut self.points {
            point.velocity = velocity;
        }
    }

    /// Recomputes the bounding box from the current positions.
    pub fn refresh_bounds(&mut self) {
        let positions: Vec<Vec2> = self.positions().collect();
        self.bounds = AABB::from_points(&positions).unwrap_or_default();
    }

    /// Recomputes the cached centroid and orientation.
    pub fn refresh_frame(&mut self) {
        let positions: Vec<Vec2> = self.positions().collect();
        let (centroid, orientation) = shape_frame(&positions, &self.rest_shape);
        self.centroid = centroid;
        self.orientation = orientation;
    }

    /// Boundary loops as ordered point indices, in edge order. A renderer can
    /// fan or triangulate each loop directly.
    pub fn boundary_loops(&self) -> Vec<Vec<usize>> {
        let mut next = vec![None; self.points.len()];
        for edge in &self.edges {
            next[edge.a] = Some(edge.b);
        }
        let mut visited = vec![false; self.points.len()];
        let mut loops = Vec::new();
        for edge in &self.edges {
            if visited[edge.a] {
                continue;
            }
            let mut ring = Vec::new();
            let mut current = Some(edge.a);
            while let Some(index) = current {
                if visited[index] {
                    break;
                }
                visited[index] = true;
                ring.push(index);
                current = next[index];
            }
            loops.push(ring);
        }
        loops
    }
}

pub(crate) fn mean(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }
    points.iter().sum::<Vec2>() / points.len() as f64
}

/// Shoelace sum over a set of edges, reading positions through `pos`.
pub(crate) fn signed_area(edges: &[Edge], pos: impl Fn(usize) -> Vec2) -> f64 {
    0.5 * edges
        .iter()
        .map(|edge| pos(edge.a).cross(pos(edge.b)))
        .sum::<f64>()
}

/// Best-fit translation and rotation of `positions` onto the centered
/// `rest` template.
///
/// The rotation is the mean of the per-point signed angles between each rest
/// offset and the point's offset from the centroid. This is an approximation
/// rather than a least-squares fit: it drifts under strongly non-uniform
/// deformation and breaks down for rotations near `PI`, where the per-point
/// angles wrap. Points sitting on the centroid are left out of the mean.
pub(crate) fn shape_frame(positions: &[Vec2], rest: &[Vec2]) -> (Vec2, f64) {
    let centroid = mean(positions);
    let mut angle_sum = 0.0;
    let mut counted = 0usize;
    for (&p, &r) in positions.iter().zip(rest) {
        let offset = p - centroid;
        if offset.magnitude_squared() < GEOMETRY_EPSILON
            || r.magnitude_squared() < GEOMETRY_EPSILON
        {
            continue;
        }
        angle_sum += r.angle_to(offset);
        counted += 1;
    }
    let angle = if counted == 0 { 0.0 } else { angle_sum / counted as f64 };
    (centroid, angle)
}
