pub mod aabb;
pub mod detection;
pub mod manifold;
pub mod raycast;
pub mod resolution;
pub mod rigid;
pub mod self_collision;

// Re-export key types
pub use aabb::AABB;
pub use detection::{check_soft_bodies, nearest_edge, point_in_boundary};
pub use manifold::{RigidContact, SoftContact};
pub use raycast::{ray_circle_exit, ray_segment};
pub use resolution::resolve_soft_contact;
pub use rigid::{check_collider_pair, collide_shapes};
pub use self_collision::resolve_self_collisions;
