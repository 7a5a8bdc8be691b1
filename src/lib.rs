//! Soft-body physics for 2D simulations.
//!
//! Soft bodies are meshes of point masses held together by springs, a
//! shape-matching pull toward their rest shape and internal gas pressure.
//! They are integrated with RK4 and collide with each other through their
//! boundary loops. Rigid colliders (points, boxes, circles and groups of
//! them) get their own pairwise contact tests.
//!
//! All coordinates are math convention: `+y` is up and boundary loops wind
//! counter-clockwise.

pub mod collision;
pub mod common;
pub mod integration;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{RigidContact, SoftContact, AABB};
pub use common::{PhysicsError, SoftBodyMaterial, WorldConfig};
pub use integration::advance;
pub use math::{Transform, Vec2};
pub use objects::{BodyFlags, SoftBody};
pub use shapes::{Collider, ColliderShape};
pub use world::PhysicsWorld;
