pub mod generators;
pub mod soft_body;

pub use soft_body::{BodyFlags, Edge, Point, SoftBody, Spring};
