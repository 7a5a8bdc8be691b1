pub mod config;
pub mod error;
pub mod material;

pub use config::WorldConfig;
pub use error::PhysicsError;
pub use material::SoftBodyMaterial;
