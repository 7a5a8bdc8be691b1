pub mod forces;
pub mod integrator;

pub use forces::{
    force_models, DragForce, ForceModel, GravityForce, PressureForce, ShapeMatchForce,
    SpringForce, StageState,
};
pub use integrator::advance;
