//! A constraint-based stepper for 2D disks bouncing off planes, circles,
//! each other and the walls of a rectangular domain.
//!
//! Drive it by calling [`Context::step`][physics::Context::step] from your own loop
//! and read particle state back for drawing.

/// Open a tracy profiling zone that lasts until the returned value is dropped.
/// Does nothing unless the `tracy` feature is enabled and a client is running.
macro_rules! tracy_span {
    ($name:expr, $fn_name:expr) => {
        tracy_client::Client::running()
            .map(|client| client.span_alloc(Some($name), $fn_name, file!(), line!(), 0))
    };
}

pub mod math;
pub use math::{uv, Angle, Unit, Vec2};

pub mod physics;
pub use physics::{
    collision::{self, Collider, ColliderKey},
    Bounds, ConstraintSet, Context, DynamicConstraint, Particle, ParticleKey, PhysicsError,
    SimParams, StaticConstraint,
};

#[cfg(feature = "serde-types")]
pub mod scene;
#[cfg(feature = "serde-types")]
pub use scene::Scene;
