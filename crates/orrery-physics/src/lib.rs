//! N-body gravity for a small planetary system.
//!
//! - [`CelestialBody`]: a massive body whose mass is derived from its surface
//!   gravity and radius.
//! - [`step`]: one semi-implicit Euler step over any [`PointMass`] slice.
//! - [`compute_initial_state`]: vis-viva launch conditions from orbital
//!   elements.
//! - [`predict_trajectories`]: future paths computed on [`VirtualBody`]
//!   copies, optionally in a co-moving frame.

mod body;
mod error;
mod integrator;
mod orbit;
mod prediction;

pub use body::{BodyId, CelestialBody, mass_from_surface_gravity};
pub use error::PhysicsError;
pub use integrator::{
    DEFAULT_MIN_DISTANCE, GravityParams, PointMass, StepReport, accelerations, step,
    total_momentum,
};
pub use orbit::{CentralBody, InitialState, circular_speed, compute_initial_state, initial_rotation};
pub use prediction::{Trajectory, VirtualBody, predict_trajectories};
