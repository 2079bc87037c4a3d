//! A running planetary system: configuration in, moving bodies and meshes out.
//!
//! [`PlanetarySystem`] applies [`SystemConfiguration`](orrery_config::SystemConfiguration)
//! snapshots, owns the live bodies and their meshes, and advances them each
//! tick through [`Tickable`]. The host supplies placement via
//! [`BodyTransforms`] and draws debug overlays through [`DebugLineDrawer`].

mod composer;
mod debug_draw;
mod error;
mod tick;
mod transform;

pub use composer::{ApplyReport, PlanetarySystem};
pub use debug_draw::{DebugLine, DebugLineBuffer, DebugLineDrawer, draw_orbit_extremes, draw_orbits};
pub use error::SystemError;
pub use tick::{DEFAULT_STEP, FixedTimestep, MAX_FRAME_TIME, MIN_STEP, Tickable};
pub use transform::{BodyTransforms, Transform, TransformTable};
