//! Errors raised while applying a system configuration.

use orrery_physics::PhysicsError;
use orrery_planet::{HeightFieldError, MeshError};

/// Reasons a configuration snapshot is rejected.
///
/// A rejected snapshot leaves the running system exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// Two descriptors share an id.
    #[error("duplicate body id {0}")]
    DuplicateId(u32),

    /// Two descriptors share a name.
    #[error("duplicate body name '{0}'")]
    DuplicateName(String),

    /// A descriptor has an empty name.
    #[error("body {id} has an empty name")]
    EmptyName {
        /// Id of the offending descriptor.
        id: u32,
    },

    /// System origin or central body velocity is NaN or infinite.
    #[error("system {0} is not finite")]
    NonFiniteFrame(&'static str),

    /// Physical parameters of a body are invalid.
    #[error("invalid body '{name}': {source}")]
    Body {
        name: String,
        #[source]
        source: PhysicsError,
    },

    /// The orbit of a planet cannot be solved.
    #[error("invalid orbit for '{name}': {source}")]
    Orbit {
        name: String,
        #[source]
        source: PhysicsError,
    },

    /// The height map of a body could not be loaded.
    #[error("failed to load height map for '{name}': {source}")]
    HeightField {
        name: String,
        #[source]
        source: HeightFieldError,
    },

    /// The shape of a body cannot be meshed.
    #[error("invalid shape for '{name}': {source}")]
    Shape {
        name: String,
        #[source]
        source: MeshError,
    },

    /// Integration or prediction failed.
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}
