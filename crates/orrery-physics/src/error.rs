//! Error type shared by the body model, the integrator and the orbit solver.

/// Errors raised when a physical quantity is outside its valid domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    /// Body radius must be finite and strictly positive.
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// Surface gravity must be finite and non-negative.
    #[error("surface gravity must be non-negative and finite, got {0}")]
    InvalidSurfaceGravity(f64),

    /// The gravitational constant must be finite and strictly positive.
    #[error("gravitational constant must be positive and finite, got {0}")]
    InvalidGravitationalConstant(f64),

    /// The central body of an orbit has no mass to orbit around.
    #[error("central body mass must be positive, got {0}")]
    NonPositiveCentralMass(f64),

    /// An orbiting body's mass is negative or not finite.
    #[error("body mass must be non-negative and finite, got {0}")]
    InvalidBodyMass(f64),

    /// Apoapsis distance must be strictly positive.
    #[error("apoapsis must be positive, got {0}")]
    NonPositiveApoapsis(f64),

    /// Periapsis must lie in `[0, apoapsis]`.
    #[error("periapsis {periapsis} must lie between 0 and apoapsis {apoapsis}")]
    InvalidPeriapsis {
        /// Requested periapsis distance.
        periapsis: f64,
        /// Requested apoapsis distance.
        apoapsis: f64,
    },

    /// An orbit parameter or central body state is NaN or infinite.
    #[error("orbit parameter `{0}` is not finite")]
    NonFiniteOrbit(&'static str),

    /// Integration step is NaN or infinite.
    #[error("time step must be finite, got {0}")]
    InvalidTimeStep(f64),
}
