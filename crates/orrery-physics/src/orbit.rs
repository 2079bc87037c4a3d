//! Initial conditions from orbital elements.

use glam::{DQuat, DVec3};
use orrery_config::OrbitSettings;

use crate::PhysicsError;

/// State of the body being orbited.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CentralBody {
    pub position: DVec3,
    /// Added to the orbiting body's launch velocity.
    pub velocity: DVec3,
    pub mass: f64,
}

/// Starting position and velocity of an orbiting body, plus the world-space
/// extremes of its orbit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InitialState {
    /// Launch position; equal to `apoapsis`.
    pub position: DVec3,
    /// Launch velocity, including the central body's.
    pub velocity: DVec3,
    /// Farthest point of the orbit.
    pub apoapsis: DVec3,
    /// Nearest point of the orbit.
    pub periapsis: DVec3,
}

/// Speed of a circular orbit of radius `r` around gravitational parameter `mu`.
#[must_use]
pub fn circular_speed(mu: f64, r: f64) -> f64 {
    (mu / r).sqrt()
}

/// Solve the vis-viva equation for a body starting at apoapsis.
///
/// The orbit lies in the plane spanned by +X and the inclined Z axis:
/// apoapsis sits at `(0, sin i, cos i) * apoapsis` from the central body,
/// periapsis on the opposite side, and the body is launched along +X
/// (or -X for counter-clockwise orbits). The central body's velocity is added
/// so the orbit is relative to it.
pub fn compute_initial_state(
    orbit: &OrbitSettings,
    body_mass: f64,
    central: &CentralBody,
    g: f64,
) -> Result<InitialState, PhysicsError> {
    validate(orbit, body_mass, central, g)?;

    let semi_major_axis = (orbit.apoapsis + orbit.periapsis) / 2.0;
    let k = 1.0 + body_mass / central.mass;
    let mu = g * central.mass;

    let mut speed = (mu * k * (2.0 / orbit.apoapsis - 1.0 / semi_major_axis)).sqrt();
    if !orbit.clockwise_orbit {
        speed = -speed;
    }

    let (sin_i, cos_i) = orbit.inclination.to_radians().sin_cos();
    let apoapsis = central.position + DVec3::new(0.0, sin_i, cos_i) * orbit.apoapsis;
    let periapsis = central.position - DVec3::new(0.0, sin_i, cos_i) * orbit.periapsis;

    Ok(InitialState {
        position: apoapsis,
        velocity: DVec3::new(speed, 0.0, 0.0) + central.velocity,
        apoapsis,
        periapsis,
    })
}

/// Initial axial tilt: `axis` degrees about +X.
#[must_use]
pub fn initial_rotation(orbit: &OrbitSettings) -> DQuat {
    DQuat::from_rotation_x(orbit.axis.to_radians())
}

fn validate(
    orbit: &OrbitSettings,
    body_mass: f64,
    central: &CentralBody,
    g: f64,
) -> Result<(), PhysicsError> {
    if !g.is_finite() || g <= 0.0 {
        return Err(PhysicsError::InvalidGravitationalConstant(g));
    }
    if !central.mass.is_finite() {
        return Err(PhysicsError::NonFiniteOrbit("central mass"));
    }
    if central.mass <= 0.0 {
        return Err(PhysicsError::NonPositiveCentralMass(central.mass));
    }
    if !body_mass.is_finite() || body_mass < 0.0 {
        return Err(PhysicsError::InvalidBodyMass(body_mass));
    }
    if !central.position.is_finite() {
        return Err(PhysicsError::NonFiniteOrbit("central position"));
    }
    if !central.velocity.is_finite() {
        return Err(PhysicsError::NonFiniteOrbit("central velocity"));
    }
    if !orbit.inclination.is_finite() {
        return Err(PhysicsError::NonFiniteOrbit("inclination"));
    }
    if !orbit.axis.is_finite() {
        return Err(PhysicsError::NonFiniteOrbit("axis"));
    }
    if !orbit.apoapsis.is_finite() {
        return Err(PhysicsError::NonFiniteOrbit("apoapsis"));
    }
    if orbit.apoapsis <= 0.0 {
        return Err(PhysicsError::NonPositiveApoapsis(orbit.apoapsis));
    }
    if !(0.0..=orbit.apoapsis).contains(&orbit.periapsis) {
        return Err(PhysicsError::InvalidPeriapsis {
            periapsis: orbit.periapsis,
            apoapsis: orbit.apoapsis,
        });
    }
    Ok(())
}
