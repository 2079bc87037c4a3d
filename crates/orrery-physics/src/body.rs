//! Massive bodies driven by the integrator.

use std::fmt;

use glam::{DQuat, DVec3};

use crate::{InitialState, PhysicsError, PointMass};

/// Stable identifier of a body within one planetary system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Mass of a body whose surface gravity is `surface_gravity` at `radius`.
#[must_use]
pub fn mass_from_surface_gravity(surface_gravity: f64, radius: f64, g: f64) -> f64 {
    surface_gravity * radius * radius / g
}

/// A massive spherical body.
///
/// Mass is derived from surface gravity and radius and is never set directly.
/// Every setter that changes one of its inputs recomputes it, so the value
/// seen by the integrator is always current.
#[derive(Clone, Debug)]
pub struct CelestialBody {
    id: BodyId,
    name: String,
    radius: f64,
    surface_gravity: f64,
    gravitational_constant: f64,
    mass: f64,
    initial_velocity: DVec3,
    /// Display colour, RGBA.
    pub color: [f32; 4],
    /// World-space position.
    pub position: DVec3,
    /// World-space velocity.
    pub velocity: DVec3,
    /// Axial tilt applied when the body was placed.
    pub rotation: DQuat,
    /// Cached apoapsis point, for debug drawing only.
    pub apoapsis: DVec3,
    /// Cached periapsis point, for debug drawing only.
    pub periapsis: DVec3,
}

impl CelestialBody {
    /// Create a body at rest at the origin.
    pub fn new(
        id: BodyId,
        name: impl Into<String>,
        radius: f64,
        surface_gravity: f64,
        gravitational_constant: f64,
    ) -> Result<Self, PhysicsError> {
        check_radius(radius)?;
        check_surface_gravity(surface_gravity)?;
        check_gravitational_constant(gravitational_constant)?;

        Ok(Self {
            id,
            name: name.into(),
            radius,
            surface_gravity,
            gravitational_constant,
            mass: mass_from_surface_gravity(surface_gravity, radius, gravitational_constant),
            initial_velocity: DVec3::ZERO,
            color: [1.0; 4],
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            apoapsis: DVec3::ZERO,
            periapsis: DVec3::ZERO,
        })
    }

    /// Identifier assigned at creation.
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the body. Has no effect on physics.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Radius in world units.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Gravitational acceleration at the surface.
    pub fn surface_gravity(&self) -> f64 {
        self.surface_gravity
    }

    /// The `G` used to derive mass.
    pub fn gravitational_constant(&self) -> f64 {
        self.gravitational_constant
    }

    /// Mass derived from surface gravity and radius.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Velocity assigned by the last [`launch`](Self::launch).
    pub fn initial_velocity(&self) -> DVec3 {
        self.initial_velocity
    }

    /// Change the radius and recompute mass.
    ///
    /// Fails without changing anything if `radius` is not positive and finite.
    pub fn set_radius(&mut self, radius: f64) -> Result<(), PhysicsError> {
        check_radius(radius)?;
        self.radius = radius;
        self.recompute_mass();
        Ok(())
    }

    /// Change surface gravity and recompute mass.
    pub fn set_surface_gravity(&mut self, surface_gravity: f64) -> Result<(), PhysicsError> {
        check_surface_gravity(surface_gravity)?;
        self.surface_gravity = surface_gravity;
        self.recompute_mass();
        Ok(())
    }

    /// Change `G` and recompute mass.
    pub fn set_gravitational_constant(&mut self, g: f64) -> Result<(), PhysicsError> {
        check_gravitational_constant(g)?;
        self.gravitational_constant = g;
        self.recompute_mass();
        Ok(())
    }

    /// Place the body with a starting velocity, which is also recorded as
    /// its initial velocity.
    pub fn launch(&mut self, position: DVec3, velocity: DVec3) {
        self.position = position;
        self.velocity = velocity;
        self.initial_velocity = velocity;
    }

    /// Launch from a solved orbit and cache its extremes.
    pub fn launch_into(&mut self, state: &InitialState) {
        self.launch(state.position, state.velocity);
        self.apoapsis = state.apoapsis;
        self.periapsis = state.periapsis;
    }

    /// Linear momentum, `mass * velocity`.
    pub fn momentum(&self) -> DVec3 {
        self.velocity * self.mass
    }

    fn recompute_mass(&mut self) {
        self.mass = mass_from_surface_gravity(
            self.surface_gravity,
            self.radius,
            self.gravitational_constant,
        );
    }
}

impl PointMass for CelestialBody {
    fn position(&self) -> DVec3 {
        self.position
    }

    fn velocity(&self) -> DVec3 {
        self.velocity
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn set_position(&mut self, position: DVec3) {
        self.position = position;
    }

    fn set_velocity(&mut self, velocity: DVec3) {
        self.velocity = velocity;
    }
}

fn check_radius(radius: f64) -> Result<(), PhysicsError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidRadius(radius))
    }
}

fn check_surface_gravity(surface_gravity: f64) -> Result<(), PhysicsError> {
    if surface_gravity.is_finite() && surface_gravity >= 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidSurfaceGravity(surface_gravity))
    }
}

fn check_gravitational_constant(g: f64) -> Result<(), PhysicsError> {
    if g.is_finite() && g > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidGravitationalConstant(g))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn body() -> CelestialBody {
        CelestialBody::new(BodyId(1), "Terra", 2.0, 9.0, 0.5).unwrap()
    }

    #[test]
    fn test_mass_derived_on_construction() {
        // 9 * 2² / 0.5
        assert!((body().mass() - 72.0).abs() < EPSILON);
    }

    #[test]
    fn test_mass_tracks_radius_and_gravity() {
        let mut b = body();
        b.set_radius(4.0).unwrap();
        assert!((b.mass() - 9.0 * 16.0 / 0.5).abs() < EPSILON);

        b.set_surface_gravity(1.0).unwrap();
        assert!((b.mass() - 16.0 / 0.5).abs() < EPSILON);

        b.set_gravitational_constant(2.0).unwrap();
        assert!((b.mass() - 8.0).abs() < EPSILON);
    }

    #[test]
    fn test_mass_invariant_holds_across_many_values() {
        let g = 6.674e-11;
        let mut b = CelestialBody::new(BodyId(0), "Tester", 1.0, 1.0, g).unwrap();
        for i in 1..50 {
            let r = i as f64 * 123.4;
            let sg = i as f64 * 0.37;
            b.set_radius(r).unwrap();
            b.set_surface_gravity(sg).unwrap();
            let expected = sg * r * r / g;
            assert!(((b.mass() - expected) / expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_invalid_parameters_rejected_without_change() {
        let mut b = body();
        let mass = b.mass();
        assert_eq!(b.set_radius(0.0), Err(PhysicsError::InvalidRadius(0.0)));
        assert!(b.set_radius(f64::NAN).is_err());
        assert!(b.set_surface_gravity(-1.0).is_err());
        assert!(b.set_gravitational_constant(0.0).is_err());
        assert_eq!(b.mass(), mass);
        assert_eq!(b.radius(), 2.0);
    }

    #[test]
    fn test_zero_surface_gravity_is_massless() {
        let b = CelestialBody::new(BodyId(3), "dust", 1.0, 0.0, 1.0).unwrap();
        assert_eq!(b.mass(), 0.0);
    }

    #[test]
    fn test_launch_records_initial_velocity() {
        let mut b = body();
        b.launch(DVec3::X, DVec3::Y);
        b.velocity = DVec3::Z;
        assert_eq!(b.initial_velocity(), DVec3::Y);
        assert_eq!(b.position, DVec3::X);
    }

    #[test]
    fn test_launch_into_caches_extremes() {
        let mut b = body();
        let state = InitialState {
            position: DVec3::new(0.0, 0.0, 10.0),
            velocity: DVec3::new(1.0, 0.0, 0.0),
            apoapsis: DVec3::new(0.0, 0.0, 10.0),
            periapsis: DVec3::new(0.0, 0.0, -5.0),
        };
        b.launch_into(&state);
        assert_eq!(b.position, state.position);
        assert_eq!(b.initial_velocity(), state.velocity);
        assert_eq!(b.periapsis, state.periapsis);
    }

    #[test]
    fn test_body_id_display() {
        assert_eq!(BodyId(7).to_string(), "#7");
    }
}
