//! Semi-implicit Euler integration of mutual Newtonian gravity.
//!
//! Each step first computes every acceleration from the pre-step positions
//! and kicks the velocities, then drifts every position with the new
//! velocities. Summation is direct and pairwise, O(n²) per step.

use glam::DVec3;
use orrery_config::SimulationConfig;
use tracing::trace;

use crate::PhysicsError;

/// Default separation below which pairwise distance is clamped.
pub const DEFAULT_MIN_DISTANCE: f64 = 1e-3;

/// Kinematic state the integrator reads and writes.
pub trait PointMass {
    /// World-space position.
    fn position(&self) -> DVec3;
    /// World-space velocity.
    fn velocity(&self) -> DVec3;
    /// Mass in simulation units.
    fn mass(&self) -> f64;
    /// Called once per body at the end of a step.
    fn set_position(&mut self, position: DVec3);
    fn set_velocity(&mut self, velocity: DVec3);
}

/// Constants shared by every integration step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravityParams {
    /// Gravitational constant `G`.
    pub gravitational_constant: f64,
    /// Pairs closer than this are treated as being exactly this far apart.
    pub min_distance: f64,
}

impl GravityParams {
    /// Parameters for `G` with the default minimum distance.
    pub fn new(gravitational_constant: f64) -> Self {
        Self {
            gravitational_constant,
            min_distance: DEFAULT_MIN_DISTANCE,
        }
    }

    /// Replace the minimum pair distance.
    #[must_use]
    pub fn with_min_distance(mut self, min_distance: f64) -> Self {
        self.min_distance = min_distance;
        self
    }
}

impl From<&SimulationConfig> for GravityParams {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            gravitational_constant: config.gravitational_constant,
            min_distance: config.min_distance,
        }
    }
}

/// Numerical degeneracies met while computing accelerations.
///
/// Each unordered pair is counted once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Pairs closer than `min_distance`, whose distance was clamped.
    pub clamped_pairs: usize,
    /// Pairs at exactly the same position; they exert no force on each other.
    pub coincident_pairs: usize,
    /// Pairs whose separation was NaN or infinite; skipped.
    pub non_finite_pairs: usize,
}

impl StepReport {
    /// Returns true if every pair was integrated normally.
    pub fn is_clean(&self) -> bool {
        self.clamped_pairs == 0 && self.coincident_pairs == 0 && self.non_finite_pairs == 0
    }

    /// Add the counts of `other` into `self`.
    pub fn accumulate(&mut self, other: StepReport) {
        self.clamped_pairs += other.clamped_pairs;
        self.coincident_pairs += other.coincident_pairs;
        self.non_finite_pairs += other.non_finite_pairs;
    }
}

/// Gravitational acceleration of every body due to all the others.
///
/// The clamp depends only on the pair separation, so the forces within a pair
/// stay equal and opposite.
pub fn accelerations<B: PointMass>(
    bodies: &[B],
    params: &GravityParams,
) -> (Vec<DVec3>, StepReport) {
    let mut report = StepReport::default();
    let min_sqr = params.min_distance * params.min_distance;
    let g = params.gravitational_constant;

    let accelerations = bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            let origin = body.position();
            let mut acceleration = DVec3::ZERO;

            for (j, other) in bodies.iter().enumerate() {
                if i == j {
                    continue;
                }
                // Count each unordered pair from its lower index only.
                let first = j > i;

                let offset = other.position() - origin;
                let sqr_dist = offset.length_squared();
                if !sqr_dist.is_finite() {
                    report.non_finite_pairs += usize::from(first);
                    continue;
                }
                if sqr_dist == 0.0 {
                    report.coincident_pairs += usize::from(first);
                    continue;
                }

                let direction = offset / sqr_dist.sqrt();
                let effective = if sqr_dist < min_sqr {
                    report.clamped_pairs += usize::from(first);
                    min_sqr
                } else {
                    sqr_dist
                };
                acceleration += direction * g * other.mass() / effective;
            }

            acceleration
        })
        .collect();

    (accelerations, report)
}

/// Advance `bodies` by one step of length `dt`.
///
/// All velocities are updated from the pre-step positions before any
/// position moves. A non-finite `dt` is rejected before anything is mutated.
pub fn step<B: PointMass>(
    bodies: &mut [B],
    dt: f64,
    params: &GravityParams,
) -> Result<StepReport, PhysicsError> {
    if !dt.is_finite() {
        return Err(PhysicsError::InvalidTimeStep(dt));
    }
    if bodies.is_empty() {
        return Ok(StepReport::default());
    }

    let (accelerations, report) = accelerations(bodies, params);

    // Kick: v += a * dt
    for (body, a) in bodies.iter_mut().zip(&accelerations) {
        body.set_velocity(body.velocity() + *a * dt);
    }

    // Drift: x += v * dt, with the kicked velocity
    for body in bodies.iter_mut() {
        body.set_position(body.position() + body.velocity() * dt);
    }

    if !report.is_clean() {
        trace!(?report, "Degenerate body pairs this step");
    }
    Ok(report)
}

/// Sum of `mass * velocity` over all bodies.
pub fn total_momentum<B: PointMass>(bodies: &[B]) -> DVec3 {
    bodies.iter().map(|b| b.velocity() * b.mass()).sum()
}
