//! Trajectory prediction on disposable copies of live bodies.

use glam::DVec3;
use tracing::{debug, warn};

use crate::{GravityParams, PhysicsError, PointMass, StepReport, step};

/// Kinematic copy of a body, integrated in place of the live one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualBody {
    pub position: DVec3,
    pub velocity: DVec3,
    /// Copied once; never changes during a prediction.
    pub mass: f64,
}

impl VirtualBody {
    /// A free-standing virtual body.
    pub fn new(position: DVec3, velocity: DVec3, mass: f64) -> Self {
        Self {
            position,
            velocity,
            mass,
        }
    }

    /// Snapshot the current state of `body`.
    pub fn of<B: PointMass>(body: &B) -> Self {
        Self::new(body.position(), body.velocity(), body.mass())
    }
}

impl PointMass for VirtualBody {
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

/// Predicted positions of one body, one point per step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    /// World or reference-frame positions, oldest first.
    pub points: Vec<DVec3>,
}

impl Trajectory {
    /// Number of recorded points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs, for drawing as a polyline.
    pub fn segments(&self) -> impl Iterator<Item = (DVec3, DVec3)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Integrate copies of `bodies` for `num_steps` steps of `dt` and record where
/// each one ends up after every step.
///
/// With a `reference` index, the reference body's drift from its initial
/// position (measured at the start of each step) is subtracted from every
/// point, and the reference body itself stays pinned at its initial position.
/// An out-of-range reference falls back to world coordinates.
///
/// The returned trajectories are parallel to `bodies`. Live state is only
/// read.
pub fn predict_trajectories<B: PointMass>(
    bodies: &[B],
    num_steps: usize,
    dt: f64,
    params: &GravityParams,
    reference: Option<usize>,
) -> Result<Vec<Trajectory>, PhysicsError> {
    if !dt.is_finite() {
        return Err(PhysicsError::InvalidTimeStep(dt));
    }

    let reference = match reference {
        Some(index) if index >= bodies.len() => {
            warn!(
                index,
                bodies = bodies.len(),
                "Reference body out of range, predicting in world frame"
            );
            None
        }
        other => other,
    };

    let mut virtual_bodies: Vec<VirtualBody> = bodies.iter().map(VirtualBody::of).collect();
    let mut trajectories = vec![
        Trajectory {
            points: Vec::with_capacity(num_steps),
        };
        bodies.len()
    ];
    let reference_origin = reference.map(|r| virtual_bodies[r].position);
    let mut degenerate = StepReport::default();

    for _ in 0..num_steps {
        let offset = match (reference, reference_origin) {
            (Some(r), Some(origin)) => virtual_bodies[r].position - origin,
            _ => DVec3::ZERO,
        };

        degenerate.accumulate(step(&mut virtual_bodies, dt, params)?);

        for (i, (body, trajectory)) in virtual_bodies.iter().zip(&mut trajectories).enumerate() {
            let point = match reference_origin {
                Some(origin) if reference == Some(i) => origin,
                _ => body.position - offset,
            };
            trajectory.points.push(point);
        }
    }

    if !degenerate.is_clean() {
        warn!(?degenerate, num_steps, "Degenerate body pairs during prediction");
    }
    debug!(
        bodies = bodies.len(),
        num_steps,
        dt,
        reference = ?reference,
        "Predicted trajectories"
    );
    Ok(trajectories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::total_momentum;

    fn binary() -> Vec<VirtualBody> {
        vec![
            VirtualBody::new(DVec3::ZERO, DVec3::new(0.0, 0.0, 0.5), 1000.0),
            VirtualBody::new(DVec3::new(0.0, 0.0, 10.0), DVec3::new(10.0, 0.0, 0.0), 1.0),
        ]
    }

    #[test]
    fn test_one_point_per_step_per_body() {
        let trajectories =
            predict_trajectories(&binary(), 250, 0.01, &GravityParams::new(1.0), None).unwrap();
        assert_eq!(trajectories.len(), 2);
        assert!(trajectories.iter().all(|t| t.len() == 250));
        assert_eq!(trajectories[0].segments().count(), 249);
    }

    #[test]
    fn test_matches_live_integration_in_world_frame() {
        let params = GravityParams::new(1.0);
        let live = binary();
        let trajectories = predict_trajectories(&live, 20, 0.01, &params, None).unwrap();

        let mut manual = binary();
        for i in 0..20 {
            step(&mut manual, 0.01, &params).unwrap();
            assert_eq!(trajectories[1].points[i], manual[1].position);
        }
    }

    #[test]
    fn test_live_bodies_untouched() {
        let live = binary();
        let before = live.clone();
        predict_trajectories(&live, 100, 0.01, &GravityParams::new(1.0), Some(0)).unwrap();
        assert_eq!(live, before);
        assert_eq!(total_momentum(&live), total_momentum(&before));
    }

    #[test]
    fn test_reference_body_pinned() {
        let live = binary();
        let trajectories =
            predict_trajectories(&live, 500, 0.01, &GravityParams::new(1.0), Some(0)).unwrap();
        assert!(trajectories[0].points.iter().all(|p| *p == live[0].position));
    }

    #[test]
    fn test_reference_frame_subtracts_pre_step_drift() {
        let params = GravityParams::new(1.0);
        let live = binary();
        let trajectories = predict_trajectories(&live, 3, 0.01, &params, Some(0)).unwrap();

        let mut manual = binary();
        let origin = manual[0].position;
        for i in 0..3 {
            let offset = manual[0].position - origin;
            step(&mut manual, 0.01, &params).unwrap();
            assert_eq!(trajectories[1].points[i], manual[1].position - offset);
        }
    }

    #[test]
    fn test_out_of_range_reference_uses_world_frame() {
        let params = GravityParams::new(1.0);
        let world = predict_trajectories(&binary(), 10, 0.01, &params, None).unwrap();
        let fallback = predict_trajectories(&binary(), 10, 0.01, &params, Some(9)).unwrap();
        assert_eq!(world, fallback);
    }

    #[test]
    fn test_zero_steps_and_no_bodies() {
        let params = GravityParams::new(1.0);
        let empty = predict_trajectories(&binary(), 0, 0.01, &params, Some(1)).unwrap();
        assert!(empty.iter().all(Trajectory::is_empty));

        let none: Vec<VirtualBody> = Vec::new();
        assert!(predict_trajectories(&none, 10, 0.01, &params, None).unwrap().is_empty());
    }

    #[test]
    fn test_non_finite_dt_rejected() {
        let result = predict_trajectories(&binary(), 10, f64::NAN, &GravityParams::new(1.0), None);
        assert!(matches!(result, Err(PhysicsError::InvalidTimeStep(_))));
    }
}
