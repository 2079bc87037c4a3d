//! Fixed-rate ticking driven by a host loop.

use tracing::warn;

/// Frame times above this are clamped so a stalled frame cannot queue an
/// unbounded number of ticks.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Smallest accepted step. Bounds the ticks a single frame can run to
/// `MAX_FRAME_TIME / MIN_STEP`.
pub const MIN_STEP: f64 = 1e-6;

/// Step used when the requested one is not a positive finite number.
pub const DEFAULT_STEP: f64 = 0.01;

/// Something advanced once per physics tick.
pub trait Tickable {
    /// Advance by one tick of `dt` seconds.
    fn on_tick(&mut self, dt: f64);
}

/// Turns variable frame times into a whole number of fixed ticks.
///
/// Leftover time carries over to the next frame.
#[derive(Clone, Debug)]
pub struct FixedTimestep {
    step: f64,
    accumulator: f64,
    total_time: f64,
    tick_count: u64,
}

impl FixedTimestep {
    /// A timestep of `step` seconds.
    ///
    /// Non-positive or non-finite steps fall back to [`DEFAULT_STEP`]; steps
    /// below [`MIN_STEP`] are raised to it.
    pub fn new(step: f64) -> Self {
        let step = if !step.is_finite() || step <= 0.0 {
            warn!(step, "Invalid physics time step, using {DEFAULT_STEP}");
            DEFAULT_STEP
        } else if step < MIN_STEP {
            warn!(step, "Physics time step too small, clamping to {MIN_STEP}");
            MIN_STEP
        } else {
            step
        };
        Self {
            step,
            accumulator: 0.0,
            total_time: 0.0,
            tick_count: 0,
        }
    }

    /// Length of one tick in seconds.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Add `frame_time` and tick `target` for every whole step accumulated.
    ///
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_time: f64, target: &mut impl Tickable) -> u32 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        let mut ticks = 0;
        while self.accumulator >= self.step {
            target.on_tick(self.step);
            self.accumulator -= self.step;
            self.total_time += self.step;
            self.tick_count += 1;
            ticks += 1;
        }
        ticks
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.step
    }

    /// Simulated seconds so far.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        ticks: u32,
        time: f64,
    }

    impl Tickable for Counter {
        fn on_tick(&mut self, dt: f64) {
            self.ticks += 1;
            self.time += dt;
        }
    }

    #[test]
    fn test_whole_steps_only() {
        let mut clock = FixedTimestep::new(0.25);
        let mut counter = Counter::default();

        assert_eq!(clock.advance(0.2, &mut counter), 0);
        assert_eq!(clock.advance(0.2, &mut counter), 1);
        assert_eq!(counter.ticks, 1);
        assert!((clock.alpha() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut clock = FixedTimestep::new(0.125);
        let mut counter = Counter::default();
        assert_eq!(clock.advance(10.0, &mut counter), 2);
        assert_eq!(clock.tick_count(), 2);
        assert_eq!(clock.total_time(), 0.25);
    }

    #[test]
    fn test_negative_frame_time_ignored() {
        let mut clock = FixedTimestep::new(0.5);
        let mut counter = Counter::default();
        assert_eq!(clock.advance(-1.0, &mut counter), 0);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn test_invalid_step_falls_back() {
        assert_eq!(FixedTimestep::new(0.0).step(), 0.01);
        assert_eq!(FixedTimestep::new(f64::NAN).step(), 0.01);
        assert_eq!(FixedTimestep::new(0.02).step(), 0.02);
    }

    #[test]
    fn test_tiny_step_clamped_to_minimum() {
        let mut clock = FixedTimestep::new(1e-12);
        assert_eq!(clock.step(), MIN_STEP);

        let mut counter = Counter::default();
        let ticks = clock.advance(MAX_FRAME_TIME, &mut counter);
        let bound = (MAX_FRAME_TIME / MIN_STEP) as u32;
        assert!(ticks <= bound, "{ticks} ticks in one frame");
        assert!(ticks + 1 >= bound);
    }
}
