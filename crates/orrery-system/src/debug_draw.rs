//! Debug line output for predicted orbits and orbit extremes.
//!
//! Drawing only reads body state; it never feeds back into the simulation.

use glam::{DVec3, Vec3};
use orrery_physics::{CelestialBody, Trajectory};

/// Sink for debug line segments, usually the host's gizmo renderer.
pub trait DebugLineDrawer {
    /// Queue one segment for this frame.
    fn draw_line(&mut self, start: DVec3, end: DVec3, color: [f32; 4]);
}

/// One debug line segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugLine {
    /// Segment start, narrowed to `f32` for the renderer.
    pub start: Vec3,
    /// Segment end.
    pub end: Vec3,
    /// RGBA color.
    pub color: [f32; 4],
}

/// Line segments collected for one frame.
#[derive(Clone, Debug, Default)]
pub struct DebugLineBuffer {
    /// Lines in draw order.
    pub lines: Vec<DebugLine>,
}

impl DebugLineBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all lines (call at start of each frame).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Number of buffered lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if nothing was drawn.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl DebugLineDrawer for DebugLineBuffer {
    fn draw_line(&mut self, start: DVec3, end: DVec3, color: [f32; 4]) {
        self.lines.push(DebugLine {
            start: start.as_vec3(),
            end: end.as_vec3(),
            color,
        });
    }
}

/// Draw each trajectory as a polyline in its body's colour.
///
/// `trajectories` is parallel to `bodies`, as returned by the predictor.
/// Returns the number of segments drawn.
pub fn draw_orbits(
    bodies: &[CelestialBody],
    trajectories: &[Trajectory],
    drawer: &mut dyn DebugLineDrawer,
) -> usize {
    let mut drawn = 0;
    for (body, trajectory) in bodies.iter().zip(trajectories) {
        for (start, end) in trajectory.segments() {
            drawer.draw_line(start, end, body.color);
            drawn += 1;
        }
    }
    drawn
}

/// Draw a line from `origin` to the cached apoapsis and periapsis of every
/// body in `planets`.
pub fn draw_orbit_extremes<'a>(
    origin: DVec3,
    planets: impl IntoIterator<Item = &'a CelestialBody>,
    drawer: &mut dyn DebugLineDrawer,
) {
    for planet in planets {
        drawer.draw_line(origin, planet.apoapsis, planet.color);
        drawer.draw_line(origin, planet.periapsis, planet.color);
    }
}
