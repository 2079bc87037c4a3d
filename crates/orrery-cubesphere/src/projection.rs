//! Cube-to-sphere projection.
//!
//! Uses the analytic warp (often attributed to Everitt / Mathworld) rather than
//! naive normalisation, which keeps grid cells close to equal area.

use glam::{DVec2, DVec3};

use crate::CubeFace;

/// Map a point on the surface of the `[-1, 1]` cube onto the unit sphere.
///
/// ```text
/// sx = x * sqrt(1 - (y² + z²)/2 + y²z²/3)
/// sy = y * sqrt(1 - (z² + x²)/2 + z²x²/3)
/// sz = z * sqrt(1 - (x² + y²)/2 + x²y²/3)
/// ```
#[inline]
#[must_use]
pub fn cube_to_sphere(p: DVec3) -> DVec3 {
    let x2 = p.x * p.x;
    let y2 = p.y * p.y;
    let z2 = p.z * p.z;

    DVec3::new(
        p.x * (1.0 - (y2 + z2) / 2.0 + (y2 * z2) / 3.0).sqrt(),
        p.y * (1.0 - (z2 + x2) / 2.0 + (z2 * x2) / 3.0).sqrt(),
        p.z * (1.0 - (x2 + y2) / 2.0 + (x2 * y2) / 3.0).sqrt(),
    )
}

/// Point on the cube surface for a face and a grid fraction in `[0, 1]²`.
///
/// `percent = (0.5, 0.5)` is the face centre, which equals the face normal.
#[inline]
#[must_use]
pub fn face_point(face: CubeFace, percent: DVec2) -> DVec3 {
    face.normal()
        + (percent.x - 0.5) * 2.0 * face.axis_a()
        + (percent.y - 0.5) * 2.0 * face.axis_b()
}
