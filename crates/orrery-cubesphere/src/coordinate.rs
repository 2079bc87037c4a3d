//! Geographic coordinates on the unit sphere and their equirectangular UVs.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::{DVec3, Vec2};

/// A geographic position in radians.
///
/// `longitude` is in `[-π, π]` with the seam at ±180°, `latitude` in
/// `[-π/2, π/2]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    /// Angle around the Y axis, zero towards −Z.
    pub longitude: f64,
    /// Angle above the XZ plane.
    pub latitude: f64,
}

impl Coordinate {
    /// Construct a coordinate from radians.
    #[must_use]
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Equirectangular texture coordinate in `[0, 1]²`.
    ///
    /// `u` runs west to east from the ±180° seam, `v` runs from the south
    /// pole (`0`) to the north pole (`1`).
    #[must_use]
    pub fn to_uv(self) -> Vec2 {
        let u = (self.longitude / PI + 1.0) / 2.0;
        let v = (self.latitude / FRAC_PI_2 + 1.0) / 2.0;
        Vec2::new(u as f32, v as f32)
    }
}

/// Geographic coordinate of a point on the unit sphere.
///
/// `p.y` is clamped to `[-1, 1]` first, so points that drifted slightly off
/// the sphere still produce a finite latitude.
#[must_use]
pub fn point_to_coordinate(p: DVec3) -> Coordinate {
    let latitude = p.y.clamp(-1.0, 1.0).asin();
    let longitude = p.x.atan2(-p.z);
    Coordinate::new(longitude, latitude)
}

/// Shorthand for `point_to_coordinate(p).to_uv()`.
#[inline]
#[must_use]
pub fn point_to_uv(p: DVec3) -> Vec2 {
    point_to_coordinate(p).to_uv()
}
