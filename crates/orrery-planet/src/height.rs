//! Radial displacement of unit-sphere points from a height field.

use glam::DVec3;
use orrery_cubesphere::point_to_uv;

use crate::ShapeSettings;

/// Height offset at a unit-sphere point, as a fraction of the radius.
///
/// Nearest-cell lookup: `u` and `v` are scaled to pixel indices with `floor`
/// and clamped to the grid, then the sample is multiplied by
/// `shape.elevation`. Returns `0.0` without a height field.
#[must_use]
pub fn sample_height(p: DVec3, shape: &ShapeSettings) -> f64 {
    let Some(field) = shape.height_field.as_deref() else {
        return 0.0;
    };

    let uv = point_to_uv(p);
    let x = pixel_index(uv.x, field.width());
    let y = pixel_index(uv.y, field.height());

    f64::from(field.sample(x, y)) * f64::from(shape.elevation)
}

/// Scale a unit-sphere point to the shape's radius and displace it outward by
/// [`sample_height`].
#[must_use]
pub fn displace(p: DVec3, shape: &ShapeSettings) -> DVec3 {
    p * shape.radius * (1.0 + sample_height(p, shape))
}

fn pixel_index(t: f32, size: u32) -> u32 {
    let i = (t * size as f32).floor();
    if i <= 0.0 {
        0
    } else {
        (i as u32).min(size - 1)
    }
}
