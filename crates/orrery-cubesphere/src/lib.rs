//! Cube-sphere coordinate math: cube faces, the cube-to-sphere warp, and
//! geographic coordinates with equirectangular UV mapping.

mod coordinate;
mod cube_face;
mod projection;

pub use coordinate::{Coordinate, point_to_coordinate, point_to_uv};
pub use cube_face::CubeFace;
pub use projection::{cube_to_sphere, face_point};
