//! Procedural planet surfaces: height fields, radial displacement and
//! cube-sphere mesh generation.

mod cache;
mod height;
mod height_field;
mod mesh;
mod shape;

pub use cache::MeshCache;
pub use height::{displace, sample_height};
pub use height_field::{
    HeightField, HeightFieldError, HeightFieldLibrary, HeightFieldProvider,
    ImageHeightFieldProvider,
};
pub use mesh::{MeshData, MeshError, generate_face, generate_faces, generate_mesh, validate_shape};
pub use shape::ShapeSettings;
