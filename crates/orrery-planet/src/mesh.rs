//! Cube-sphere mesh generation with height displacement and equirectangular UVs.
//!
//! Each of the six cube faces is tessellated into a `resolution × resolution`
//! vertex grid, warped onto the unit sphere, displaced by the shape's height
//! field and finally merged into one [`MeshData`].

use glam::{DVec2, Vec2, Vec3};
use orrery_cubesphere::{CubeFace, cube_to_sphere, face_point, point_to_uv};
use tracing::debug;

use crate::{ShapeSettings, displace};

/// Errors raised for shapes that cannot be tessellated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// Resolution must be at least 1.
    #[error("mesh resolution must be at least 1, got {0}")]
    InvalidResolution(u32),

    /// Six faces at this resolution do not fit in `u32` indices.
    #[error("mesh resolution {0} exceeds the 32-bit index range")]
    ResolutionTooLarge(u32),

    /// The radius is NaN or infinite.
    #[error("mesh radius must be finite, got {0}")]
    NonFiniteRadius(f64),
}

/// Vertex positions, texture coordinates and triangle indices of a mesh.
///
/// Immutable once built. Every three consecutive indices form a triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    vertices: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
}

impl MeshData {
    /// Wrap existing buffers. `uvs` must be parallel to `vertices`.
    pub fn new(vertices: Vec<Vec3>, uvs: Vec<Vec2>, indices: Vec<u32>) -> Self {
        debug_assert_eq!(vertices.len(), uvs.len());
        debug_assert_eq!(indices.len() % 3, 0);
        Self {
            vertices,
            uvs,
            indices,
        }
    }

    /// Concatenate meshes in order, offsetting each part's indices by the
    /// number of vertices that precede it.
    pub fn merge(parts: &[MeshData]) -> MeshData {
        let vertex_total: usize = parts.iter().map(|m| m.vertices.len()).sum();
        let index_total: usize = parts.iter().map(|m| m.indices.len()).sum();

        let mut vertices = Vec::with_capacity(vertex_total);
        let mut uvs = Vec::with_capacity(vertex_total);
        let mut indices = Vec::with_capacity(index_total);

        for part in parts {
            let base = vertices.len() as u32;
            vertices.extend_from_slice(&part.vertices);
            uvs.extend_from_slice(&part.uvs);
            indices.extend(part.indices.iter().map(|&i| i + base));
        }

        MeshData {
            vertices,
            uvs,
            indices,
        }
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Per-vertex texture coordinates.
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Triangle list indices.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Take ownership of `(vertices, uvs, indices)`.
    pub fn into_parts(self) -> (Vec<Vec3>, Vec<Vec2>, Vec<u32>) {
        (self.vertices, self.uvs, self.indices)
    }
}

/// Check that a shape can be tessellated.
pub fn validate_shape(shape: &ShapeSettings) -> Result<(), MeshError> {
    if shape.resolution < 1 {
        return Err(MeshError::InvalidResolution(shape.resolution));
    }
    let per_face = u64::from(shape.resolution) * u64::from(shape.resolution);
    if per_face * 6 > u64::from(u32::MAX) {
        return Err(MeshError::ResolutionTooLarge(shape.resolution));
    }
    if !shape.radius.is_finite() {
        return Err(MeshError::NonFiniteRadius(shape.radius));
    }
    Ok(())
}

/// Tessellate a single cube face.
///
/// Grid cell `(x, y)` sits at `percent = (x, y) / (resolution - 1)` across the
/// face. A resolution of 1 yields the face centre alone and no triangles.
pub fn generate_face(face: CubeFace, shape: &ShapeSettings) -> Result<MeshData, MeshError> {
    validate_shape(shape)?;
    Ok(build_face(face, shape))
}

/// Tessellate all six faces, in [`CubeFace::ALL`] order.
pub fn generate_faces(shape: &ShapeSettings) -> Result<[MeshData; 6], MeshError> {
    validate_shape(shape)?;
    Ok(CubeFace::ALL.map(|face| build_face(face, shape)))
}

/// Generate the merged planet mesh for a shape.
///
/// Deterministic: equal [`ShapeSettings`] always produce identical buffers.
pub fn generate_mesh(shape: &ShapeSettings) -> Result<MeshData, MeshError> {
    let faces = generate_faces(shape)?;
    let mesh = MeshData::merge(&faces);
    debug!(
        resolution = shape.resolution,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        displaced = shape.height_field.is_some(),
        "Generated planet mesh"
    );
    Ok(mesh)
}

fn build_face(face: CubeFace, shape: &ShapeSettings) -> MeshData {
    let res = shape.resolution as usize;
    let cells = res.saturating_sub(1);

    let mut vertices = Vec::with_capacity(res * res);
    let mut uvs = Vec::with_capacity(res * res);
    let mut indices = Vec::with_capacity(cells * cells * 6);

    for y in 0..res {
        for x in 0..res {
            let i = (x + y * res) as u32;
            let r = res as u32;

            let percent = grid_percent(x, y, res);
            let on_sphere = cube_to_sphere(face_point(face, percent));

            // UVs use the undisplaced point.
            uvs.push(point_to_uv(on_sphere));
            vertices.push(displace(on_sphere, shape).as_vec3());

            if x != res - 1 && y != res - 1 {
                indices.extend_from_slice(&[i, i + r + 1, i + r]);
                indices.extend_from_slice(&[i, i + 1, i + r + 1]);
            }
        }
    }

    MeshData {
        vertices,
        uvs,
        indices,
    }
}

fn grid_percent(x: usize, y: usize, res: usize) -> DVec2 {
    if res == 1 {
        return DVec2::splat(0.5);
    }
    DVec2::new(x as f64, y as f64) / (res - 1) as f64
}
