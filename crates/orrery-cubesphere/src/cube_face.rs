//! The six faces of the cube that a planet mesh is tessellated from.

use glam::DVec3;

/// One face of the unit cube.
///
/// Variants are declared in generation order. Mesh buffers are merged in
/// this order, so reordering them changes the index layout of every mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CubeFace {
    /// +Y face
    Up = 0,
    /// −Y face
    Down = 1,
    /// −X face
    Left = 2,
    /// +X face
    Right = 3,
    /// +Z face
    Forward = 4,
    /// −Z face
    Back = 5,
}

impl CubeFace {
    /// All six faces in generation order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Up,
        CubeFace::Down,
        CubeFace::Left,
        CubeFace::Right,
        CubeFace::Forward,
        CubeFace::Back,
    ];

    /// The opposite face (e.g., `Up` → `Down`).
    #[must_use]
    pub fn opposite(self) -> CubeFace {
        match self {
            CubeFace::Up => CubeFace::Down,
            CubeFace::Down => CubeFace::Up,
            CubeFace::Left => CubeFace::Right,
            CubeFace::Right => CubeFace::Left,
            CubeFace::Forward => CubeFace::Back,
            CubeFace::Back => CubeFace::Forward,
        }
    }

    /// Outward-pointing unit normal for this face.
    #[must_use]
    pub fn normal(self) -> DVec3 {
        match self {
            CubeFace::Up => DVec3::Y,
            CubeFace::Down => DVec3::NEG_Y,
            CubeFace::Left => DVec3::NEG_X,
            CubeFace::Right => DVec3::X,
            CubeFace::Forward => DVec3::Z,
            CubeFace::Back => DVec3::NEG_Z,
        }
    }

    /// First in-plane axis: the normal's components rotated one place,
    /// `(n.y, n.z, n.x)`.
    #[must_use]
    pub fn axis_a(self) -> DVec3 {
        let n = self.normal();
        DVec3::new(n.y, n.z, n.x)
    }

    /// Second in-plane axis, `normal × axis_a`.
    #[must_use]
    pub fn axis_b(self) -> DVec3 {
        self.normal().cross(self.axis_a())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_order_is_up_down_left_right_forward_back() {
        let normals: Vec<DVec3> = CubeFace::ALL.iter().map(|f| f.normal()).collect();
        assert_eq!(
            normals,
            vec![
                DVec3::Y,
                DVec3::NEG_Y,
                DVec3::NEG_X,
                DVec3::X,
                DVec3::Z,
                DVec3::NEG_Z
            ]
        );
    }

    #[test]
    fn test_opposite_face_normals_are_antiparallel() {
        for face in CubeFace::ALL {
            let n = face.normal();
            let opp_n = face.opposite().normal();
            assert!(
                (n + opp_n).length() < 1e-12,
                "Normals for {face:?} and {:?} are not antiparallel",
                face.opposite()
            );
        }
    }

    #[test]
    fn test_opposite_is_involution() {
        for face in CubeFace::ALL {
            assert_eq!(face.opposite().opposite(), face);
        }
    }

    #[test]
    fn test_axes_are_unit_and_perpendicular_to_normal() {
        for face in CubeFace::ALL {
            let n = face.normal();
            let a = face.axis_a();
            let b = face.axis_b();
            assert!((a.length() - 1.0).abs() < 1e-12, "axis_a not unit for {face:?}");
            assert!((b.length() - 1.0).abs() < 1e-12, "axis_b not unit for {face:?}");
            assert!(a.dot(n).abs() < 1e-12, "axis_a not perpendicular for {face:?}");
            assert!(b.dot(n).abs() < 1e-12, "axis_b not perpendicular for {face:?}");
            assert!(a.dot(b).abs() < 1e-12, "axes not perpendicular for {face:?}");
        }
    }

    #[test]
    fn test_up_face_axes() {
        assert_eq!(CubeFace::Up.axis_a(), DVec3::X);
        assert_eq!(CubeFace::Up.axis_b(), DVec3::NEG_Z);
    }
}
