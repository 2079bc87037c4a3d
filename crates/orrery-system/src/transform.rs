//! Host-side placement of bodies.

use glam::{DQuat, DVec3};
use orrery_physics::BodyId;
use rustc_hash::FxHashMap;

/// World placement of one body as seen by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: DVec3,
    /// Axial tilt; identity until the body is placed.
    pub rotation: DQuat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
        }
    }
}

/// Where the host keeps the visual placement of each body.
///
/// Implemented by scene graphs; [`TransformTable`] is the in-memory version.
pub trait BodyTransforms {
    /// Current position of `id`, if the host knows it.
    fn position(&self, id: BodyId) -> Option<DVec3>;

    /// Move `id`, creating its entry if needed.
    fn set_position(&mut self, id: BodyId, position: DVec3);

    /// Rotate `id`, creating its entry if needed.
    fn set_rotation(&mut self, id: BodyId, rotation: DQuat);

    /// Forget `id` after it was removed from the system.
    fn remove(&mut self, id: BodyId);
}

/// Transforms stored in a hash map keyed by body.
#[derive(Clone, Debug, Default)]
pub struct TransformTable {
    entries: FxHashMap<BodyId, Transform>,
}

impl TransformTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Full transform of `id`.
    pub fn get(&self, id: BodyId) -> Option<&Transform> {
        self.entries.get(&id)
    }

    /// Rotation of `id`.
    pub fn rotation(&self, id: BodyId) -> Option<DQuat> {
        self.entries.get(&id).map(|t| t.rotation)
    }

    /// Number of bodies with a transform.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no body has a transform.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BodyTransforms for TransformTable {
    fn position(&self, id: BodyId) -> Option<DVec3> {
        self.entries.get(&id).map(|t| t.position)
    }

    fn set_position(&mut self, id: BodyId, position: DVec3) {
        self.entries.entry(id).or_default().position = position;
    }

    fn set_rotation(&mut self, id: BodyId, rotation: DQuat) {
        self.entries.entry(id).or_default().rotation = rotation;
    }

    fn remove(&mut self, id: BodyId) {
        self.entries.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_creates_entry() {
        let mut table = TransformTable::new();
        assert!(table.position(BodyId(1)).is_none());

        table.set_position(BodyId(1), DVec3::X);
        assert_eq!(table.position(BodyId(1)), Some(DVec3::X));
        assert_eq!(table.rotation(BodyId(1)), Some(DQuat::IDENTITY));
    }

    #[test]
    fn test_rotation_and_position_independent() {
        let mut table = TransformTable::new();
        let tilt = DQuat::from_rotation_x(0.5);
        table.set_rotation(BodyId(2), tilt);
        table.set_position(BodyId(2), DVec3::Y);
        assert_eq!(
            table.get(BodyId(2)),
            Some(&Transform {
                position: DVec3::Y,
                rotation: tilt
            })
        );
    }

    #[test]
    fn test_remove() {
        let mut table = TransformTable::new();
        table.set_position(BodyId(3), DVec3::Z);
        table.remove(BodyId(3));
        assert!(table.is_empty());
    }
}
