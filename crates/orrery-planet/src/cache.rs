//! Memoised mesh generation keyed by shape content.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{MeshData, MeshError, ShapeSettings, generate_mesh};

/// Cache of generated meshes.
///
/// Generation is pure, so a mesh can be reused for any shape that compares
/// equal to the one it was built from.
#[derive(Debug, Default)]
pub struct MeshCache {
    entries: FxHashMap<ShapeSettings, Arc<MeshData>>,
    hits: u64,
    misses: u64,
}

impl MeshCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached mesh for `shape`, generating it on a miss.
    pub fn get_or_generate(&mut self, shape: &ShapeSettings) -> Result<Arc<MeshData>, MeshError> {
        if let Some(mesh) = self.entries.get(shape) {
            self.hits += 1;
            return Ok(Arc::clone(mesh));
        }

        let mesh = Arc::new(generate_mesh(shape)?);
        self.misses += 1;
        self.entries.insert(shape.clone(), Arc::clone(&mesh));
        Ok(mesh)
    }

    /// Drop every entry whose shape is not in `live`.
    pub fn retain_shapes<'a>(&mut self, live: impl IntoIterator<Item = &'a ShapeSettings>) {
        let live: Vec<&ShapeSettings> = live.into_iter().collect();
        let before = self.entries.len();
        self.entries.retain(|shape, _| live.contains(&shape));
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.entries.len(), "Evicted cached meshes");
        }
    }

    /// Number of cached meshes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no meshes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to generate a mesh.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Remove every cached mesh.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_shape_hits_cache() {
        let mut cache = MeshCache::new();
        let shape = ShapeSettings::new(1.0, 4);

        let first = cache.get_or_generate(&shape).unwrap();
        let second = cache.get_or_generate(&shape.clone()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_shapes_generate_separately() {
        let mut cache = MeshCache::new();
        let a = cache.get_or_generate(&ShapeSettings::new(1.0, 4)).unwrap();
        let b = cache.get_or_generate(&ShapeSettings::new(1.0, 5)).unwrap();
        assert_ne!(a.vertex_count(), b.vertex_count());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = MeshCache::new();
        assert!(cache.get_or_generate(&ShapeSettings::new(1.0, 0)).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_retain_evicts_dead_shapes() {
        let mut cache = MeshCache::new();
        let keep = ShapeSettings::new(1.0, 3);
        let drop = ShapeSettings::new(2.0, 3);
        cache.get_or_generate(&keep).unwrap();
        cache.get_or_generate(&drop).unwrap();

        cache.retain_shapes([&keep]);
        assert_eq!(cache.len(), 1);
        cache.get_or_generate(&keep).unwrap();
        assert_eq!(cache.hits(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
