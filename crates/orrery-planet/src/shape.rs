//! Resolved shape parameters consumed by the mesh generator.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use orrery_config::ShapeConfig;

use crate::{HeightField, HeightFieldError, HeightFieldProvider};

/// Everything the mesh generator needs to build one planet surface.
///
/// Equality and hashing are bitwise on the floating-point fields and by
/// content on the height field, so two settings that generate the same mesh
/// compare equal.
#[derive(Clone, Debug)]
pub struct ShapeSettings {
    /// Base sphere radius.
    pub radius: f64,
    /// Vertices per cube-face edge.
    pub resolution: u32,
    /// Scale applied to normalised height samples.
    pub elevation: i32,
    /// Optional displacement map.
    pub height_field: Option<Arc<HeightField>>,
}

impl ShapeSettings {
    /// A smooth sphere with no height field.
    pub fn new(radius: f64, resolution: u32) -> Self {
        Self {
            radius,
            resolution,
            elevation: 0,
            height_field: None,
        }
    }

    /// Attach a height field and its elevation scale.
    #[must_use]
    pub fn with_height_field(mut self, field: Arc<HeightField>, elevation: i32) -> Self {
        self.height_field = Some(field);
        self.elevation = elevation;
        self
    }

    /// Resolve a [`ShapeConfig`], loading its height map through `provider`.
    pub fn from_config(
        config: &ShapeConfig,
        provider: &dyn HeightFieldProvider,
    ) -> Result<Self, HeightFieldError> {
        let height_field = config
            .height_map
            .as_deref()
            .map(|path| provider.load(path))
            .transpose()?;

        Ok(Self {
            radius: config.radius,
            resolution: config.resolution,
            elevation: config.elevation,
            height_field,
        })
    }
}

impl PartialEq for ShapeSettings {
    fn eq(&self, other: &Self) -> bool {
        self.radius.to_bits() == other.radius.to_bits()
            && self.resolution == other.resolution
            && self.elevation == other.elevation
            && match (&self.height_field, &other.height_field) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a == b,
                _ => false,
            }
    }
}

impl Eq for ShapeSettings {}

impl Hash for ShapeSettings {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.radius.to_bits().hash(state);
        self.resolution.hash(state);
        self.elevation.hash(state);
        self.height_field.as_deref().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::HeightFieldLibrary;

    #[test]
    fn test_from_config_without_height_map() {
        let config = ShapeConfig {
            radius: 3.0,
            resolution: 8,
            elevation: 2,
            ..ShapeConfig::default()
        };
        let shape = ShapeSettings::from_config(&config, &HeightFieldLibrary::new()).unwrap();
        assert_eq!(shape.radius, 3.0);
        assert_eq!(shape.resolution, 8);
        assert_eq!(shape.elevation, 2);
        assert!(shape.height_field.is_none());
    }

    #[test]
    fn test_from_config_loads_height_map() {
        let mut library = HeightFieldLibrary::new();
        library.insert("bumps.png", HeightField::new(1, 1, vec![0.5]).unwrap());
        let config = ShapeConfig {
            height_map: Some(PathBuf::from("bumps.png")),
            ..ShapeConfig::default()
        };
        let shape = ShapeSettings::from_config(&config, &library).unwrap();
        assert_eq!(shape.height_field.unwrap().sample(0, 0), 0.5);
    }

    #[test]
    fn test_from_config_propagates_missing_map() {
        let config = ShapeConfig {
            height_map: Some(PathBuf::from("missing.png")),
            ..ShapeConfig::default()
        };
        let result = ShapeSettings::from_config(&config, &HeightFieldLibrary::new());
        assert!(matches!(result, Err(HeightFieldError::NotFound(_))));
    }

    #[test]
    fn test_equality_is_by_height_field_content() {
        let a = Arc::new(HeightField::new(2, 1, vec![0.1, 0.2]).unwrap());
        let b = Arc::new(HeightField::new(2, 1, vec![0.1, 0.2]).unwrap());
        let shape_a = ShapeSettings::new(1.0, 4).with_height_field(a, 1);
        let shape_b = ShapeSettings::new(1.0, 4).with_height_field(b, 1);
        assert_eq!(shape_a, shape_b);
        assert_ne!(shape_a, ShapeSettings::new(1.0, 4));
        assert_ne!(ShapeSettings::new(1.0, 4), ShapeSettings::new(1.0, 5));
    }
}
