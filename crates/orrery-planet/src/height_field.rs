//! Grayscale height fields and the providers that load them.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHasher};
use tracing::debug;

/// Errors raised while building or loading a [`HeightField`].
#[derive(Debug, thiserror::Error)]
pub enum HeightFieldError {
    /// Width or height is zero.
    #[error("height field must not be empty (got {width}x{height})")]
    Empty {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The value buffer does not hold `width * height` samples.
    #[error("height field expects {expected} samples, got {actual}")]
    SizeMismatch {
        /// `width * height`.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },

    /// A sample is NaN or infinite.
    #[error("height field sample at ({x}, {y}) is not finite")]
    NonFinite {
        /// Column of the bad sample.
        x: u32,
        /// Row of the bad sample.
        y: u32,
    },

    /// The image could not be opened or decoded.
    #[error("failed to load height map {path}: {source}")]
    Decode {
        /// Path that was loaded.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// A provider has no height field registered under this path.
    #[error("no height field registered for {0}")]
    NotFound(PathBuf),
}

/// A 2D grid of height samples in `[0, 1]`, indexed geographically.
///
/// Row `0` is the south edge (`v = 0`) and column `0` is the ±180° seam
/// (`u = 0`). Samples are read by nearest index only.
#[derive(Clone, Debug)]
pub struct HeightField {
    width: u32,
    height: u32,
    values: Vec<f32>,
    fingerprint: u64,
}

impl HeightField {
    /// Build a height field from row-major samples, south row first.
    ///
    /// Samples are clamped to `[0, 1]`.
    pub fn new(width: u32, height: u32, mut values: Vec<f32>) -> Result<Self, HeightFieldError> {
        if width == 0 || height == 0 {
            return Err(HeightFieldError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(HeightFieldError::SizeMismatch {
                expected,
                actual: values.len(),
            });
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(HeightFieldError::NonFinite {
                x: (i % width as usize) as u32,
                y: (i / width as usize) as u32,
            });
        }
        for v in &mut values {
            *v = v.clamp(0.0, 1.0);
        }

        let mut hasher = FxHasher::default();
        width.hash(&mut hasher);
        height.hash(&mut hasher);
        for v in &values {
            v.to_bits().hash(&mut hasher);
        }

        Ok(Self {
            width,
            height,
            values,
            fingerprint: hasher.finish(),
        })
    }

    /// Build a height field by evaluating `f(x, y)` for every cell.
    pub fn from_fn(
        width: u32,
        height: u32,
        f: impl Fn(u32, u32) -> f32,
    ) -> Result<Self, HeightFieldError> {
        let mut values = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                values.push(f(x, y));
            }
        }
        Self::new(width, height, values)
    }

    /// Convert an image to luminance samples.
    ///
    /// Image rows are stored top-down, so they are flipped to put the south
    /// edge at row `0`.
    pub fn from_image(image: &image::DynamicImage) -> Result<Self, HeightFieldError> {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        Self::from_fn(width, height, |x, y| {
            f32::from(gray.get_pixel(x, height - 1 - y).0[0]) / 255.0
        })
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample at `(x, y)`, with indices clamped to the grid.
    pub fn sample(&self, x: u32, y: u32) -> f32 {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        self.values[y * self.width as usize + x]
    }
}

impl PartialEq for HeightField {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
            && self.width == other.width
            && self.height == other.height
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for HeightField {}

impl Hash for HeightField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint.hash(state);
    }
}

/// Source of height fields for the paths named in shape configuration.
pub trait HeightFieldProvider {
    /// Load (or fetch) the height field stored at `path`.
    fn load(&self, path: &Path) -> Result<Arc<HeightField>, HeightFieldError>;
}

/// Decodes PNG/JPEG height maps from disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageHeightFieldProvider;

impl HeightFieldProvider for ImageHeightFieldProvider {
    fn load(&self, path: &Path) -> Result<Arc<HeightField>, HeightFieldError> {
        let image = image::open(path).map_err(|source| HeightFieldError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let field = HeightField::from_image(&image)?;
        debug!(
            path = %path.display(),
            width = field.width(),
            height = field.height(),
            "Loaded height map"
        );
        Ok(Arc::new(field))
    }
}

/// Height fields registered in memory under a path, for hosts that decode
/// textures themselves.
#[derive(Clone, Debug, Default)]
pub struct HeightFieldLibrary {
    fields: FxHashMap<PathBuf, Arc<HeightField>>,
}

impl HeightFieldLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `field` under `path`, replacing any previous entry.
    pub fn insert(&mut self, path: impl Into<PathBuf>, field: HeightField) {
        self.fields.insert(path.into(), Arc::new(field));
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl HeightFieldProvider for HeightFieldLibrary {
    fn load(&self, path: &Path) -> Result<Arc<HeightField>, HeightFieldError> {
        self.fields
            .get(path)
            .cloned()
            .ok_or_else(|| HeightFieldError::NotFound(path.to_path_buf()))
    }
}
