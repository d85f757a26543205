//! Dataset abstraction consumed by the harness
//!
//! The harness only needs counted, indexed access to `(features, label)`
//! pairs; batching and shuffling live in the training loop. Datasets are
//! fully in-memory: streaming backings would implement the same trait.

use crate::{Error, Result};

/// Indexed access to labeled samples
pub trait Dataset {
    /// Number of items
    fn len(&self) -> usize;

    /// Whether the dataset holds no items
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Features per item
    fn feature_dim(&self) -> usize;

    /// The `(features, class label)` pair at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    fn get(&self, index: usize) -> (&[f32], usize);
}

/// A dataset backed by a flat feature buffer
pub struct InMemoryDataset {
    features: Vec<f32>,
    labels: Vec<usize>,
    feature_dim: usize,
}

impl InMemoryDataset {
    /// Build from per-item feature rows; all rows must share one width
    pub fn new(rows: Vec<Vec<f32>>, labels: Vec<usize>) -> Result<Self> {
        if rows.len() != labels.len() {
            return Err(Error::ShapeMismatch { expected: rows.len(), actual: labels.len() });
        }
        let feature_dim = rows.first().map_or(0, Vec::len);
        let mut features = Vec::with_capacity(rows.len() * feature_dim);
        for row in &rows {
            if row.len() != feature_dim {
                return Err(Error::ShapeMismatch { expected: feature_dim, actual: row.len() });
            }
            features.extend_from_slice(row);
        }
        Ok(Self { features, labels, feature_dim })
    }

    /// Build from an already flattened row-major feature buffer
    pub fn from_flat(features: Vec<f32>, feature_dim: usize, labels: Vec<usize>) -> Result<Self> {
        if feature_dim == 0 || features.len() != labels.len() * feature_dim {
            return Err(Error::ShapeMismatch {
                expected: labels.len() * feature_dim,
                actual: features.len(),
            });
        }
        Ok(Self { features, labels, feature_dim })
    }

    /// An empty dataset with the given feature width
    pub fn empty(feature_dim: usize) -> Self {
        Self { features: Vec::new(), labels: Vec::new(), feature_dim }
    }
}

impl Dataset for InMemoryDataset {
    fn len(&self) -> usize {
        self.labels.len()
    }

    fn feature_dim(&self) -> usize {
        self.feature_dim
    }

    fn get(&self, index: usize) -> (&[f32], usize) {
        assert!(index < self.len(), "sample index {index} is out of bounds");
        let start = index * self.feature_dim;
        (&self.features[start..start + self.feature_dim], self.labels[index])
    }
}
