//! Crate-wide error type

use thiserror::Error;

/// Errors surfaced by the training harness
#[derive(Debug, Error)]
pub enum Error {
    /// `fit` or `evaluate` was called before a loss function and optimizer
    /// were bound via `compile`.
    #[error("model is not compiled; bind a loss function and optimizer with compile() first")]
    NotCompiled,

    /// A training or evaluation phase received a dataset with zero items.
    #[error("dataset is empty; at least one sample is required")]
    EmptyDataset,

    /// A persisted artifact's parameter name/shape mapping does not match
    /// the target module.
    #[error("artifact does not match module structure: {0}")]
    StructuralMismatch(String),

    /// A forward pass received input incompatible with the module's
    /// expected feature dimension.
    #[error("shape mismatch: input of length {actual} is incompatible with feature dimension {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Artifact read/write failure.
    #[error("artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact encoding/decoding failure.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
