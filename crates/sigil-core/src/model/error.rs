use thiserror::Error;

use crate::shape::ShapeError;

/// Errors produced by model construction and inference.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Tensor dimensions are incompatible with the model topology.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// The configured merge operation is not in the registry.
    #[error("merge operation `{name}` is not registered")]
    UnresolvedOperation { name: String },

    /// The model configuration is internally inconsistent.
    #[error("invalid model configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("shape adaptation failed: {0}")]
    Shape(#[from] ShapeError),

    #[error("tensor operation failed: {0}")]
    Tensor(#[from] candle_core::Error),
}
