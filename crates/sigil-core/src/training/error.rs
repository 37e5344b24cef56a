use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::model::ModelError;

/// Errors produced by dataset assembly and training.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// The five input streams disagree on sample count or geometry.
    #[error("input streams disagree: {reason}")]
    ShapeMismatch { reason: String },

    /// No samples to train on.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Transaction values must be non-negative.
    #[error("transaction value at index {index} is negative: {value}")]
    InvalidTransactionValue { index: usize, value: f32 },

    /// The training configuration is internally inconsistent.
    #[error("invalid training configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("tensor operation failed: {0}")]
    Tensor(#[from] candle_core::Error),
}
