//! Paired-sample dataset assembly.

use candle_core::{Device, Tensor};

use crate::shape;
use crate::training::error::TrainingError;

/// A validated collection of paired samples ready for training.
///
/// Holds the reference and query grid batches, the side-feature column, and
/// the 2-column target (column 0: label, column 1: transaction value).
#[derive(Debug)]
pub struct PairSet {
    references: Tensor,
    queries: Tensor,
    side_features: Tensor,
    targets: Tensor,
}

impl PairSet {
    /// Bundles the five input streams into one dataset.
    ///
    /// `references` and `queries` must be `(N, H, W, C)` with identical
    /// dims; `side_features` accepts rank 0/1/2 and is normalized to
    /// `(N, 1)`; `labels` and `values` must each have `N` entries, and every
    /// value must be non-negative. Any disagreement is fatal here, before a
    /// single batch is constructed.
    pub fn new(
        references: Tensor,
        queries: Tensor,
        side_features: Tensor,
        labels: &[f32],
        values: &[f32],
    ) -> Result<Self, TrainingError> {
        let n = batch_len(&references, "references")?;

        if references.dims() != queries.dims() {
            return Err(TrainingError::ShapeMismatch {
                reason: format!(
                    "references {:?} vs queries {:?}",
                    references.dims(),
                    queries.dims()
                ),
            });
        }

        let side_features = shape::adapt_side_feature("side_features", &side_features)
            .map_err(|e| TrainingError::ShapeMismatch {
                reason: e.to_string(),
            })?;
        let side_n = side_features.dims()[0];
        if side_n != n {
            return Err(TrainingError::ShapeMismatch {
                reason: format!("{n} grid pairs but {side_n} side features"),
            });
        }

        if labels.len() != n || values.len() != n {
            return Err(TrainingError::ShapeMismatch {
                reason: format!(
                    "{n} grid pairs but {} labels and {} transaction values",
                    labels.len(),
                    values.len()
                ),
            });
        }

        for (index, &value) in values.iter().enumerate() {
            if value < 0.0 || !value.is_finite() {
                return Err(TrainingError::InvalidTransactionValue { index, value });
            }
        }

        let device = references.device().clone();
        let label_col = Tensor::from_slice(labels, n, &device)?;
        let value_col = Tensor::from_slice(values, n, &device)?;
        let targets = Tensor::stack(&[&label_col, &value_col], 1)?;

        Ok(Self {
            references,
            queries,
            side_features,
            targets,
        })
    }

    /// Number of paired samples.
    pub fn len(&self) -> usize {
        self.references.dims()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Device the dataset's tensors live on.
    pub fn device(&self) -> &Device {
        self.references.device()
    }

    pub fn references(&self) -> &Tensor {
        &self.references
    }

    pub fn queries(&self) -> &Tensor {
        &self.queries
    }

    pub fn side_features(&self) -> &Tensor {
        &self.side_features
    }

    /// The `(N, 2)` target: column 0 label, column 1 transaction value.
    pub fn targets(&self) -> &Tensor {
        &self.targets
    }

    /// Selects the samples at `indices`, preserving order.
    pub fn select(&self, indices: &[u32]) -> Result<Self, TrainingError> {
        let ids = Tensor::from_slice(indices, indices.len(), self.device())?;
        Ok(Self {
            references: self.references.index_select(&ids, 0)?,
            queries: self.queries.index_select(&ids, 0)?,
            side_features: self.side_features.index_select(&ids, 0)?,
            targets: self.targets.index_select(&ids, 0)?,
        })
    }

    /// A contiguous mini-batch `[start, start + len)`.
    pub fn batch(&self, start: usize, len: usize) -> Result<Self, TrainingError> {
        Ok(Self {
            references: self.references.narrow(0, start, len)?,
            queries: self.queries.narrow(0, start, len)?,
            side_features: self.side_features.narrow(0, start, len)?,
            targets: self.targets.narrow(0, start, len)?,
        })
    }
}

fn batch_len(tensor: &Tensor, name: &str) -> Result<usize, TrainingError> {
    if tensor.rank() != 4 {
        return Err(TrainingError::ShapeMismatch {
            reason: format!(
                "{name} must be rank 4 (N, H, W, C), got {:?}",
                tensor.dims()
            ),
        });
    }
    Ok(tensor.dims()[0])
}
