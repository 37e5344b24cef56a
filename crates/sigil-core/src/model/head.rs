//! Decision head: dissimilarity vector + side feature → probability.

use candle_core::{Module, Tensor};
use candle_nn::{Linear, VarBuilder, linear, ops::sigmoid};

use crate::model::config::ModelConfig;
use crate::model::error::ModelError;

/// Two dense transformations collapsing the concatenated dissimilarity
/// vector and side feature to a single probability in (0, 1).
pub struct DecisionHead {
    hidden: Linear,
    output: Linear,
    embedding_dim: usize,
}

impl DecisionHead {
    /// Builds the head's layers under `vb`'s prefix.
    ///
    /// The hidden layer consumes the dissimilarity vector plus one side
    /// feature column, hence `embedding_dim + 1` inputs.
    pub fn new(config: &ModelConfig, vb: VarBuilder) -> Result<Self, ModelError> {
        let hidden = linear(
            config.embedding_dim + 1,
            config.head_hidden_dim,
            vb.pp("hidden"),
        )?;
        let output = linear(config.head_hidden_dim, 1, vb.pp("output"))?;

        Ok(Self {
            hidden,
            output,
            embedding_dim: config.embedding_dim,
        })
    }

    /// Maps a dissimilarity batch `(N, D)` and a side-feature batch `(N, 1)`
    /// to a probability batch `(N, 1)`.
    ///
    /// The side feature must already be shaped `(N, 1)`; rank adaptation is
    /// the caller's responsibility (see [`crate::shape`]).
    pub fn forward(&self, dissimilarity: &Tensor, side_feature: &Tensor) -> Result<Tensor, ModelError> {
        let (n, d) = dissimilarity.dims2().map_err(|_| ModelError::ShapeMismatch {
            expected: "(N, D) dissimilarity batch".to_string(),
            actual: format!("{:?}", dissimilarity.dims()),
        })?;
        if d != self.embedding_dim {
            return Err(ModelError::ShapeMismatch {
                expected: format!("(N, {})", self.embedding_dim),
                actual: format!("{:?}", dissimilarity.dims()),
            });
        }

        let (sn, sc) = side_feature.dims2().map_err(|_| ModelError::ShapeMismatch {
            expected: "(N, 1) side-feature batch".to_string(),
            actual: format!("{:?}", side_feature.dims()),
        })?;
        if sn != n || sc != 1 {
            return Err(ModelError::ShapeMismatch {
                expected: format!("({n}, 1)"),
                actual: format!("{:?}", side_feature.dims()),
            });
        }

        let x = Tensor::cat(&[dissimilarity, side_feature], 1)?;
        let x = self.hidden.forward(&x)?.relu()?;
        let logits = self.output.forward(&x)?;
        Ok(sigmoid(&logits)?)
    }
}
