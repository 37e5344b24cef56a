use serde::{Deserialize, Serialize};

use crate::constants::{
    CONV_KERNEL, CONV2_FILTERS, EMBEDDING_DIM, GRID_CHANNELS, GRID_HEIGHT, GRID_WIDTH,
    HEAD_HIDDEN_DIM, POOL_SIZE,
};
use crate::model::error::ModelError;
use crate::ops;

/// Topology of the verifier network.
///
/// Serialized verbatim into the artifact header so a loaded model is rebuilt
/// with the exact geometry it was trained with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Grid input height.
    pub grid_height: usize,
    /// Grid input width.
    pub grid_width: usize,
    /// Grid input channels.
    pub grid_channels: usize,
    /// Length of the embedding produced by the encoder.
    pub embedding_dim: usize,
    /// Width of the decision head's hidden layer.
    pub head_hidden_dim: usize,
    /// Registered name of the comparator's merge operation.
    pub merge_op: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            grid_height: GRID_HEIGHT,
            grid_width: GRID_WIDTH,
            grid_channels: GRID_CHANNELS,
            embedding_dim: EMBEDDING_DIM,
            head_hidden_dim: HEAD_HIDDEN_DIM,
            merge_op: ops::ABSOLUTE_DIFFERENCE.to_string(),
        }
    }
}

impl ModelConfig {
    /// Spatial dimensions after the two conv+pool stages, or `None` if the
    /// grid is too small to survive the cascade.
    pub fn conv_output_hw(&self) -> Option<(usize, usize)> {
        let stage = |d: usize| -> Option<usize> {
            let after_conv = d.checked_sub(CONV_KERNEL - 1)?;
            let after_pool = after_conv / POOL_SIZE;
            (after_pool > 0).then_some(after_pool)
        };
        let h = stage(stage(self.grid_height)?)?;
        let w = stage(stage(self.grid_width)?)?;
        Some((h, w))
    }

    /// Width of the flattened feature map entering the projection layer.
    pub fn flattened_dim(&self) -> Option<usize> {
        let (h, w) = self.conv_output_hw()?;
        Some(CONV2_FILTERS * h * w)
    }

    /// Validates that the topology is buildable.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.grid_channels == 0 {
            return Err(ModelError::InvalidConfig {
                reason: "grid_channels must be at least 1".to_string(),
            });
        }
        if self.embedding_dim == 0 || self.head_hidden_dim == 0 {
            return Err(ModelError::InvalidConfig {
                reason: "embedding_dim and head_hidden_dim must be at least 1".to_string(),
            });
        }
        if self.conv_output_hw().is_none() {
            return Err(ModelError::InvalidConfig {
                reason: format!(
                    "grid {}x{} is too small for two {}x{} conv + {}x{} pool stages",
                    self.grid_height, self.grid_width, CONV_KERNEL, CONV_KERNEL, POOL_SIZE,
                    POOL_SIZE
                ),
            });
        }
        if self.merge_op.is_empty() {
            return Err(ModelError::InvalidConfig {
                reason: "merge_op name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
