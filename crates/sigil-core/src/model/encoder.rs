//! Shared-weight feature extractor.
//!
//! One `Encoder` value is applied to both the reference and the query batch;
//! the two branches of the verifier never own separate parameters.

use candle_core::{Module, Tensor};
use candle_nn::{Conv2d, Conv2dConfig, Linear, VarBuilder, conv2d, linear};

use crate::constants::{CONV_KERNEL, CONV1_FILTERS, CONV2_FILTERS, POOL_SIZE};
use crate::model::config::ModelConfig;
use crate::model::error::ModelError;

/// Convolutional encoder mapping a grid batch `(N, H, W, C)` to an embedding
/// batch `(N, D)`.
pub struct Encoder {
    conv1: Conv2d,
    conv2: Conv2d,
    project: Linear,
    config: ModelConfig,
}

impl Encoder {
    /// Builds the encoder's layers under `vb`'s prefix.
    pub fn new(config: &ModelConfig, vb: VarBuilder) -> Result<Self, ModelError> {
        let flattened = config
            .flattened_dim()
            .ok_or_else(|| ModelError::InvalidConfig {
                reason: format!(
                    "grid {}x{} is too small for the conv cascade",
                    config.grid_height, config.grid_width
                ),
            })?;

        let conv_cfg = Conv2dConfig::default();
        let conv1 = conv2d(
            config.grid_channels,
            CONV1_FILTERS,
            CONV_KERNEL,
            conv_cfg,
            vb.pp("conv1"),
        )?;
        let conv2 = conv2d(CONV1_FILTERS, CONV2_FILTERS, CONV_KERNEL, conv_cfg, vb.pp("conv2"))?;
        let project = linear(flattened, config.embedding_dim, vb.pp("project"))?;

        Ok(Self {
            conv1,
            conv2,
            project,
            config: config.clone(),
        })
    }

    /// Encodes a grid batch into embeddings.
    ///
    /// Accepts `(N, H, W, C)` and transposes to channel-first internally;
    /// candle convolutions are NCHW while the public contract stays HWC.
    pub fn forward(&self, grids: &Tensor) -> Result<Tensor, ModelError> {
        let (_, h, w, c) = grids.dims4().map_err(|_| ModelError::ShapeMismatch {
            expected: "(N, H, W, C)".to_string(),
            actual: format!("{:?}", grids.dims()),
        })?;

        if (h, w, c)
            != (
                self.config.grid_height,
                self.config.grid_width,
                self.config.grid_channels,
            )
        {
            return Err(ModelError::ShapeMismatch {
                expected: format!(
                    "(N, {}, {}, {})",
                    self.config.grid_height, self.config.grid_width, self.config.grid_channels
                ),
                actual: format!("{:?}", grids.dims()),
            });
        }

        let x = grids.permute((0, 3, 1, 2))?.contiguous()?;
        let x = self.conv1.forward(&x)?.relu()?;
        let x = x.max_pool2d(POOL_SIZE)?;
        let x = self.conv2.forward(&x)?.relu()?;
        let x = x.max_pool2d(POOL_SIZE)?;
        let x = x.flatten_from(1)?;
        let x = self.project.forward(&x)?.relu()?;
        Ok(x)
    }
}
