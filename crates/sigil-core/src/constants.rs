//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary values (e.g. flattened encoder width) from
//! primary ones via [`ModelConfig`](crate::model::ModelConfig) rather than
//! duplicating them here.

/// Default grid input height.
pub const GRID_HEIGHT: usize = 28;
/// Default grid input width.
pub const GRID_WIDTH: usize = 28;
/// Default grid input channel count.
pub const GRID_CHANNELS: usize = 3;

/// Length of the embedding produced by the encoder.
pub const EMBEDDING_DIM: usize = 128;
/// Width of the decision head's hidden dense layer.
pub const HEAD_HIDDEN_DIM: usize = 64;

/// Filter count of the first convolution stage.
pub const CONV1_FILTERS: usize = 32;
/// Filter count of the second convolution stage.
pub const CONV2_FILTERS: usize = 64;
/// Square kernel size used by both convolution stages.
pub const CONV_KERNEL: usize = 3;
/// Square window used by both max-pooling stages.
pub const POOL_SIZE: usize = 2;

/// Discount applied to the gain branch of the cost-weighted objective:
/// a correctly accepted genuine sample is rewarded at this fraction of its
/// transaction value, while a missed fraud costs the full value.
pub const DEFAULT_ALPHA: f64 = 0.25;

/// Numerical floor added inside every logarithm of the loss. Keeps the loss
/// finite when a prediction saturates at exactly 0 or 1.
pub const LOG_EPSILON: f64 = 1e-9;

/// Default fraction of samples assigned to the training side of the split.
pub const DEFAULT_SPLIT_RATIO: f64 = 0.8;
/// Default number of training epochs.
pub const DEFAULT_EPOCHS: usize = 10;
/// Default mini-batch size.
pub const DEFAULT_BATCH_SIZE: usize = 16;
/// Default AdamW learning rate.
pub const DEFAULT_LEARNING_RATE: f64 = 1e-3;
/// Default PRNG seed for the train/validation split and synthetic data.
pub const DEFAULT_SEED: u64 = 42;
