//! Sigil library crate (used by the server and integration tests).
//!
//! Cost-aware siamese authenticity verification: a single shared-weight
//! encoder embeds a reference and a query grid, a named comparator merges
//! the embeddings into a dissimilarity vector, and a small decision head
//! combines it with a scalar side feature into a match probability.
//! Training weights each sample's cross-entropy by its transaction value.
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`SiameseVerifier`], [`ModelConfig`], [`ModelError`] - The network
//! - [`Trainer`], [`TrainConfig`], [`PairSet`], [`TrainingError`] - Training
//! - [`cost_weighted_loss`], [`split_indices`] - Training primitives
//! - [`artifact`] - Single-file model persistence
//! - [`ops`] - The merge-operation registry; call
//!   [`register_builtin_ops`] at process start, before any artifact load
//! - [`shape`] - Rank adaptation for the serving boundary

pub mod artifact;
pub mod config;
pub mod constants;
pub mod model;
pub mod ops;
pub mod shape;
pub mod training;

pub use artifact::ArtifactError;
pub use config::{Config, ConfigError};
pub use model::{
    DecisionHead, Encoder, ModelConfig, ModelError, SiameseVerifier, select_device,
};
pub use ops::{
    ABSOLUTE_DIFFERENCE, MergeFn, absolute_difference, is_registered, register_builtin_ops,
    register_merge_op, resolve_merge_op, unregister_merge_op,
};
pub use shape::{ShapeError, adapt_grid, adapt_side_feature};
pub use training::{
    EpochStats, PairSet, TrainConfig, TrainReport, Trainer, TrainingError, cost_weighted_loss,
    split_indices,
};
