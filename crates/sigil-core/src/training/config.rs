use std::env;

use crate::constants::{
    DEFAULT_ALPHA, DEFAULT_BATCH_SIZE, DEFAULT_EPOCHS, DEFAULT_LEARNING_RATE, DEFAULT_SEED,
    DEFAULT_SPLIT_RATIO,
};
use crate::training::error::TrainingError;

/// Hyperparameters of a training run.
///
/// Use [`TrainConfig::from_env`] to read `SIGIL_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of passes over the training split. Default: `10`.
    pub epochs: usize,

    /// Mini-batch size. Default: `16`.
    pub batch_size: usize,

    /// AdamW learning rate. Default: `1e-3`.
    pub learning_rate: f64,

    /// Discount on the gain branch of the cost-weighted objective.
    /// Default: `0.25`.
    pub alpha: f64,

    /// Fraction of samples assigned to the training split. Default: `0.8`.
    pub split_ratio: f64,

    /// Seed for the deterministic train/validation shuffle. Default: `42`.
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: DEFAULT_EPOCHS,
            batch_size: DEFAULT_BATCH_SIZE,
            learning_rate: DEFAULT_LEARNING_RATE,
            alpha: DEFAULT_ALPHA,
            split_ratio: DEFAULT_SPLIT_RATIO,
            seed: DEFAULT_SEED,
        }
    }
}

impl TrainConfig {
    pub const ENV_EPOCHS: &'static str = "SIGIL_EPOCHS";
    pub const ENV_BATCH_SIZE: &'static str = "SIGIL_BATCH_SIZE";
    pub const ENV_LEARNING_RATE: &'static str = "SIGIL_LEARNING_RATE";
    pub const ENV_ALPHA: &'static str = "SIGIL_ALPHA";
    pub const ENV_SPLIT_RATIO: &'static str = "SIGIL_SPLIT_RATIO";
    pub const ENV_SEED: &'static str = "SIGIL_SEED";

    /// Loads hyperparameters from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            epochs: parse_env(Self::ENV_EPOCHS, defaults.epochs),
            batch_size: parse_env(Self::ENV_BATCH_SIZE, defaults.batch_size),
            learning_rate: parse_env(Self::ENV_LEARNING_RATE, defaults.learning_rate),
            alpha: parse_env(Self::ENV_ALPHA, defaults.alpha),
            split_ratio: parse_env(Self::ENV_SPLIT_RATIO, defaults.split_ratio),
            seed: parse_env(Self::ENV_SEED, defaults.seed),
        }
    }

    /// Validates basic invariants.
    pub fn validate(&self) -> Result<(), TrainingError> {
        if self.epochs == 0 {
            return Err(TrainingError::InvalidConfig {
                reason: "epochs must be at least 1".to_string(),
            });
        }
        if self.batch_size == 0 {
            return Err(TrainingError::InvalidConfig {
                reason: "batch_size must be at least 1".to_string(),
            });
        }
        if !(self.learning_rate > 0.0) {
            return Err(TrainingError::InvalidConfig {
                reason: format!("learning_rate must be positive, got {}", self.learning_rate),
            });
        }
        if !(0.0..=1.0).contains(&self.alpha) || !self.alpha.is_finite() {
            return Err(TrainingError::InvalidConfig {
                reason: format!("alpha must be in [0, 1], got {}", self.alpha),
            });
        }
        if !(self.split_ratio > 0.0 && self.split_ratio <= 1.0) {
            return Err(TrainingError::InvalidConfig {
                reason: format!("split_ratio must be in (0, 1], got {}", self.split_ratio),
            });
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(var_name: &str, default: T) -> T {
    env::var(var_name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
