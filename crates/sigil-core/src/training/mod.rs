//! Training orchestration.
//!
//! Single-job, single-threaded at the orchestration level: one epoch, one
//! mini-batch at a time. The orchestrator is the sole writer of the model
//! artifact; serving never shares state with it beyond that file.

pub mod config;
pub mod dataset;
pub mod error;
pub mod loss;
pub mod split;
pub mod synthetic;

pub(crate) mod rng;


pub use config::TrainConfig;
pub use dataset::PairSet;
pub use error::TrainingError;
pub use loss::cost_weighted_loss;
pub use split::split_indices;

use std::path::Path;

use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use tracing::{debug, info};

use crate::artifact;
use crate::model::{ModelConfig, SiameseVerifier};

/// Per-epoch loss summary.
#[derive(Debug, Clone)]
pub struct EpochStats {
    pub epoch: usize,
    pub train_loss: f64,
    /// `None` when the split left no validation samples.
    pub val_loss: Option<f64>,
}

/// Outcome of a completed training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub train_samples: usize,
    pub val_samples: usize,
    pub epochs: Vec<EpochStats>,
}

/// Drives mini-batch gradient descent over a [`PairSet`] and persists the
/// result as a model artifact.
pub struct Trainer {
    config: TrainConfig,
}

impl Trainer {
    /// Creates a trainer after validating the configuration.
    pub fn new(config: TrainConfig) -> Result<Self, TrainingError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Trains a fresh verifier on `data` and returns it with the run report.
    pub fn fit(
        &self,
        data: &PairSet,
        model_config: ModelConfig,
    ) -> Result<(SiameseVerifier, TrainReport), TrainingError> {
        if data.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }

        let (train_idx, val_idx) =
            split_indices(data.len(), self.config.split_ratio, self.config.seed);
        if train_idx.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }

        let train = data.select(&train_idx)?;
        let validation = if val_idx.is_empty() {
            None
        } else {
            Some(data.select(&val_idx)?)
        };

        info!(
            train_samples = train.len(),
            val_samples = validation.as_ref().map_or(0, PairSet::len),
            epochs = self.config.epochs,
            batch_size = self.config.batch_size,
            seed = self.config.seed,
            "Starting training run"
        );

        let model = SiameseVerifier::new(model_config, data.device())?;

        let params = ParamsAdamW {
            lr: self.config.learning_rate,
            ..Default::default()
        };
        let mut optimizer = AdamW::new(model.varmap().all_vars(), params)?;

        let mut epochs = Vec::with_capacity(self.config.epochs);
        for epoch in 0..self.config.epochs {
            let train_loss = self.run_epoch(&model, &train, &mut optimizer)?;
            let val_loss = match &validation {
                Some(val) => Some(self.evaluate(&model, val)?),
                None => None,
            };

            info!(
                epoch,
                train_loss,
                val_loss = val_loss.unwrap_or(f64::NAN),
                "Epoch complete"
            );
            epochs.push(EpochStats {
                epoch,
                train_loss,
                val_loss,
            });
        }

        let report = TrainReport {
            train_samples: train.len(),
            val_samples: validation.as_ref().map_or(0, PairSet::len),
            epochs,
        };
        Ok((model, report))
    }

    /// Trains and serializes the resulting verifier to `artifact_path`.
    pub fn run(
        &self,
        data: &PairSet,
        model_config: ModelConfig,
        artifact_path: &Path,
    ) -> Result<TrainReport, TrainingError> {
        let (model, report) = self.fit(data, model_config)?;
        artifact::save(&model, artifact_path)?;
        info!(path = %artifact_path.display(), "Model artifact written");
        Ok(report)
    }

    fn run_epoch(
        &self,
        model: &SiameseVerifier,
        train: &PairSet,
        optimizer: &mut AdamW,
    ) -> Result<f64, TrainingError> {
        let n = train.len();
        let batch_size = self.config.batch_size;
        let n_batches = n.div_ceil(batch_size);

        let mut loss_sum = 0.0f64;
        for batch_idx in 0..n_batches {
            let start = batch_idx * batch_size;
            let len = batch_size.min(n - start);
            let batch = train.batch(start, len)?;

            let predictions = model.forward(
                batch.references(),
                batch.queries(),
                batch.side_features(),
            )?;
            let loss = cost_weighted_loss(&predictions, batch.targets(), self.config.alpha)?;
            optimizer.backward_step(&loss)?;

            let batch_loss = loss.to_scalar::<f32>()? as f64;
            loss_sum += batch_loss * len as f64;
            debug!(batch = batch_idx, loss = batch_loss, "Batch step");
        }

        Ok(loss_sum / n as f64)
    }

    fn evaluate(&self, model: &SiameseVerifier, data: &PairSet) -> Result<f64, TrainingError> {
        let predictions = model.forward(data.references(), data.queries(), data.side_features())?;
        let loss = cost_weighted_loss(&predictions, data.targets(), self.config.alpha)?;
        Ok(loss.to_scalar::<f32>()? as f64)
    }
}
