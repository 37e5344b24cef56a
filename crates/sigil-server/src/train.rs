//! In-process training entry point (`sigil train`).
//!
//! Generates simulated pairs, runs the trainer, and writes the model
//! artifact the serving path loads at startup.

use tracing::info;

use sigil::config::Config;
use sigil::model::{ModelConfig, select_device};
use sigil::training::{TrainConfig, Trainer, synthetic};
use sigil::ops;

/// Number of simulated pairs when `SIGIL_TRAIN_PAIRS` is not set.
pub const DEFAULT_TRAIN_PAIRS: usize = 200;

const ENV_TRAIN_PAIRS: &str = "SIGIL_TRAIN_PAIRS";

/// Runs a full training job and writes the artifact to the configured path.
pub fn run_training() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    config.validate()?;

    let train_config = TrainConfig::from_env();
    let num_pairs = std::env::var(ENV_TRAIN_PAIRS)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_TRAIN_PAIRS);

    ops::register_builtin_ops();
    let device = select_device()?;

    info!(
        pairs = num_pairs,
        epochs = train_config.epochs,
        batch_size = train_config.batch_size,
        seed = train_config.seed,
        artifact = %config.artifact_path.display(),
        "Starting training job"
    );

    let data = synthetic::generate_pairs(num_pairs, train_config.seed, &device)?;
    let trainer = Trainer::new(train_config)?;
    let report = trainer.run(&data, ModelConfig::default(), &config.artifact_path)?;

    if let Some(last) = report.epochs.last() {
        info!(
            train_loss = last.train_loss,
            val_loss = last.val_loss.unwrap_or(f64::NAN),
            train_samples = report.train_samples,
            val_samples = report.val_samples,
            "Training complete"
        );
    }

    Ok(())
}
