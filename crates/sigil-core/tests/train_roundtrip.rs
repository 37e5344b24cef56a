//! End-to-end: synthetic data -> training -> artifact -> serving parity.

use candle_core::Device;
use tempfile::TempDir;

use sigil::model::ModelConfig;
use sigil::training::{synthetic, TrainConfig, Trainer};
use sigil::{artifact, ops};

#[test]
fn test_train_save_load_predict() {
    ops::register_builtin_ops();
    let device = Device::Cpu;

    let data = synthetic::generate_pairs(20, 42, &device).expect("synthetic data");

    let config = TrainConfig {
        epochs: 2,
        batch_size: 8,
        ..Default::default()
    };
    let trainer = Trainer::new(config).expect("trainer");
    let (model, report) = trainer.fit(&data, ModelConfig::default()).expect("fit");

    assert_eq!(report.train_samples + report.val_samples, 20);
    assert_eq!(report.epochs.len(), 2);

    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("verifier.sgla");
    artifact::save(&model, &path).expect("save");

    let restored = artifact::load(&path, &device).expect("load");

    // The loaded verifier must agree with the trained one on fresh inputs.
    let probe = synthetic::generate_pairs(4, 7, &device).expect("probe data");
    let before = model
        .forward(probe.references(), probe.queries(), probe.side_features())
        .expect("forward original")
        .flatten_all()
        .unwrap()
        .to_vec1::<f32>()
        .unwrap();
    let after = restored
        .forward(probe.references(), probe.queries(), probe.side_features())
        .expect("forward restored")
        .flatten_all()
        .unwrap()
        .to_vec1::<f32>()
        .unwrap();

    assert_eq!(before, after);
    assert!(after.iter().all(|p| p.is_finite() && *p > 0.0 && *p < 1.0));
}
