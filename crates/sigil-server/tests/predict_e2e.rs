//! Full-stack test: train -> artifact -> load -> serve -> predict.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use candle_core::Device;
use sigil::model::ModelConfig;
use sigil::training::{TrainConfig, Trainer, synthetic};
use sigil::{artifact, ops};
use sigil_server::gateway::{HandlerState, create_router_with_state};
use tempfile::TempDir;

#[tokio::test]
async fn test_trained_artifact_serves_predictions() {
    ops::register_builtin_ops();
    let device = Device::Cpu;

    // Train a small model and persist it.
    let data = synthetic::generate_pairs(12, 42, &device).expect("synthetic data");
    let trainer = Trainer::new(TrainConfig {
        epochs: 1,
        batch_size: 4,
        ..Default::default()
    })
    .expect("trainer");

    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("model.sgla");
    trainer
        .run(&data, ModelConfig::default(), &path)
        .expect("train and save");

    // Serve the artifact the way the binary does.
    let verifier = artifact::load(&path, &device).expect("load artifact");
    let state = HandlerState::new(Arc::new(verifier), path.clone());
    let router = create_router_with_state(state);

    let grid = serde_json::json!(vec![vec![vec![1.0f32; 3]; 28]; 28]);
    let body = serde_json::json!({
        "input_ref": grid,
        "input_query": grid,
        "input_carac": [0.5],
    });

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("predict");

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect")
        .to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).expect("parse");

    let p = json["prediction"][0][0].as_f64().expect("probability");
    assert!(p > 0.0 && p < 1.0, "probability out of (0,1): {p}");
}
