//! HTTP gateway (Axum) for the prediction service.
//!
//! This module is primarily used by the `sigil` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::predict_handler;
pub use payload::PredictResponse;
pub use state::HandlerState;

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/predict", post(predict_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub model: &'static str,
    pub embedding_dim: usize,
    pub merge_op: String,
}

#[tracing::instrument]
pub async fn home_handler() -> &'static str {
    "Sigil: siamese authenticity verification API. POST /predict with input_ref, input_query and input_carac."
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(
    axum::extract::State(state): axum::extract::State<HandlerState>,
) -> Response {
    // The verifier is loaded before the router exists, so readiness only
    // reports what is being served.
    let config = state.verifier.config();
    let components = ComponentStatus {
        http: "ready",
        model: "ready",
        embedding_dim: config.embedding_dim,
        merge_op: config.merge_op.clone(),
    };

    (
        StatusCode::OK,
        Json(ReadyResponse {
            status: "ok",
            components,
        }),
    )
        .into_response()
}
