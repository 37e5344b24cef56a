use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            GatewayError::MissingField { .. } => (StatusCode::BAD_REQUEST, "missing_field"),
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::ShapeMismatch(_) => (StatusCode::BAD_REQUEST, "shape_mismatch"),
            GatewayError::InferenceFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "inference_error")
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            kind,
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
