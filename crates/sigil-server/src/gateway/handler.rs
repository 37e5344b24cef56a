use axum::{Json, extract::State, response::Response};
use axum::response::IntoResponse;
use tracing::{debug, instrument};

use sigil::ModelError;

use crate::gateway::error::GatewayError;
use crate::gateway::payload::{PredictResponse, tensor_from_json};
use crate::gateway::state::HandlerState;

/// The three inputs every prediction request must carry.
pub const REQUIRED_FIELDS: [&str; 3] = ["input_ref", "input_query", "input_carac"];

#[instrument(skip(state, request))]
pub async fn predict_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let fields = request.as_object().ok_or_else(|| {
        GatewayError::InvalidRequest("request body must be a JSON object".to_string())
    })?;

    // All required fields are checked before any tensor is decoded, so a
    // missing field never triggers partial computation.
    for field in REQUIRED_FIELDS {
        if !fields.contains_key(field) {
            return Err(GatewayError::MissingField {
                field: field.to_string(),
            });
        }
    }

    let device = state.verifier.device();
    let input_ref = tensor_from_json("input_ref", &fields["input_ref"], device)?;
    let input_query = tensor_from_json("input_query", &fields["input_query"], device)?;
    let input_carac = tensor_from_json("input_carac", &fields["input_carac"], device)?;

    debug!(
        ref_dims = ?input_ref.dims(),
        query_dims = ?input_query.dims(),
        carac_dims = ?input_carac.dims(),
        "Prediction request decoded"
    );

    let probabilities = state
        .verifier
        .predict(&input_ref, &input_query, &input_carac)
        .map_err(map_model_error)?;

    let prediction = probabilities
        .to_vec2::<f32>()
        .map_err(|e| GatewayError::InferenceFailed(e.to_string()))?;

    Ok(Json(PredictResponse { prediction }).into_response())
}

fn map_model_error(err: ModelError) -> GatewayError {
    match err {
        ModelError::ShapeMismatch { .. } | ModelError::Shape(_) => {
            GatewayError::ShapeMismatch(err.to_string())
        }
        other => GatewayError::InferenceFailed(other.to_string()),
    }
}
