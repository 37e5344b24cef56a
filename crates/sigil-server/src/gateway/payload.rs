//! Request/response payloads and JSON-to-tensor decoding.

use candle_core::{Device, Tensor};
use serde_json::Value;

use crate::gateway::error::GatewayError;

/// Successful prediction payload: one probability row per input sample,
/// mirroring the model's `(N, 1)` output batch.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct PredictResponse {
    pub prediction: Vec<Vec<f32>>,
}

/// Maximum rank a request tensor may carry (a batched grid).
const MAX_RANK: usize = 4;

/// Decodes a nested JSON numeric array (or bare number) into a tensor.
///
/// The nesting depth determines the rank; every level must be rectangular.
/// Rank validation beyond rectangularity (which ranks a given input stream
/// accepts) is the shape adapter's job.
pub(crate) fn tensor_from_json(
    field: &str,
    value: &Value,
    device: &Device,
) -> Result<Tensor, GatewayError> {
    let mut dims: Vec<usize> = Vec::new();
    let mut data: Vec<f32> = Vec::new();
    collect(field, value, 0, &mut dims, &mut data)?;

    Tensor::from_vec(data, dims, device)
        .map_err(|e| GatewayError::InvalidRequest(format!("field `{field}`: {e}")))
}

fn collect(
    field: &str,
    value: &Value,
    depth: usize,
    dims: &mut Vec<usize>,
    data: &mut Vec<f32>,
) -> Result<(), GatewayError> {
    match value {
        Value::Number(n) => {
            if depth != dims.len() {
                return Err(GatewayError::ShapeMismatch(format!(
                    "field `{field}` is ragged: number at depth {depth} in a rank-{} array",
                    dims.len()
                )));
            }
            let v = n.as_f64().ok_or_else(|| {
                GatewayError::InvalidRequest(format!(
                    "field `{field}` contains a non-finite number"
                ))
            })?;
            data.push(v as f32);
            Ok(())
        }
        Value::Array(items) => {
            if depth == dims.len() {
                if !data.is_empty() {
                    return Err(GatewayError::ShapeMismatch(format!(
                        "field `{field}` is ragged: array nested deeper than the first leaf"
                    )));
                }
                if depth >= MAX_RANK {
                    return Err(GatewayError::ShapeMismatch(format!(
                        "field `{field}` exceeds the maximum rank of {MAX_RANK}"
                    )));
                }
                if items.is_empty() {
                    return Err(GatewayError::InvalidRequest(format!(
                        "field `{field}` contains an empty array"
                    )));
                }
                dims.push(items.len());
            } else if items.len() != dims[depth] {
                return Err(GatewayError::ShapeMismatch(format!(
                    "field `{field}` is ragged: expected {} elements at depth {depth}, got {}",
                    dims[depth],
                    items.len()
                )));
            }

            for item in items {
                collect(field, item, depth + 1, dims, data)?;
            }
            Ok(())
        }
        other => Err(GatewayError::InvalidRequest(format!(
            "field `{field}`: expected a number or nested arrays, got {other}"
        ))),
    }
}
