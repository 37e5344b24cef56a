//! Single-file model artifact.
//!
//! Layout:
//!
//! ```text
//! "SGLA" | version: u16 LE | header_len: u32 LE | header JSON | f32 LE payload
//! ```
//!
//! The header carries the topology ([`ModelConfig`], including the merge
//! operation's registered name) and a manifest locating every parameter in
//! the payload. Loading resolves the merge operation against the
//! [`crate::ops`] registry before any tensor data is decoded; an
//! unregistered name aborts the load with
//! [`ArtifactError::UnresolvedOperation`].

pub mod error;


pub use error::ArtifactError;

use std::fs;
use std::io::Write;
use std::path::Path;

use candle_core::{Device, Tensor};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::{ModelConfig, SiameseVerifier};
use crate::ops;

const MAGIC: &[u8; 4] = b"SGLA";
const FORMAT_VERSION: u16 = 1;
const PREAMBLE_LEN: usize = 4 + 2 + 4;

#[derive(Debug, Serialize, Deserialize)]
struct ArtifactHeader {
    format_version: u16,
    model: ModelConfig,
    tensors: Vec<TensorRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TensorRecord {
    name: String,
    shape: Vec<usize>,
    /// Byte offset relative to the start of the payload section.
    offset: u64,
    len_bytes: u64,
}

/// Serializes a verifier's topology and parameters to `path`.
pub fn save(model: &SiameseVerifier, path: &Path) -> Result<(), ArtifactError> {
    let mut entries: Vec<(String, Tensor)> = {
        let data = model.varmap().data().lock().unwrap();
        data.iter()
            .map(|(name, var)| (name.clone(), var.as_tensor().clone()))
            .collect()
    };
    // Manifest order is part of the format: sort for byte-stable output.
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut payload: Vec<u8> = Vec::new();
    let mut records = Vec::with_capacity(entries.len());
    for (name, tensor) in &entries {
        let values = tensor
            .flatten_all()
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(|e| ArtifactError::CorruptTensor {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        let offset = payload.len() as u64;
        for value in &values {
            payload.extend_from_slice(&value.to_le_bytes());
        }

        records.push(TensorRecord {
            name: name.clone(),
            shape: tensor.dims().to_vec(),
            offset,
            len_bytes: payload.len() as u64 - offset,
        });
    }

    let header = ArtifactHeader {
        format_version: FORMAT_VERSION,
        model: model.config().clone(),
        tensors: records,
    };
    let header_bytes = serde_json::to_vec(&header).map_err(|e| ArtifactError::CorruptHeader {
        reason: e.to_string(),
    })?;

    let mut file = fs::File::create(path)?;
    file.write_all(MAGIC)?;
    file.write_all(&FORMAT_VERSION.to_le_bytes())?;
    file.write_all(&(header_bytes.len() as u32).to_le_bytes())?;
    file.write_all(&header_bytes)?;
    file.write_all(&payload)?;
    file.flush()?;

    info!(
        path = %path.display(),
        tensors = header.tensors.len(),
        payload_bytes = payload.len(),
        "Artifact saved"
    );
    Ok(())
}

/// Deserializes a verifier from `path` onto `device`.
///
/// The merge operation named in the header must be registered before this
/// call; the check happens before any tensor data is read.
pub fn load(path: &Path, device: &Device) -> Result<SiameseVerifier, ArtifactError> {
    let bytes = fs::read(path)?;

    if bytes.len() < PREAMBLE_LEN || &bytes[..4] != MAGIC {
        return Err(ArtifactError::InvalidMagic);
    }

    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion { version });
    }

    let header_len = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
    let payload_start = PREAMBLE_LEN + header_len;
    if bytes.len() < payload_start {
        return Err(ArtifactError::CorruptHeader {
            reason: format!(
                "declared header length {header_len} exceeds file size {}",
                bytes.len()
            ),
        });
    }

    let header: ArtifactHeader = serde_json::from_slice(&bytes[PREAMBLE_LEN..payload_start])
        .map_err(|e| ArtifactError::CorruptHeader {
            reason: e.to_string(),
        })?;

    // Load-order contract: the merge op must resolve before any parameter
    // bytes are decoded.
    if !ops::is_registered(&header.model.merge_op) {
        return Err(ArtifactError::UnresolvedOperation {
            name: header.model.merge_op.clone(),
        });
    }

    let model = SiameseVerifier::new(header.model.clone(), device)?;
    let payload = &bytes[payload_start..];

    {
        let vars = model.varmap().data().lock().unwrap();

        let mut remaining: std::collections::HashSet<&str> =
            vars.keys().map(String::as_str).collect();

        for record in &header.tensors {
            let var = vars
                .get(&record.name)
                .ok_or_else(|| ArtifactError::UnknownTensor {
                    name: record.name.clone(),
                })?;
            remaining.remove(record.name.as_str());

            let start = record.offset as usize;
            let end = start + record.len_bytes as usize;
            if end > payload.len() || record.len_bytes % 4 != 0 {
                return Err(ArtifactError::CorruptTensor {
                    name: record.name.clone(),
                    reason: format!(
                        "manifest range {start}..{end} does not fit payload of {} bytes",
                        payload.len()
                    ),
                });
            }

            let values: Vec<f32> = payload[start..end]
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect();

            let elem_count: usize = record.shape.iter().product();
            if values.len() != elem_count {
                return Err(ArtifactError::CorruptTensor {
                    name: record.name.clone(),
                    reason: format!(
                        "shape {:?} wants {elem_count} values, payload holds {}",
                        record.shape,
                        values.len()
                    ),
                });
            }

            let tensor =
                Tensor::from_vec(values, record.shape.clone(), device).map_err(|e| {
                    ArtifactError::CorruptTensor {
                        name: record.name.clone(),
                        reason: e.to_string(),
                    }
                })?;
            var.set(&tensor).map_err(|e| ArtifactError::CorruptTensor {
                name: record.name.clone(),
                reason: e.to_string(),
            })?;

            debug!(name = %record.name, shape = ?record.shape, "Parameter restored");
        }

        if let Some(name) = remaining.iter().next() {
            return Err(ArtifactError::MissingTensor {
                name: (*name).to_string(),
            });
        }
    }

    info!(
        path = %path.display(),
        merge_op = %model.config().merge_op,
        "Artifact loaded"
    );
    Ok(model)
}
