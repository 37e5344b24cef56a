use thiserror::Error;

use crate::model::ModelError;

/// Errors produced when saving or loading a model artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the artifact magic.
    #[error("not a sigil artifact (bad magic)")]
    InvalidMagic,

    /// The artifact was written by an incompatible format version.
    #[error("unsupported artifact version: {version}")]
    UnsupportedVersion { version: u16 },

    /// The header could not be decoded.
    #[error("artifact header is corrupt: {reason}")]
    CorruptHeader { reason: String },

    /// The artifact references a merge operation that is not registered in
    /// this process. Register it before loading.
    #[error("merge operation `{name}` is not registered; register it before loading the artifact")]
    UnresolvedOperation { name: String },

    /// A parameter required by the topology is absent from the artifact.
    #[error("artifact is missing tensor `{name}`")]
    MissingTensor { name: String },

    /// The artifact carries a tensor the topology does not declare.
    #[error("artifact contains unknown tensor `{name}`")]
    UnknownTensor { name: String },

    /// A tensor's payload disagrees with its manifest entry.
    #[error("tensor `{name}` is corrupt: {reason}")]
    CorruptTensor { name: String, reason: String },

    #[error("model construction failed: {0}")]
    Model(#[from] ModelError),
}
