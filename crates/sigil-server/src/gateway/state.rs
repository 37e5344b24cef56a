use std::path::PathBuf;
use std::sync::Arc;

use sigil::SiameseVerifier;

/// Shared per-request state.
///
/// The verifier is loaded once at startup and treated as read-only for the
/// process lifetime; every request handler receives the same `Arc`.
#[derive(Clone)]
pub struct HandlerState {
    pub verifier: Arc<SiameseVerifier>,

    pub artifact_path: PathBuf,
}

impl HandlerState {
    pub fn new(verifier: Arc<SiameseVerifier>, artifact_path: PathBuf) -> Self {
        Self {
            verifier,
            artifact_path,
        }
    }
}
