//! The siamese verifier network.
//!
//! A single [`Encoder`] (one parameter set) is applied to both the reference
//! and the query batch; the two embeddings are merged through a named
//! comparator operation resolved from the [`crate::ops`] registry, and the
//! [`DecisionHead`] maps the merged vector plus the side feature to a
//! probability.

pub mod config;
pub mod device;
pub mod encoder;
pub mod error;
pub mod head;


pub use config::ModelConfig;
pub use device::select_device;
pub use encoder::Encoder;
pub use error::ModelError;
pub use head::DecisionHead;

use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use tracing::debug;

use crate::ops::{self, MergeFn};
use crate::shape;

/// Siamese comparison network with a cost-aware decision head.
///
/// Owns the single `VarMap` holding every learnable parameter. The struct is
/// immutable after construction; training updates parameters through the
/// optimizer's `Var` handles, and serving treats a loaded verifier as
/// read-only shared state.
pub struct SiameseVerifier {
    varmap: VarMap,
    encoder: Encoder,
    head: DecisionHead,
    merge: MergeFn,
    config: ModelConfig,
    device: Device,
}

impl std::fmt::Debug for SiameseVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiameseVerifier")
            .field("config", &self.config)
            .field("device", &self.device)
            .finish()
    }
}

impl SiameseVerifier {
    /// Builds a freshly initialized verifier.
    ///
    /// The merge operation named by `config.merge_op` must already be
    /// registered; construction fails with
    /// [`ModelError::UnresolvedOperation`] otherwise.
    pub fn new(config: ModelConfig, device: &Device) -> Result<Self, ModelError> {
        config.validate()?;

        let merge = ops::resolve_merge_op(&config.merge_op).ok_or_else(|| {
            ModelError::UnresolvedOperation {
                name: config.merge_op.clone(),
            }
        })?;

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);

        let encoder = Encoder::new(&config, vb.pp("encoder"))?;
        let head = DecisionHead::new(&config, vb.pp("head"))?;

        debug!(
            grid_height = config.grid_height,
            grid_width = config.grid_width,
            grid_channels = config.grid_channels,
            embedding_dim = config.embedding_dim,
            merge_op = %config.merge_op,
            "Verifier constructed"
        );

        Ok(Self {
            varmap,
            encoder,
            head,
            merge,
            config,
            device: device.clone(),
        })
    }

    /// Strict forward pass over already batch-shaped inputs.
    ///
    /// `reference` and `query` must both be `(N, H, W, C)` with the
    /// configured geometry; `side_feature` must be `(N, 1)`.
    pub fn forward(
        &self,
        reference: &Tensor,
        query: &Tensor,
        side_feature: &Tensor,
    ) -> Result<Tensor, ModelError> {
        if reference.dims() != query.dims() {
            return Err(ModelError::ShapeMismatch {
                expected: format!("query batch matching reference {:?}", reference.dims()),
                actual: format!("{:?}", query.dims()),
            });
        }

        // One encoder, two invocations: the weight sharing that makes the
        // network siamese.
        let ref_embedding = self.encoder.forward(reference)?;
        let query_embedding = self.encoder.forward(query)?;

        let dissimilarity = (self.merge)(&ref_embedding, &query_embedding)?;
        self.head.forward(&dissimilarity, side_feature)
    }

    /// Serving-boundary forward pass: adapts input ranks per the boundary
    /// rules before invoking [`Self::forward`].
    pub fn predict(
        &self,
        reference: &Tensor,
        query: &Tensor,
        side_feature: &Tensor,
    ) -> Result<Tensor, ModelError> {
        let reference = shape::adapt_grid("input_ref", reference)?;
        let query = shape::adapt_grid("input_query", query)?;
        let side_feature = shape::adapt_side_feature("input_carac", side_feature)?;
        self.forward(&reference, &query, &side_feature)
    }

    /// The parameter set shared by the encoder and the head.
    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    /// The verifier's topology.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// The device the parameters live on.
    pub fn device(&self) -> &Device {
        &self.device
    }
}
