//! Rank adaptation for the serving boundary.
//!
//! Inputs arrive with varying ranks (a bare scalar side feature, a single
//! unbatched grid, a full batch). Each accepted rank has exactly one
//! adaptation rule; everything else is rejected. Adaptation never relies on
//! the numeric library's implicit broadcasting.

pub mod error;


pub use error::ShapeError;

use candle_core::Tensor;

/// Adapts a grid input to batch shape `(N, H, W, C)`.
///
/// Rank 3 is treated as a single unbatched sample and gains a leading batch
/// axis of size 1; rank 4 passes through. All other ranks are rejected.
pub fn adapt_grid(input: &str, tensor: &Tensor) -> Result<Tensor, ShapeError> {
    match tensor.rank() {
        3 => Ok(tensor.unsqueeze(0)?),
        4 => Ok(tensor.clone()),
        rank => Err(ShapeError::UnsupportedRank {
            input: input.to_string(),
            rank,
            expected: "rank 3 (H, W, C) or rank 4 (N, H, W, C)",
        }),
    }
}

/// Adapts a side feature to batch shape `(N, 1)`.
///
/// A rank-0 scalar becomes a 1×1 batch, a rank-1 vector `(N,)` gains a
/// trailing feature axis, and a rank-2 `(N, 1)` tensor passes through.
/// Rank 2 with a feature axis other than 1, and any rank above 2, are
/// rejected.
pub fn adapt_side_feature(input: &str, tensor: &Tensor) -> Result<Tensor, ShapeError> {
    match tensor.rank() {
        0 => Ok(tensor.reshape((1, 1))?),
        1 => Ok(tensor.unsqueeze(1)?),
        2 => {
            let (_, cols) = tensor.dims2()?;
            if cols != 1 {
                return Err(ShapeError::Mismatch {
                    input: input.to_string(),
                    expected: "(N, 1)".to_string(),
                    actual: format!("{:?}", tensor.dims()),
                });
            }
            Ok(tensor.clone())
        }
        rank => Err(ShapeError::UnsupportedRank {
            input: input.to_string(),
            rank,
            expected: "rank 0 (scalar), rank 1 (N,) or rank 2 (N, 1)",
        }),
    }
}
