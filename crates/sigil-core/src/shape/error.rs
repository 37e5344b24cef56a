use thiserror::Error;

/// Errors produced by the rank-adaptation boundary.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The input's rank has no defined adaptation rule.
    #[error("{input}: rank {rank} is not supported (expected {expected})")]
    UnsupportedRank {
        input: String,
        rank: usize,
        expected: &'static str,
    },

    /// The input's dimensions are incompatible with the expected shape.
    #[error("{input}: expected {expected}, got {actual}")]
    Mismatch {
        input: String,
        expected: String,
        actual: String,
    },

    #[error("tensor operation failed: {0}")]
    Tensor(#[from] candle_core::Error),
}
