use thiserror::Error;

/// Threshold decryption errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("insufficient shares: got {got}, need {need}")]
    InsufficientShares { got: usize, need: usize },

    /// Two shares of the quorum sit at the same x; interpolation is undefined
    #[error("degenerate share set: duplicate x = {x}")]
    DegenerateShareSet { x: u64 },

    #[error("invalid share: {0}")]
    InvalidShare(String),

    #[error("invalid threshold: k={k}, n={n}")]
    InvalidThreshold { k: usize, n: usize },
}
