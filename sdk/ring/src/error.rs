use thiserror::Error;

/// Ring arithmetic and decoding errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RingError {
    #[error("ring element has {got} coefficients, expected {expected}")]
    LengthMismatch { got: usize, expected: usize },

    #[error("coefficient {value} at position {index} is not reduced mod {modulus}")]
    Unreduced { index: usize, value: u64, modulus: u64 },

    #[error("value needs {bytes} bytes, slot holds at most {max}")]
    MessageTooWide { bytes: usize, max: usize },

    #[error("invalid numeral: {0:?}")]
    InvalidNumeral(String),
}
