use aegis_ring::RingError;
use thiserror::Error;

/// Audit encryption errors
#[derive(Debug, Error)]
pub enum AuditError {
    /// The public key could not be retrieved; the caller may retry
    #[error("public key unavailable: {0}")]
    KeyUnavailable(String),

    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// A quotient witness did not divide exactly. Always an internal bug.
    #[error("arithmetic inconsistency in {component}[{index}]")]
    ArithmeticConsistency {
        component: &'static str,
        index: usize,
    },

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("invalid noise: {0}")]
    InvalidNoise(String),
}

impl AuditError {
    /// Only retrieval failures are worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuditError::KeyUnavailable(_))
    }
}

impl From<RingError> for AuditError {
    fn from(err: RingError) -> Self {
        match err {
            RingError::MessageTooWide { .. } | RingError::InvalidNumeral(_) => {
                AuditError::Encoding(err.to_string())
            }
            RingError::LengthMismatch { .. } | RingError::Unreduced { .. } => {
                AuditError::InvalidKeyMaterial(err.to_string())
            }
        }
    }
}
