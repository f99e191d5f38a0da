use crate::error::RingError;
use crate::params::{MESSAGE_SLOTS, Q};
use crate::poly::RingElement;

/// An audit ciphertext.
///
/// `c0` only covers the message slots; `c1` is a full ring element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext {
    c0: Vec<u64>,
    c1: RingElement,
}

impl Ciphertext {
    pub fn new(c0: Vec<u64>, c1: RingElement) -> Result<Self, RingError> {
        if c0.len() != MESSAGE_SLOTS {
            return Err(RingError::LengthMismatch {
                got: c0.len(),
                expected: MESSAGE_SLOTS,
            });
        }
        if let Some((index, &value)) = c0.iter().enumerate().find(|(_, c)| **c >= Q) {
            return Err(RingError::Unreduced {
                index,
                value,
                modulus: Q,
            });
        }
        Ok(Self { c0, c1 })
    }

    pub fn c0(&self) -> &[u64] {
        &self.c0
    }

    pub fn c1(&self) -> &RingElement {
        &self.c1
    }
}
