//! Encryption randomness
//!
//! ```text
//! r   : N values        masking vector
//! e1  : MESSAGE_SLOTS   noise on c0
//! e2  : N values        noise on c1
//! ```
//!
//! Each value is `(byte mod 7) - 3` for one CSPRNG byte. The mapping is
//! slightly biased towards `[-3, 0]` (256 is not a multiple of 7); the circuit
//! only checks the range, so the bias is kept as is.

use aegis_ring::{MESSAGE_SLOTS, N, NOISE_BOUND};
use rand::{CryptoRng, RngCore};

use crate::error::AuditError;

/// The small random vectors used by one encryption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Noise {
    r: Vec<i64>,
    e1: Vec<i64>,
    e2: Vec<i64>,
}

impl Noise {
    /// Use caller-chosen noise. Every value must lie in `[-3, 3]`.
    pub fn new(r: Vec<i64>, e1: Vec<i64>, e2: Vec<i64>) -> Result<Self, AuditError> {
        check("r", &r, N)?;
        check("e1", &e1, MESSAGE_SLOTS)?;
        check("e2", &e2, N)?;
        Ok(Self { r, e1, e2 })
    }

    /// Draw fresh noise from a cryptographic RNG
    pub fn sample<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self {
            r: sample_vec(rng, N),
            e1: sample_vec(rng, MESSAGE_SLOTS),
            e2: sample_vec(rng, N),
        }
    }

    pub fn r(&self) -> &[i64] {
        &self.r
    }

    pub fn e1(&self) -> &[i64] {
        &self.e1
    }

    pub fn e2(&self) -> &[i64] {
        &self.e2
    }
}

/// Map one random byte into `[-NOISE_BOUND, NOISE_BOUND]`
pub fn small_from_byte(byte: u8) -> i64 {
    (byte % 7) as i64 - NOISE_BOUND
}

fn sample_vec<R: RngCore>(rng: &mut R, len: usize) -> Vec<i64> {
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    bytes.into_iter().map(small_from_byte).collect()
}

fn check(name: &str, values: &[i64], expected: usize) -> Result<(), AuditError> {
    if values.len() != expected {
        return Err(AuditError::InvalidNoise(format!(
            "{name} has {} values, expected {expected}",
            values.len()
        )));
    }
    if let Some((i, v)) = values
        .iter()
        .enumerate()
        .find(|(_, v)| v.abs() > NOISE_BOUND)
    {
        return Err(AuditError::InvalidNoise(format!(
            "{name}[{i}] = {v} outside [-{NOISE_BOUND}, {NOISE_BOUND}]"
        )));
    }
    Ok(())
}
