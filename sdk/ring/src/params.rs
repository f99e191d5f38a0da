//! Fixed parameters of the audit encryption scheme.
//!
//! These values are baked into the verification circuit; changing any of them
//! invalidates every proof-input artifact produced so far.

/// Ring dimension
pub const N: usize = 1024;

/// Ciphertext modulus (`5 * 2^25 + 1`)
pub const Q: u64 = 167_772_161;

/// Plaintext modulus: one byte per slot
pub const PLAINTEXT_MODULUS: u64 = 256;

/// Scaling factor `floor(Q / t)`
pub const DELTA: u64 = Q / PLAINTEXT_MODULUS;

/// Number of ring positions that carry plaintext (two packed 32-byte field elements)
pub const MESSAGE_SLOTS: usize = 64;

/// Noise coefficients are drawn from `[-NOISE_BOUND, NOISE_BOUND]`
pub const NOISE_BOUND: i64 = 3;
