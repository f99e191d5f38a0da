//! Aegis Ring Arithmetic
//!
//! Exact arithmetic, the ciphertext shape and the plaintext packing shared by the
//! audit encryption and threshold decryption paths.
//!
//! ```text
//! R_Q = Z_Q[X] / (X^N + 1)        N = 1024, Q = 167772161
//!
//!   a(X) * b(X):  X^i * X^j = X^(i+j)          if i + j <  N
//!                           = -X^(i+j-N)       if i + j >= N
//! ```
//!
//! Field-scale values (BN254 scalars, Shamir shares) use `num_bigint::BigInt`;
//! ring coefficients fit in `u64` and exact (unreduced) sums use `i128`.

pub mod arith;
pub mod ciphertext;
pub mod error;
pub mod message;
pub mod params;
pub mod poly;

pub use arith::{centered_mod, centered_mod_q, mod_pow, parse_numeral, reduce};
pub use ciphertext::Ciphertext;
pub use error::RingError;
pub use message::{FIELD_BYTES, decode_message, encode_message};
pub use params::{DELTA, MESSAGE_SLOTS, N, NOISE_BOUND, PLAINTEXT_MODULUS, Q};
pub use poly::{
    RingElement, inner_product_int, inner_product_mod_q, negacyclic_matrix_row_mod_q,
    negacyclic_mul_int, negacyclic_mul_mod_q,
};
