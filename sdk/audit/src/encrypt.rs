//! RLWE Audit Encryption
//!
//! Encrypts the 64 plaintext bytes under the auditor key `(a, b)` and records
//! every intermediate the verification circuit needs.
//!
//! ```text
//! c0[i] = (<Row(b, i), r> + e1[i] + Δ·m[i]) mod Q        i < 64
//! c1[i] = (<Row(a, i), r> + e2[i])          mod Q        i < N
//!
//! k0[i] = (full0[i] - c0[i]) / Q       full = same sums without reduction
//! k1[i] = (full1[i] - c1[i]) / Q
//! ```
//!
//! The circuit re-checks `full = c + k·Q`, so both divisions must be exact.

use std::sync::Arc;

use aegis_ring::{
    Ciphertext, DELTA, MESSAGE_SLOTS, N, Q, RingElement, encode_message, inner_product_int,
    inner_product_mod_q, negacyclic_mul_int,
};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use crate::error::AuditError;
use crate::noise::Noise;
use crate::public_key::{PublicKeyCache, PublicKeySource, RlwePublicKey};

/// Quotient witnesses, one per ciphertext coefficient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionWitness {
    k0: Vec<i64>,
    k1: Vec<i64>,
}

impl EncryptionWitness {
    pub fn k0(&self) -> &[i64] {
        &self.k0
    }

    pub fn k1(&self) -> &[i64] {
        &self.k1
    }
}

/// Everything produced by one encryption
#[derive(Debug, Clone)]
pub struct AuditEncryption {
    ciphertext: Ciphertext,
    noise: Noise,
    witness: EncryptionWitness,
}

impl AuditEncryption {
    pub fn ciphertext(&self) -> &Ciphertext {
        &self.ciphertext
    }

    pub fn noise(&self) -> &Noise {
        &self.noise
    }

    pub fn witness(&self) -> &EncryptionWitness {
        &self.witness
    }

    pub fn into_ciphertext(self) -> Ciphertext {
        self.ciphertext
    }
}

/// Encrypts identity keys to the auditor
pub struct AuditEncryptor {
    key: Arc<RlwePublicKey>,
}

impl AuditEncryptor {
    pub fn new(key: Arc<RlwePublicKey>) -> Self {
        Self { key }
    }

    /// Build from the cached key, loading it from `source` if needed
    pub fn from_cache<S: PublicKeySource + ?Sized>(
        cache: &PublicKeyCache,
        source: &S,
    ) -> Result<Self, AuditError> {
        Ok(Self::new(cache.get_or_load(source)?))
    }

    pub fn public_key(&self) -> &RlwePublicKey {
        &self.key
    }

    /// Encrypt an owner public key `(x, y)` with fresh noise.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        owner_x: &BigUint,
        owner_y: &BigUint,
        rng: &mut R,
    ) -> Result<AuditEncryption, AuditError> {
        let message = encode_message(owner_x, owner_y)?;
        self.encrypt_with_noise(&message, Noise::sample(rng))
    }

    /// Encrypt packed message bytes with caller-supplied noise.
    pub fn encrypt_with_noise(
        &self,
        message: &[u8; MESSAGE_SLOTS],
        noise: Noise,
    ) -> Result<AuditEncryption, AuditError> {
        let a = self.key.a();
        let b = self.key.b();
        let r = noise.r();

        // exact products, used to cross-check the matrix-row sums
        let br = negacyclic_mul_int(&b.to_signed(), r, N);
        let ar = negacyclic_mul_int(&a.to_signed(), r, N);

        let mut c0 = Vec::with_capacity(MESSAGE_SLOTS);
        let mut k0 = Vec::with_capacity(MESSAGE_SLOTS);
        for i in 0..MESSAGE_SLOTS {
            let addend = noise.e1()[i] as i128 + (DELTA * message[i] as u64) as i128;
            let (c, k) = component("c0", i, &b.matrix_row(i), r, br[i], addend)?;
            c0.push(c);
            k0.push(k);
        }

        let mut c1 = Vec::with_capacity(N);
        let mut k1 = Vec::with_capacity(N);
        for i in 0..N {
            let addend = noise.e2()[i] as i128;
            let (c, k) = component("c1", i, &a.matrix_row(i), r, ar[i], addend)?;
            c1.push(c);
            k1.push(k);
        }

        let ciphertext = Ciphertext::new(c0, RingElement::new(c1)?)?;
        log::debug!(
            "audit encryption: {} c0 slots, {} c1 coefficients",
            MESSAGE_SLOTS,
            N
        );

        Ok(AuditEncryption {
            ciphertext,
            noise,
            witness: EncryptionWitness { k0, k1 },
        })
    }
}

/// One ciphertext coefficient and its quotient witness.
///
/// `exact` is the same product coefficient taken from the integer convolution.
fn component(
    name: &'static str,
    index: usize,
    row: &[u64],
    r: &[i64],
    exact: i128,
    addend: i128,
) -> Result<(u64, i64), AuditError> {
    let q = Q as i128;
    let inconsistent = || AuditError::ArithmeticConsistency {
        component: name,
        index,
    };

    let full_product = inner_product_int(row, r);
    if (full_product - exact).rem_euclid(q) != 0 {
        return Err(inconsistent());
    }

    let c = (inner_product_mod_q(row, r, Q) as i128 + addend).rem_euclid(q);
    let diff = full_product + addend - c;
    if diff % q != 0 {
        return Err(inconsistent());
    }
    let k = i64::try_from(diff / q).map_err(|_| inconsistent())?;

    Ok((c as u64, k))
}
