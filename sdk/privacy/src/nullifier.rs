//! Nullifiers
//!
//! Implements nullifier derivation for double-spend prevention.
//!
//! ```text
//! Nullifier = Hash2(secret_key, leaf_index)
//! ```
//!
//! Once a nullifier is published, the note at that leaf cannot be spent again.

use ark_bn254::Fr;
use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};

use crate::commitment::field_to_bytes;
use crate::hasher::{FieldHasher, PoseidonHasher};
use crate::keys::Keypair;

/// A nullifier (32 bytes) - unique tag for a spent note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nullifier(pub [u8; 32]);

impl Nullifier {
    /// Create from field element
    pub fn from_field(f: Fr) -> Self {
        Self(field_to_bytes(f))
    }

    /// Convert to field element
    pub fn to_field(&self) -> Fr {
        Fr::from_le_bytes_mod_order(&self.0)
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl AsRef<[u8]> for Nullifier {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Derive the nullifier for the leaf at `leaf_index` owned by `secret_key`.
pub fn derive_nullifier<H: FieldHasher>(
    hasher: &H,
    secret_key: Fr,
    leaf_index: u64,
) -> Nullifier {
    Nullifier::from_field(hasher.hash2(secret_key, Fr::from(leaf_index)))
}

/// Nullifier derivation bound to a keypair
pub struct NullifierKey<H: FieldHasher = PoseidonHasher> {
    secret_key: Fr,
    hasher: H,
}

impl NullifierKey<PoseidonHasher> {
    pub fn new(keypair: &Keypair) -> Self {
        Self::from_secret(keypair.secret_key())
    }

    pub fn from_secret(secret_key: Fr) -> Self {
        Self {
            secret_key,
            hasher: PoseidonHasher::new(),
        }
    }
}

impl<H: FieldHasher> NullifierKey<H> {
    /// Derive a nullifier for the note at `leaf_index`
    pub fn derive_nullifier(&self, leaf_index: u64) -> Nullifier {
        derive_nullifier(&self.hasher, self.secret_key, leaf_index)
    }
}
