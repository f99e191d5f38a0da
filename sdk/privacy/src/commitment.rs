//! Identity and Value Commitments
//!
//! ```text
//! identity_commitment = Hash2(pk.x, pk.y)
//! value_commitment    = Hash4(pk.x, pk.y, amount, randomness)
//! ```
//!
//! The identity commitment binds an auditable public key without revealing it;
//! value commitments are the leaves of the Merkle accumulator.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use serde::{Deserialize, Serialize};

use crate::hasher::{FieldHasher, PoseidonHasher};
use crate::keys::PublicKey;

/// A commitment (field element, 32 bytes little-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub [u8; 32]);

impl Commitment {
    /// Create commitment from field element
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

impl AsRef<[u8]> for Commitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Fr> for Commitment {
    fn from(f: Fr) -> Self {
        Self::from_field(f)
    }
}

/// Field element to 32 little-endian bytes
pub(crate) fn field_to_bytes(f: Fr) -> [u8; 32] {
    let bytes = f.into_bigint().to_bytes_le();
    let mut arr = [0u8; 32];
    arr[..bytes.len()].copy_from_slice(&bytes);
    arr
}

/// Commitment scheme over a field hasher (Poseidon by default)
pub struct CommitmentScheme<H: FieldHasher = PoseidonHasher> {
    hasher: H,
}

impl CommitmentScheme<PoseidonHasher> {
    /// Create a new commitment scheme with the Aegis Poseidon parameters
    pub fn new() -> Self {
        Self {
            hasher: PoseidonHasher::new(),
        }
    }
}

impl Default for CommitmentScheme<PoseidonHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: FieldHasher> CommitmentScheme<H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Identity commitment: `Hash2(pk.x, pk.y)`
    pub fn identity_commitment(&self, pk: &PublicKey) -> Commitment {
        Commitment::from_field(self.hasher.hash2(pk.x, pk.y))
    }

    /// Value commitment: `Hash4(pk.x, pk.y, amount, randomness)`
    ///
    /// # Arguments
    /// * `pk` - Owner's public key
    /// * `amount` - The committed amount
    /// * `randomness` - Blinding factor
    pub fn value_commitment(&self, pk: &PublicKey, amount: u64, randomness: Fr) -> Commitment {
        Commitment::from_field(self.hasher.hash4(pk.x, pk.y, Fr::from(amount), randomness))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Keypair;
    use ark_ff::MontFp;
    use num_bigint::BigUint;

    // Poseidon(pk.x, pk.y) for pk = 7·G
    const IDENTITY_COMMITMENT_SEED_7: Fr =
        MontFp!("20062852757284926154145418491276567999860604789982497096784422335792109626462");

    // Poseidon(pk.x, pk.y, 1000000, 42) for pk = 7·G
    const VALUE_COMMITMENT_SEED_7: Fr =
        MontFp!("572060468055755302014628137027081458524240209334302432613979385830506702212");

    fn golden_keypair() -> Keypair {
        Keypair::generate(&BigUint::from(7u8))
    }

    #[test]
    fn test_identity_commitment_deterministic() {
        let scheme = CommitmentScheme::new();
        let kp = golden_keypair();

        let c1 = scheme.identity_commitment(kp.public_key());
        let c2 = CommitmentScheme::new().identity_commitment(kp.public_key());

        assert_eq!(c1, c2, "same inputs should produce same commitment");
        assert_eq!(c1.to_field(), IDENTITY_COMMITMENT_SEED_7);
    }

    #[test]
    fn test_value_commitment_golden_inputs() {
        let scheme = CommitmentScheme::new();
        let kp = golden_keypair();
        let pk = kp.public_key();

        let c = scheme.value_commitment(pk, 1_000_000, Fr::from(42u64));

        assert_eq!(c.to_field(), VALUE_COMMITMENT_SEED_7);
        assert_eq!(
            Commitment::from_field(VALUE_COMMITMENT_SEED_7).as_bytes(),
            c.as_bytes()
        );
        assert_eq!(c, scheme.value_commitment(pk, 1_000_000, Fr::from(42u64)));
    }

    #[test]
    fn test_value_commitment_hiding() {
        let scheme = CommitmentScheme::new();
        let kp = golden_keypair();

        let c1 = scheme.value_commitment(kp.public_key(), 1000, Fr::from(1u64));
        let c2 = scheme.value_commitment(kp.public_key(), 1000, Fr::from(2u64));

        assert_ne!(
            c1, c2,
            "different randomness should produce different commitments"
        );
    }

    #[test]
    fn test_value_commitment_binding() {
        let scheme = CommitmentScheme::new();
        let kp = golden_keypair();

        let c1 = scheme.value_commitment(kp.public_key(), 1000, Fr::from(42u64));
        let c2 = scheme.value_commitment(kp.public_key(), 2000, Fr::from(42u64));

        assert_ne!(
            c1, c2,
            "different values should produce different commitments"
        );
    }

    #[test]
    fn test_identity_differs_per_key() {
        let scheme = CommitmentScheme::new();
        let a = Keypair::generate(&BigUint::from(7u8));
        let b = Keypair::generate(&BigUint::from(8u8));

        assert_ne!(
            scheme.identity_commitment(a.public_key()),
            scheme.identity_commitment(b.public_key())
        );
    }

    #[test]
    fn test_bytes_field_roundtrip() {
        let f = Fr::from(123_456_789u64);
        assert_eq!(Commitment::from_field(f).to_field(), f);
    }
}
