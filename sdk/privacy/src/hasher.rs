//! Field Hashing
//!
//! Every commitment, nullifier and Merkle node is `Hash(inputs) -> Fr` over the
//! BN254 scalar field. The permutation itself is treated as an external primitive:
//! [`PoseidonHasher`] takes it from `ark-crypto-primitives`, and anything else that
//! implements [`FieldHasher`] can stand in for it.

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::{
    CryptographicSponge,
    poseidon::{PoseidonConfig, PoseidonSponge, find_poseidon_ark_and_mds},
};

/// Deterministic hash of field elements to a single field element
pub trait FieldHasher {
    fn hash(&self, inputs: &[Fr]) -> Fr;

    /// Two-input hash (identity commitments, nullifiers, Merkle nodes)
    fn hash2(&self, a: Fr, b: Fr) -> Fr {
        self.hash(&[a, b])
    }

    /// Four-input hash (value commitments)
    fn hash4(&self, a: Fr, b: Fr, c: Fr, d: Fr) -> Fr {
        self.hash(&[a, b, c, d])
    }
}

impl<H: FieldHasher + ?Sized> FieldHasher for &H {
    fn hash(&self, inputs: &[Fr]) -> Fr {
        (**self).hash(inputs)
    }
}

/// Poseidon sponge over BN254 Fr
#[derive(Clone)]
pub struct PoseidonHasher {
    config: PoseidonConfig<Fr>,
}

impl PoseidonHasher {
    pub fn new() -> Self {
        Self {
            config: poseidon_config(),
        }
    }
}

impl Default for PoseidonHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldHasher for PoseidonHasher {
    fn hash(&self, inputs: &[Fr]) -> Fr {
        let mut sponge = PoseidonSponge::new(&self.config);
        for input in inputs {
            sponge.absorb(input);
        }
        sponge.squeeze_field_elements::<Fr>(1)[0]
    }
}

/// Poseidon configuration for Aegis
///
/// Field: BN254 Fr (254 bits)
/// Rate: 2, Capacity: 1
/// Security: 128 bits
fn poseidon_config() -> PoseidonConfig<Fr> {
    let prime_bits: u64 = 254;
    let rate: usize = 2;
    let capacity: usize = 1;
    let full_rounds: u64 = 8;
    let partial_rounds: u64 = 57;
    let alpha: u64 = 5;
    let skip_matrices: u64 = 0;

    let (ark, mds) = find_poseidon_ark_and_mds::<Fr>(
        prime_bits,
        rate,
        full_rounds,
        partial_rounds,
        skip_matrices,
    );

    PoseidonConfig::new(
        full_rounds as usize,
        partial_rounds as usize,
        alpha,
        mds,
        ark,
        rate,
        capacity,
    )
}
