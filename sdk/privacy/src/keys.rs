//! Identity Keys
//!
//! Keypairs live on the BabyJubJub curve embedded in BN254, so a circuit over
//! BN254 can do the scalar multiplication natively.
//!
//! ```text
//! secret_key = seed mod 2^128
//! public_key = secret_key · G        (x, y) ∈ Fr × Fr
//! ```
//!
//! The 128-bit cap is a width constraint of the verification circuit.

use ark_bn254::Fr;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ed_on_bn254::{EdwardsAffine, Fr as CurveScalar};
use ark_ff::PrimeField;
use ark_std::rand::{CryptoRng, RngCore};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Bit width of a secret key
pub const SECRET_KEY_BITS: u64 = 128;

/// A public key: an affine point on the embedded curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    pub x: Fr,
    pub y: Fr,
}

impl PublicKey {
    /// Coordinates as integers, e.g. for packing into the audit plaintext
    pub fn to_biguints(&self) -> (BigUint, BigUint) {
        (self.x.into(), self.y.into())
    }

    /// Rebuild from integer coordinates (each reduced into the field)
    pub fn from_biguints(x: &BigUint, y: &BigUint) -> Self {
        Self {
            x: Fr::from(x.clone()),
            y: Fr::from(y.clone()),
        }
    }

    /// Whether the coordinates satisfy the curve equation and lie in the prime-order subgroup
    pub fn is_on_curve(&self) -> bool {
        let point = EdwardsAffine::new_unchecked(self.x, self.y);
        point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve()
    }
}

/// Serialized as `{"x": "<decimal>", "y": "<decimal>"}`
#[derive(Serialize, Deserialize)]
struct PublicKeyRepr {
    x: String,
    y: String,
}

impl Serialize for PublicKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (x, y) = self.to_biguints();
        PublicKeyRepr {
            x: x.to_string(),
            y: y.to_string(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = PublicKeyRepr::deserialize(deserializer)?;
        let parse = |s: &str| {
            s.parse::<BigUint>()
                .map_err(|e| serde::de::Error::custom(format!("invalid coordinate {s:?}: {e}")))
        };
        Ok(Self::from_biguints(&parse(&repr.x)?, &parse(&repr.y)?))
    }
}

/// An identity keypair
#[derive(Debug, Clone)]
pub struct Keypair {
    secret_key: Fr,
    public_key: PublicKey,
}

impl Keypair {
    /// Derive a keypair from an arbitrary-size seed.
    ///
    /// Only the low 128 bits of the seed are used.
    pub fn generate(seed: &BigUint) -> Self {
        let mask = (BigUint::from(1u8) << SECRET_KEY_BITS) - 1u8;
        let scalar = seed & mask;

        // < 2^128, so the value is identical in both fields
        let secret_key = Fr::from(scalar.clone());
        let curve_scalar = CurveScalar::from(scalar);

        let point = (EdwardsAffine::generator() * curve_scalar).into_affine();

        Self {
            secret_key,
            public_key: PublicKey {
                x: point.x,
                y: point.y,
            },
        }
    }

    /// Derive a keypair from a random 128-bit seed
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut seed = [0u8; 16];
        rng.fill_bytes(&mut seed);
        Self::generate(&BigUint::from_bytes_le(&seed))
    }

    pub fn secret_key(&self) -> Fr {
        self.secret_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Secret key as an integer (for proof-input artifacts)
    pub fn secret_key_biguint(&self) -> BigUint {
        self.secret_key.into_bigint().into()
    }
}
