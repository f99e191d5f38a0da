//! Proof-input and ciphertext artifacts
//!
//! Every value is written as a BN254 scalar so the circuit can read it back
//! directly:
//!
//! ```text
//! 0            -> "0"
//! v > 0        -> "0x" + 64 lowercase hex digits
//! v < 0        -> rendered as p + v
//! ```

use aegis_ring::{Ciphertext, Q, RingElement, centered_mod, parse_numeral, reduce};
use ark_bn254::Fr;
use ark_ff::PrimeField;
use num_bigint::{BigInt, BigUint};
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::encrypt::AuditEncryption;
use crate::error::AuditError;

/// The BN254 scalar field modulus
pub fn field_modulus() -> BigInt {
    BigInt::from(BigUint::from(Fr::MODULUS))
}

/// Render an integer as a field element
pub fn field_hex(value: &BigInt) -> String {
    let v = reduce(value, &field_modulus());
    if v.is_zero() {
        return "0".to_string();
    }
    format!("0x{:0>64}", v.to_str_radix(16))
}

/// Read a rendered field element back as a signed integer (`p - 1` reads as `-1`).
pub fn parse_field(text: &str) -> Result<BigInt, AuditError> {
    Ok(centered_mod(&parse_numeral(text)?, &field_modulus()))
}

fn render<T: Copy + Into<BigInt>>(values: &[T]) -> Vec<String> {
    values.iter().map(|&v| field_hex(&v.into())).collect()
}

/// Inputs for the encryption-correctness proof, written as `Prover.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofInputs {
    pub secret_key: String,
    pub wa_commitment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciphertext_commitment: Option<String>,
    pub c0: Vec<String>,
    pub c1: Vec<String>,
    pub r: Vec<String>,
    pub e1: Vec<String>,
    pub e2: Vec<String>,
    pub k0: Vec<String>,
    pub k1: Vec<String>,
}

impl ProofInputs {
    /// # Arguments
    /// * `secret_key` - Owner's identity secret
    /// * `wa_commitment` - Identity commitment of the owner's public key
    /// * `encryption` - Ciphertext, noise and witnesses from the encryptor
    pub fn new(
        secret_key: &BigUint,
        wa_commitment: &BigUint,
        encryption: &AuditEncryption,
    ) -> Self {
        let ct = encryption.ciphertext();
        let noise = encryption.noise();
        let witness = encryption.witness();

        Self {
            secret_key: field_hex(&BigInt::from(secret_key.clone())),
            wa_commitment: field_hex(&BigInt::from(wa_commitment.clone())),
            ciphertext_commitment: None,
            c0: render(ct.c0()),
            c1: render(ct.c1().coeffs()),
            r: render(noise.r()),
            e1: render(noise.e1()),
            e2: render(noise.e2()),
            k0: render(witness.k0()),
            k1: render(witness.k1()),
        }
    }

    pub fn with_ciphertext_commitment(mut self, commitment: &BigUint) -> Self {
        self.ciphertext_commitment = Some(field_hex(&BigInt::from(commitment.clone())));
        self
    }

    pub fn to_toml(&self) -> Result<String, AuditError> {
        toml::to_string(self).map_err(|e| AuditError::Encoding(format!("proof inputs: {e}")))
    }

    pub fn from_toml(text: &str) -> Result<Self, AuditError> {
        toml::from_str(text).map_err(|e| AuditError::Encoding(format!("proof inputs: {e}")))
    }
}

/// Stored ciphertext together with its encryption witness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextRecord {
    pub c0: Vec<String>,
    pub c1: Vec<String>,
    pub r: Vec<String>,
    pub e1: Vec<String>,
    pub e2: Vec<String>,
    pub k0: Vec<String>,
    pub k1: Vec<String>,
}

impl CiphertextRecord {
    pub fn from_encryption(encryption: &AuditEncryption) -> Self {
        let ct = encryption.ciphertext();
        let noise = encryption.noise();
        let witness = encryption.witness();

        Self {
            c0: render(ct.c0()),
            c1: render(ct.c1().coeffs()),
            r: render(noise.r()),
            e1: render(noise.e1()),
            e2: render(noise.e2()),
            k0: render(witness.k0()),
            k1: render(witness.k1()),
        }
    }

    /// Read back the ciphertext half of the record
    pub fn to_ciphertext(&self) -> Result<Ciphertext, AuditError> {
        let c0 = ring_values("c0", &self.c0)?;
        let c1 = RingElement::new(ring_values("c1", &self.c1)?)
            .map_err(|e| AuditError::Encoding(format!("c1: {e}")))?;
        Ciphertext::new(c0, c1).map_err(|e| AuditError::Encoding(format!("c0: {e}")))
    }

    pub fn to_json(&self) -> Result<String, AuditError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AuditError::Encoding(format!("ciphertext record: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self, AuditError> {
        serde_json::from_str(json)
            .map_err(|e| AuditError::Encoding(format!("ciphertext record: {e}")))
    }
}

fn ring_values(name: &str, values: &[String]) -> Result<Vec<u64>, AuditError> {
    values
        .iter()
        .enumerate()
        .map(|(i, text)| {
            parse_field(text)?
                .to_u64()
                .filter(|&v| v < Q)
                .ok_or_else(|| AuditError::Encoding(format!("{name}[{i}] is not below Q")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuditEncryptor;
    use crate::noise::Noise;
    use crate::public_key::RlwePublicKey;
    use aegis_ring::{MESSAGE_SLOTS, N};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    fn sample_encryption() -> AuditEncryption {
        let key = RlwePublicKey::new(RingElement::zero(), RingElement::zero());
        let encryptor = AuditEncryptor::new(Arc::new(key));
        let mut rng = StdRng::seed_from_u64(21);
        let mut message = [0u8; MESSAGE_SLOTS];
        message[0] = 0x2a;
        encryptor
            .encrypt_with_noise(&message, Noise::sample(&mut rng))
            .unwrap()
    }

    #[test]
    fn test_field_hex_format() {
        assert_eq!(field_hex(&BigInt::from(0)), "0");

        let one = field_hex(&BigInt::from(1));
        assert_eq!(one.len(), 66);
        assert_eq!(one, format!("0x{}1", "0".repeat(63)));

        let minus_one = field_hex(&BigInt::from(-1));
        let expected: BigInt = field_modulus() - 1;
        assert_eq!(minus_one, format!("0x{}", expected.to_str_radix(16)));
        assert_eq!(
            minus_one,
            "0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000000"
        );
    }

    #[test]
    fn test_parse_field_reads_negatives() {
        for v in [-3i64, -1, 0, 2, 655_360] {
            assert_eq!(parse_field(&field_hex(&BigInt::from(v))).unwrap(), BigInt::from(v));
        }
        assert!(parse_field("0xzz").is_err());
    }

    #[test]
    fn test_proof_inputs_toml() {
        let enc = sample_encryption();
        let inputs = ProofInputs::new(&BigUint::from(7u8), &BigUint::from(99u8), &enc);

        assert_eq!(inputs.c0.len(), MESSAGE_SLOTS);
        assert_eq!(inputs.c1.len(), N);
        assert_eq!(inputs.k1.len(), N);

        let text = inputs.to_toml().unwrap();
        assert!(text.starts_with("secretKey = "));
        assert!(text.contains("waCommitment = "));
        assert!(!text.contains("ciphertextCommitment"));

        let secret_pos = text.find("secretKey").unwrap();
        let k1_pos = text.find("k1 =").unwrap();
        assert!(secret_pos < k1_pos);

        assert_eq!(ProofInputs::from_toml(&text).unwrap(), inputs);
    }

    #[test]
    fn test_proof_inputs_optional_commitment() {
        let enc = sample_encryption();
        let inputs = ProofInputs::new(&BigUint::from(7u8), &BigUint::from(99u8), &enc)
            .with_ciphertext_commitment(&BigUint::from(5u8));

        let text = inputs.to_toml().unwrap();
        assert!(text.contains("ciphertextCommitment = "));
        assert_eq!(
            ProofInputs::from_toml(&text).unwrap().ciphertext_commitment,
            Some(field_hex(&BigInt::from(5)))
        );
    }

    #[test]
    fn test_record_restores_ciphertext() {
        let enc = sample_encryption();
        let record = CiphertextRecord::from_encryption(&enc);

        let json = record.to_json().unwrap();
        let back = CiphertextRecord::from_json(&json).unwrap();
        assert_eq!(&back.to_ciphertext().unwrap(), enc.ciphertext());

        // noise renders as p + v
        let restored: Vec<BigInt> = back.e1.iter().map(|s| parse_field(s).unwrap()).collect();
        let original: Vec<BigInt> = enc.noise().e1().iter().map(|&v| BigInt::from(v)).collect();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_record_rejects_bad_c0() {
        let mut record = CiphertextRecord::from_encryption(&sample_encryption());
        record.c0[0] = field_hex(&BigInt::from(Q));
        assert!(matches!(record.to_ciphertext(), Err(AuditError::Encoding(_))));

        let mut record = CiphertextRecord::from_encryption(&sample_encryption());
        record.c0.pop();
        assert!(record.to_ciphertext().is_err());
    }
}
