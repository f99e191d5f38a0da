//! Aegis Audit Encryption
//!
//! Encrypts an account's identity public key to an auditor under RLWE, and
//! produces the witnesses a circuit needs to prove the ciphertext is honest.
//!
//! ```text
//! ┌──────────────┐   (x, y)    ┌─────────────────┐  c0, c1, r, e1, e2, k0, k1
//! │ Identity key │ ──────────► │ AuditEncryptor  │ ─────────────────────────► Prover.toml
//! └──────────────┘             └────────┬────────┘                            ciphertext.json
//!                                       │ (a, b)
//!                              ┌────────┴────────┐
//!                              │ PublicKeyCache  │ ◄── PublicKeySource
//!                              └─────────────────┘
//! ```
//!
//! The auditor's secret never exists in one place; see `aegis-threshold` for
//! the decryption side.

pub mod artifact;
pub mod encrypt;
pub mod error;
pub mod noise;
pub mod public_key;

pub use artifact::{CiphertextRecord, ProofInputs, field_hex, field_modulus, parse_field};
pub use encrypt::{AuditEncryption, AuditEncryptor, EncryptionWitness};
pub use error::AuditError;
pub use noise::Noise;
pub use public_key::{PublicKeyArtifact, PublicKeyCache, PublicKeySource, RlwePublicKey};
