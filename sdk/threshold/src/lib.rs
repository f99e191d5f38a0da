//! Aegis Threshold Decryption
//!
//! The auditor's RLWE secret is Shamir-shared across key holders. A quorum
//! pools its shares to rebuild the secret for exactly one decryption.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                         Audit Decryption Flow                      │
//! │                                                                    │
//! │  1. Dealer                2. Holders              3. Quorum        │
//! │  ┌──────────────┐        ┌────────────┐          ┌──────────────┐  │
//! │  │ RlweKeyPair  │─split─▶│ share_i    │──K of N─▶│ reconstruct  │  │
//! │  │ (a, b) public│        │ (x, y[N])  │          │ + decrypt    │  │
//! │  └──────────────┘        └────────────┘          └──────────────┘  │
//! │                                                                    │
//! │  The rebuilt secret is wiped as soon as the plaintext is read.     │
//! └───────────────────────────────────────────────────────────────────┘
//! ```

pub mod decrypt;
pub mod error;
pub mod reconstruct;
pub mod secret;
pub mod shares;

pub use decrypt::{decrypt, decrypt_message, threshold_decrypt};
pub use error::ThresholdError;
pub use reconstruct::{lagrange_weights_at_zero, reconstruct_secret_key};
pub use secret::{RlweKeyPair, RlweSecretKey};
pub use shares::{KeyShare, ShareArtifact, SharePoint, split_secret_key};
