//! Aegis Privacy SDK
//!
//! Identity keys, commitments, nullifiers and the commitment accumulator used by
//! private transfers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Private Transfer                           │
//! │  ┌──────────────┐  ┌──────────────┐  ┌───────────────────────┐  │
//! │  │  Nullifier   │  │    Value     │  │  Identity Commitment  │  │
//! │  │ H(sk, leaf)  │  │  Commitment  │  │     H(pk.x, pk.y)     │  │
//! │  └──────────────┘  └──────────────┘  └───────────────────────┘  │
//! │         │                 │                     │               │
//! │         │                 ▼                     ▼               │
//! │         │         ┌──────────────┐     audit path: pk.x, pk.y   │
//! │         │         │ Merkle tree  │     encrypted to auditor     │
//! │         │         │  (depth 16)  │                              │
//! │         ▼         └──────────────┘                              │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │          ZK proof (external toolchain, BN254)           │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod commitment;
pub mod hasher;
pub mod keys;
pub mod merkle;
pub mod nullifier;

pub use commitment::{Commitment, CommitmentScheme};
pub use hasher::{FieldHasher, PoseidonHasher};
pub use keys::{Keypair, PublicKey, SECRET_KEY_BITS};
pub use merkle::{MerkleError, MerklePath, MerkleTree, TREE_CAPACITY, TREE_DEPTH};
pub use nullifier::{Nullifier, NullifierKey, derive_nullifier};
