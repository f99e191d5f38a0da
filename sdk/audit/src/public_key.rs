//! Auditor Public Key
//!
//! The RLWE public key `(a, b)` arrives as an external JSON artifact of numerals,
//! is validated into ring elements once, and is then cached read-only for the
//! lifetime of the owning [`PublicKeyCache`].

use std::sync::{Arc, OnceLock};

use aegis_ring::{N, Q, RingElement, parse_numeral, reduce};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::AuditError;

/// External public-key artifact: `{"a": [N numerals], "b": [N numerals]}`
///
/// Numerals are decimal or `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyArtifact {
    pub a: Vec<String>,
    pub b: Vec<String>,
}

impl PublicKeyArtifact {
    /// Render ring elements as a decimal artifact
    pub fn from_rings(a: &RingElement, b: &RingElement) -> Self {
        let render =
            |e: &RingElement| -> Vec<String> { e.coeffs().iter().map(|c| c.to_string()).collect() };
        Self {
            a: render(a),
            b: render(b),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, AuditError> {
        serde_json::from_str(json)
            .map_err(|e| AuditError::InvalidKeyMaterial(format!("public key artifact: {e}")))
    }
}

/// Validated RLWE public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RlwePublicKey {
    a: RingElement,
    b: RingElement,
}

impl RlwePublicKey {
    pub fn new(a: RingElement, b: RingElement) -> Self {
        Self { a, b }
    }

    /// Decode and validate an artifact. Every numeral is reduced into `[0, Q)`.
    pub fn from_artifact(artifact: &PublicKeyArtifact) -> Result<Self, AuditError> {
        Ok(Self {
            a: decode_ring("a", &artifact.a)?,
            b: decode_ring("b", &artifact.b)?,
        })
    }

    pub fn a(&self) -> &RingElement {
        &self.a
    }

    pub fn b(&self) -> &RingElement {
        &self.b
    }
}

fn decode_ring(name: &str, numerals: &[String]) -> Result<RingElement, AuditError> {
    if numerals.len() != N {
        return Err(AuditError::InvalidKeyMaterial(format!(
            "{name} has {} coefficients, expected {N}",
            numerals.len()
        )));
    }

    let q = BigInt::from(Q);
    let coeffs = numerals
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let value = parse_numeral(text)
                .map_err(|e| AuditError::InvalidKeyMaterial(format!("{name}[{i}]: {e}")))?;
            reduce(&value, &q).to_u64().ok_or_else(|| {
                AuditError::InvalidKeyMaterial(format!("{name}[{i}] out of range"))
            })
        })
        .collect::<Result<Vec<u64>, AuditError>>()?;

    Ok(RingElement::new(coeffs)?)
}

/// Where the public key comes from (file, network, fixture, ...)
///
/// Retrieval failures should be reported as [`AuditError::KeyUnavailable`].
pub trait PublicKeySource {
    fn fetch(&self) -> Result<PublicKeyArtifact, AuditError>;
}

/// An artifact that has already been retrieved
impl PublicKeySource for PublicKeyArtifact {
    fn fetch(&self) -> Result<PublicKeyArtifact, AuditError> {
        Ok(self.clone())
    }
}

/// Write-once cache for the auditor public key.
///
/// Concurrent first loads may each fetch and decode; whichever finishes first
/// wins and every caller observes that one value afterwards.
#[derive(Debug, Default)]
pub struct PublicKeyCache {
    cell: OnceLock<Arc<RlwePublicKey>>,
}

impl PublicKeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-populated with an already decoded key
    pub fn with_key(key: RlwePublicKey) -> Self {
        let cache = Self::new();
        let _ = cache.cell.set(Arc::new(key));
        cache
    }

    /// The cached key, if it has been loaded
    pub fn get(&self) -> Option<Arc<RlwePublicKey>> {
        self.cell.get().cloned()
    }

    /// Return the cached key, loading it from `source` on first use.
    ///
    /// A failed load leaves the cache empty.
    pub fn get_or_load<S: PublicKeySource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<Arc<RlwePublicKey>, AuditError> {
        if let Some(key) = self.cell.get() {
            return Ok(key.clone());
        }

        let artifact = source.fetch()?;
        let key = RlwePublicKey::from_artifact(&artifact)?;

        if self.cell.set(Arc::new(key)).is_err() {
            log::debug!("public key cache already populated by a concurrent load");
        } else {
            log::info!("public key cache populated");
        }

        self.cell
            .get()
            .cloned()
            .ok_or_else(|| AuditError::KeyUnavailable("public key cache empty after load".into()))
    }
}
