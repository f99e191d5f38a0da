//! Shamir Shares of the Auditor Secret
//!
//! Every ring position of the secret is shared independently with its own
//! random polynomial over the BN254 scalar field:
//!
//! ```text
//! f_pos(x) = s[pos] + a1·x + ... + a_{k-1}·x^{k-1}        (mod p)
//! share i  = { x = i, y[pos] = f_pos(i) }   for pos in 0..N
//! ```
//!
//! A negative secret coefficient is embedded as `p + s`, so reconstruction
//! must read the field element back as a centered integer before reducing
//! mod Q.

use aegis_ring::{N, Q, centered_mod_q, parse_numeral, reduce};
use ark_bn254::Fr;
use ark_ff::{PrimeField, UniformRand, Zero};
use num_bigint::{BigInt, BigUint};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::ThresholdError;
use crate::secret::RlweSecretKey;

/// The BN254 scalar field modulus
pub(crate) fn field_modulus() -> BigInt {
    BigInt::from(BigUint::from(Fr::MODULUS))
}

/// One evaluation point of one position's polynomial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePoint {
    pub x: u64,
    pub y: String,
}

/// External share artifact, one per holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareArtifact {
    pub share_index: u64,
    pub threshold: usize,
    pub total_shares: usize,
    /// Positional: `coefficients[pos]` shares secret coefficient `pos`
    pub coefficients: Vec<SharePoint>,
}

impl ShareArtifact {
    pub fn from_json(json: &str) -> Result<Self, ThresholdError> {
        serde_json::from_str(json)
            .map_err(|e| ThresholdError::InvalidShare(format!("share artifact: {e}")))
    }

    pub fn to_json(&self) -> Result<String, ThresholdError> {
        serde_json::to_string(self)
            .map_err(|e| ThresholdError::InvalidShare(format!("share artifact: {e}")))
    }
}

/// A validated share
#[derive(Debug, Clone)]
pub struct KeyShare {
    x: u64,
    threshold: usize,
    total: usize,
    ys: Vec<Fr>,
}

impl KeyShare {
    pub fn from_artifact(artifact: &ShareArtifact) -> Result<Self, ThresholdError> {
        let index = artifact.share_index;
        if index == 0 {
            return Err(ThresholdError::InvalidShare(
                "share index 0 would expose the secret".into(),
            ));
        }
        if artifact.threshold == 0 || artifact.threshold > artifact.total_shares {
            return Err(ThresholdError::InvalidShare(format!(
                "share {index}: threshold {} of {} total",
                artifact.threshold, artifact.total_shares
            )));
        }
        if artifact.coefficients.len() != N {
            return Err(ThresholdError::InvalidShare(format!(
                "share {index}: {} coefficients, expected {N}",
                artifact.coefficients.len()
            )));
        }

        let p = field_modulus();
        let ys = artifact
            .coefficients
            .iter()
            .enumerate()
            .map(|(pos, point)| {
                if point.x != index {
                    return Err(ThresholdError::InvalidShare(format!(
                        "share {index}: coefficient {pos} has x = {}",
                        point.x
                    )));
                }
                let y = parse_numeral(&point.y).map_err(|e| {
                    ThresholdError::InvalidShare(format!("share {index}: y[{pos}]: {e}"))
                })?;
                let (_, magnitude) = reduce(&y, &p).into_parts();
                Ok(Fr::from(magnitude))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            x: index,
            threshold: artifact.threshold,
            total: artifact.total_shares,
            ys,
        })
    }

    /// Evaluation point, equal to the share index
    pub fn x(&self) -> u64 {
        self.x
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub(crate) fn ys(&self) -> &[Fr] {
        &self.ys
    }
}

/// Split an RLWE secret into `total` shares, any `threshold` of which reconstruct it.
///
/// # Arguments
/// * `secret` - The key to split
/// * `threshold` - K: minimum shares needed to reconstruct
/// * `total` - N: total number of shares to generate
pub fn split_secret_key<R: RngCore + CryptoRng>(
    secret: &RlweSecretKey,
    threshold: usize,
    total: usize,
    rng: &mut R,
) -> Result<Vec<ShareArtifact>, ThresholdError> {
    if threshold > total || threshold == 0 {
        return Err(ThresholdError::InvalidThreshold {
            k: threshold,
            n: total,
        });
    }

    let mut shares: Vec<ShareArtifact> = (1..=total as u64)
        .map(|share_index| ShareArtifact {
            share_index,
            threshold,
            total_shares: total,
            coefficients: Vec::with_capacity(N),
        })
        .collect();

    let mut poly = vec![Fr::zero(); threshold];
    for &coeff in secret.coeffs() {
        poly[0] = signed_to_field(centered_mod_q(coeff, Q));
        for c in poly.iter_mut().skip(1) {
            *c = Fr::rand(rng);
        }

        for share in shares.iter_mut() {
            let x = Fr::from(share.share_index);
            // Horner
            let y = poly.iter().rev().fold(Fr::zero(), |acc, c| acc * x + c);
            share.coefficients.push(SharePoint {
                x: share.share_index,
                y: BigUint::from(y).to_string(),
            });
        }
    }

    log::info!("split secret key into {total} shares (threshold {threshold})");
    Ok(shares)
}

fn signed_to_field(value: i64) -> Fr {
    if value < 0 {
        -Fr::from(value.unsigned_abs())
    } else {
        Fr::from(value as u64)
    }
}
