//! Secret reconstruction
//!
//! Lagrange interpolation at x = 0, done independently for every ring
//! position. The weights only depend on the quorum's x values, so they are
//! computed once and reused for all N positions.
//!
//! ```text
//! λ_i   = Π_{j≠i} x_j / (x_j - x_i)                 (mod p)
//! s[pos] = Σ_i λ_i · y_i[pos]                         (mod p)
//!        -> centered into (-p/2, p/2] -> mod Q
//! ```

use std::collections::HashSet;

use aegis_ring::{N, Q, centered_mod, reduce};
use ark_bn254::Fr;
use ark_ff::{Field, One};
use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;

use crate::error::ThresholdError;
use crate::secret::RlweSecretKey;
use crate::shares::{KeyShare, field_modulus};

/// Rebuild the auditor secret from a quorum.
///
/// Every supplied x must be distinct. Interpolation uses the first
/// `threshold` shares; any further shares are ignored.
pub fn reconstruct_secret_key(shares: &[KeyShare]) -> Result<RlweSecretKey, ThresholdError> {
    let first = shares
        .first()
        .ok_or(ThresholdError::InsufficientShares { got: 0, need: 1 })?;
    let threshold = first.threshold();

    if let Some(odd) = shares
        .iter()
        .find(|s| s.threshold() != threshold || s.total() != first.total())
    {
        return Err(ThresholdError::InvalidShare(format!(
            "share {} was dealt as {}-of-{}, expected {}-of-{}",
            odd.x(),
            odd.threshold(),
            odd.total(),
            threshold,
            first.total()
        )));
    }

    let mut distinct = HashSet::with_capacity(shares.len());
    if let Some(repeated) = shares.iter().map(KeyShare::x).find(|&x| !distinct.insert(x)) {
        return Err(ThresholdError::DegenerateShareSet { x: repeated });
    }
    if distinct.len() < threshold {
        return Err(ThresholdError::InsufficientShares {
            got: distinct.len(),
            need: threshold,
        });
    }

    let quorum = &shares[..threshold];
    let xs: Vec<u64> = quorum.iter().map(KeyShare::x).collect();
    let weights = lagrange_weights_at_zero(&xs)?;
    log::debug!("reconstructing secret key from shares {xs:?}");

    let p = field_modulus();
    let q = BigInt::from(Q);
    let coeffs = (0..N)
        .map(|pos| {
            let value: Fr = quorum
                .iter()
                .zip(&weights)
                .map(|(share, w)| share.ys()[pos] * w)
                .sum();
            field_to_ring(value, &p, &q)
        })
        .collect::<Result<Vec<u64>, _>>()?;

    Ok(RlweSecretKey::from_reduced(coeffs))
}

/// Lagrange basis polynomials of `xs` evaluated at 0
pub fn lagrange_weights_at_zero(xs: &[u64]) -> Result<Vec<Fr>, ThresholdError> {
    xs.iter()
        .enumerate()
        .map(|(i, &xi)| {
            let mut numerator = Fr::one();
            let mut denominator = Fr::one();

            for (j, &xj) in xs.iter().enumerate() {
                if i == j {
                    continue;
                }
                if xi == xj {
                    return Err(ThresholdError::DegenerateShareSet { x: xi });
                }
                numerator *= Fr::from(xj);
                denominator *= Fr::from(xj) - Fr::from(xi);
            }

            denominator
                .inverse()
                .map(|inv| numerator * inv)
                .ok_or(ThresholdError::DegenerateShareSet { x: xi })
        })
        .collect()
}

/// Field element -> signed integer -> ring coefficient in `[0, Q)`
fn field_to_ring(value: Fr, p: &BigInt, q: &BigInt) -> Result<u64, ThresholdError> {
    let signed = centered_mod(&BigInt::from(BigUint::from(value)), p);
    reduce(&signed, q).to_u64().ok_or_else(|| {
        ThresholdError::InvalidShare("reconstructed coefficient out of range".into())
    })
}
