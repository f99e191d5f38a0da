//! Auditor RLWE key material
//!
//! ```text
//! s  ternary secret, coefficients in {-1, 0, 1}
//! a  uniform in R_Q
//! e  small noise in [-3, 3]
//! b  = -(a·s) + e
//! ```
//!
//! The secret only ever exists whole inside the dealer and for the duration of
//! a single threshold decryption; its coefficients are wiped on drop.

use std::fmt;

use aegis_ring::{N, NOISE_BOUND, Q, RingElement, centered_mod_q, negacyclic_mul_mod_q};
use rand::{CryptoRng, Rng, RngCore};
use zeroize::Zeroizing;

/// RLWE secret key, coefficients stored reduced into `[0, Q)`
#[derive(Clone, PartialEq, Eq)]
pub struct RlweSecretKey {
    coeffs: Zeroizing<Vec<u64>>,
}

impl RlweSecretKey {
    pub(crate) fn from_reduced(coeffs: Vec<u64>) -> Self {
        debug_assert!(coeffs.len() == N && coeffs.iter().all(|&c| c < Q));
        Self {
            coeffs: Zeroizing::new(coeffs),
        }
    }

    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }

    /// Coefficients centered into `(-Q/2, Q/2]`
    pub fn to_centered(&self) -> Zeroizing<Vec<i64>> {
        Zeroizing::new(self.coeffs.iter().map(|&c| centered_mod_q(c, Q)).collect())
    }
}

impl fmt::Debug for RlweSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RlweSecretKey(..)")
    }
}

/// Freshly dealt auditor key pair
pub struct RlweKeyPair {
    secret: RlweSecretKey,
    a: RingElement,
    b: RingElement,
}

impl RlweKeyPair {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let s = RingElement::from_fn(|_| rng.gen_range(-1..=1));
        let a = RingElement::from_fn(|_| rng.gen_range(0..Q as i64));
        let a_s = negacyclic_mul_mod_q(a.coeffs(), s.coeffs(), N, Q);
        let b = RingElement::from_fn(|i| {
            rng.gen_range(-NOISE_BOUND..=NOISE_BOUND) - a_s[i] as i64
        });

        log::info!("dealt RLWE key pair (N = {N})");

        Self {
            secret: RlweSecretKey::from_reduced(s.into()),
            a,
            b,
        }
    }

    pub fn secret(&self) -> &RlweSecretKey {
        &self.secret
    }

    pub fn a(&self) -> &RingElement {
        &self.a
    }

    pub fn b(&self) -> &RingElement {
        &self.b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_secret_is_ternary() {
        let mut rng = StdRng::seed_from_u64(1);
        let kp = RlweKeyPair::generate(&mut rng);
        let centered = kp.secret().to_centered();
        assert_eq!(centered.len(), N);
        assert!(centered.iter().all(|v| (-1..=1).contains(v)));
    }

    #[test]
    fn test_public_key_relation() {
        let mut rng = StdRng::seed_from_u64(2);
        let kp = RlweKeyPair::generate(&mut rng);

        // b + a·s = e must be small
        let a_s = negacyclic_mul_mod_q(kp.a().coeffs(), kp.secret().coeffs(), N, Q);
        for (b, as_i) in kp.b().coeffs().iter().zip(&a_s) {
            let e = centered_mod_q((b + as_i) % Q, Q);
            assert!(e.abs() <= NOISE_BOUND);
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let mut rng = StdRng::seed_from_u64(3);
        let kp = RlweKeyPair::generate(&mut rng);
        assert_eq!(format!("{:?}", kp.secret()), "RlweSecretKey(..)");
    }
}
