//! Negacyclic polynomial arithmetic in `Z_Q[X] / (X^N + 1)`.
//!
//! All routines are schoolbook O(N²). With N = 1024 this is about a million
//! multiply-adds per product, which is well under a second and keeps every
//! intermediate value available to the witness generator.

use serde::{Deserialize, Serialize};

use crate::error::RingError;
use crate::params::{N, Q};

/// An element of `Z_Q[X] / (X^N + 1)` with every coefficient in `[0, Q)`.
///
/// Coefficients are stored lowest degree first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct RingElement {
    coeffs: Vec<u64>,
}

impl RingElement {
    /// Create from normalized coefficients. Rejects a wrong length or any value `>= Q`.
    pub fn new(coeffs: Vec<u64>) -> Result<Self, RingError> {
        if coeffs.len() != N {
            return Err(RingError::LengthMismatch {
                got: coeffs.len(),
                expected: N,
            });
        }
        if let Some((index, &value)) = coeffs.iter().enumerate().find(|(_, c)| **c >= Q) {
            return Err(RingError::Unreduced {
                index,
                value,
                modulus: Q,
            });
        }
        Ok(Self { coeffs })
    }

    /// Create from signed values, reducing each into `[0, Q)`.
    pub fn from_signed(values: &[i64]) -> Result<Self, RingError> {
        if values.len() != N {
            return Err(RingError::LengthMismatch {
                got: values.len(),
                expected: N,
            });
        }
        Ok(Self::from_fn(|i| values[i]))
    }

    /// Build from a per-position generator, reducing every value into `[0, Q)`.
    pub fn from_fn(mut f: impl FnMut(usize) -> i64) -> Self {
        let q = Q as i64;
        Self {
            coeffs: (0..N).map(|i| f(i).rem_euclid(q) as u64).collect(),
        }
    }

    /// The additive identity
    pub fn zero() -> Self {
        Self { coeffs: vec![0; N] }
    }

    /// The multiplicative identity `1 + 0·X + … + 0·X^(N-1)`
    pub fn one() -> Self {
        let mut coeffs = vec![0; N];
        coeffs[0] = 1;
        Self { coeffs }
    }

    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }

    /// Ring product
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            coeffs: negacyclic_mul_mod_q(&self.coeffs, &other.coeffs, N, Q),
        }
    }

    /// Row `k` of this element's negacyclic multiplication matrix
    pub fn matrix_row(&self, k: usize) -> Vec<u64> {
        negacyclic_matrix_row_mod_q(&self.coeffs, k, N, Q)
    }

    /// Coefficients as exact signed integers (for witness arithmetic)
    pub fn to_signed(&self) -> Vec<i64> {
        self.coeffs.iter().map(|&c| c as i64).collect()
    }
}

impl TryFrom<Vec<u64>> for RingElement {
    type Error = RingError;

    fn try_from(coeffs: Vec<u64>) -> Result<Self, Self::Error> {
        Self::new(coeffs)
    }
}

impl From<RingElement> for Vec<u64> {
    fn from(element: RingElement) -> Self {
        element.coeffs
    }
}

impl AsRef<[u64]> for RingElement {
    fn as_ref(&self) -> &[u64] {
        &self.coeffs
    }
}

/// Negacyclic convolution with every partial sum reduced mod `q`.
///
/// Inputs must hold at least `n` coefficients already reduced into `[0, q)`.
pub fn negacyclic_mul_mod_q(a: &[u64], b: &[u64], n: usize, q: u64) -> Vec<u64> {
    debug_assert!(a.len() >= n && b.len() >= n);

    let mut out = vec![0u64; n];
    for i in 0..n {
        if a[i] == 0 {
            continue;
        }
        for j in 0..n {
            let prod = mul_mod(a[i], b[j], q);
            let k = i + j;
            if k < n {
                out[k] = add_mod(out[k], prod, q);
            } else {
                // X^N = -1
                out[k - n] = add_mod(out[k - n], q - prod, q);
            }
        }
    }
    out
}

/// Negacyclic convolution over exact integers, no modular reduction.
pub fn negacyclic_mul_int(a: &[i64], b: &[i64], n: usize) -> Vec<i128> {
    debug_assert!(a.len() >= n && b.len() >= n);

    let mut out = vec![0i128; n];
    for i in 0..n {
        if a[i] == 0 {
            continue;
        }
        for j in 0..n {
            let prod = a[i] as i128 * b[j] as i128;
            let k = i + j;
            if k < n {
                out[k] += prod;
            } else {
                out[k - n] -= prod;
            }
        }
    }
    out
}

/// Row `k` of the `n × n` matrix `M` with `<M_k, x> mod q == (poly * x)[k]` for all `x`.
///
/// ```text
/// M_k[j] =  poly[k - j]          j <= k
/// M_k[j] = -poly[n + k - j]      j >  k   (stored as q - poly[..])
/// ```
pub fn negacyclic_matrix_row_mod_q(poly: &[u64], k: usize, n: usize, q: u64) -> Vec<u64> {
    assert!(k < n, "row {k} out of range for dimension {n}");

    (0..n)
        .map(|j| {
            if j <= k {
                poly[k - j] % q
            } else {
                (q - poly[n + k - j] % q) % q
            }
        })
        .collect()
}

/// `<row, x> mod q`, reducing after every term. `row` must already be in `[0, q)`.
pub fn inner_product_mod_q(row: &[u64], x: &[i64], q: u64) -> u64 {
    let qi = i128::from(q);
    row.iter().zip(x.iter()).fold(0u64, |acc, (&m, &v)| {
        let v = i128::from(v).rem_euclid(qi) as u64;
        add_mod(acc, mul_mod(m, v, q), q)
    })
}

// u128 intermediates keep both helpers exact for any 64-bit modulus
fn mul_mod(a: u64, b: u64, q: u64) -> u64 {
    (u128::from(a) * u128::from(b) % u128::from(q)) as u64
}

fn add_mod(a: u64, b: u64, q: u64) -> u64 {
    ((u128::from(a) + u128::from(b)) % u128::from(q)) as u64
}

/// `<row, x>` over exact integers.
pub fn inner_product_int(row: &[u64], x: &[i64]) -> i128 {
    row.iter()
        .zip(x.iter())
        .map(|(&m, &v)| m as i128 * v as i128)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_element(rng: &mut StdRng) -> RingElement {
        RingElement::new((0..N).map(|_| rng.gen_range(0..Q)).collect()).unwrap()
    }

    fn small_signed(rng: &mut StdRng) -> Vec<i64> {
        (0..N).map(|_| rng.gen_range(-3..=3)).collect()
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = RingElement::new(vec![0; N - 1]).unwrap_err();
        assert_eq!(
            err,
            RingError::LengthMismatch {
                got: N - 1,
                expected: N
            }
        );
        assert!(RingElement::from_signed(&[0; 64]).is_err());
    }

    #[test]
    fn test_rejects_unreduced() {
        let mut coeffs = vec![0; N];
        coeffs[5] = Q;
        assert!(matches!(
            RingElement::new(coeffs),
            Err(RingError::Unreduced { index: 5, .. })
        ));
    }

    #[test]
    fn test_from_signed_normalizes() {
        let mut values = vec![0i64; N];
        values[0] = -1;
        values[1] = Q as i64 + 2;
        let e = RingElement::from_signed(&values).unwrap();
        assert_eq!(e.coeffs()[0], Q - 1);
        assert_eq!(e.coeffs()[1], 2);
    }

    #[test]
    fn test_from_fn_reduces() {
        let e = RingElement::from_fn(|i| i as i64 - 1);
        assert_eq!(e.coeffs()[0], Q - 1);
        assert_eq!(e.coeffs()[N - 1], N as u64 - 2);
    }

    #[test]
    fn test_unit_element() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = random_element(&mut rng);
        assert_eq!(a.mul(&RingElement::one()), a);
        assert_eq!(RingElement::one().mul(&a), a);
        assert_eq!(a.mul(&RingElement::zero()), RingElement::zero());
    }

    #[test]
    fn test_commutative() {
        let mut rng = StdRng::seed_from_u64(2);
        let a = random_element(&mut rng);
        let b = random_element(&mut rng);
        assert_eq!(a.mul(&b), b.mul(&a));
    }

    #[test]
    fn test_x_to_the_n_is_minus_one() {
        // X^(N-1) * X = X^N = -1
        let mut x_top = vec![0u64; N];
        x_top[N - 1] = 1;
        let mut x = vec![0u64; N];
        x[1] = 1;

        let prod = negacyclic_mul_mod_q(&x_top, &x, N, Q);
        assert_eq!(prod[0], Q - 1);
        assert!(prod[1..].iter().all(|&c| c == 0));

        let exact = negacyclic_mul_int(&[0, 0, 0, 1], &[0, 1, 0, 0], 4);
        assert_eq!(exact, vec![-1, 0, 0, 0]);
    }

    #[test]
    fn test_matrix_row_equivalence() {
        let mut rng = StdRng::seed_from_u64(3);
        let poly = random_element(&mut rng);

        for _ in 0..2 {
            let x = RingElement::from_signed(&small_signed(&mut rng)).unwrap();
            let product = poly.mul(&x);
            let x_signed = x.to_signed();

            for i in 0..N {
                let row = poly.matrix_row(i);
                assert_eq!(
                    inner_product_mod_q(&row, &x_signed, Q),
                    product.coeffs()[i],
                    "row {i}"
                );
            }
        }
    }

    #[test]
    fn test_matrix_row_with_negative_vector() {
        let mut rng = StdRng::seed_from_u64(4);
        let poly = random_element(&mut rng);
        let r = small_signed(&mut rng);
        let r_ring = RingElement::from_signed(&r).unwrap();
        let product = poly.mul(&r_ring);

        for i in [0, 1, 63, 512, N - 1] {
            let row = poly.matrix_row(i);
            assert_eq!(inner_product_mod_q(&row, &r, Q), product.coeffs()[i]);
        }
    }

    #[test]
    fn test_wide_modulus_does_not_overflow() {
        // 2^61 - 1: coefficient products need more than 64 bits
        const WIDE_Q: u64 = (1 << 61) - 1;
        let mut rng = StdRng::seed_from_u64(6);
        let a: Vec<u64> = (0..4).map(|_| rng.gen_range(WIDE_Q / 2..WIDE_Q)).collect();
        let b: Vec<u64> = (0..4).map(|_| rng.gen_range(WIDE_Q / 2..WIDE_Q)).collect();

        let signed = |v: &[u64]| v.iter().map(|&c| c as i64).collect::<Vec<_>>();
        let exact = negacyclic_mul_int(&signed(&a), &signed(&b), 4);
        let modular = negacyclic_mul_mod_q(&a, &b, 4, WIDE_Q);
        for (e, m) in exact.iter().zip(&modular) {
            assert_eq!(e.rem_euclid(WIDE_Q as i128) as u64, *m);
        }

        let b_signed = signed(&b);
        for k in 0..4 {
            let row = negacyclic_matrix_row_mod_q(&a, k, 4, WIDE_Q);
            assert_eq!(inner_product_mod_q(&row, &b_signed, WIDE_Q), modular[k], "row {k}");
        }
    }

    #[test]
    fn test_int_convolution_agrees_mod_q() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = random_element(&mut rng);
        let r = small_signed(&mut rng);

        let exact = negacyclic_mul_int(&a.to_signed(), &r, N);
        let modular = a.mul(&RingElement::from_signed(&r).unwrap());

        for (e, m) in exact.iter().zip(modular.coeffs()) {
            assert_eq!(e.rem_euclid(Q as i128) as u64, *m);
        }
    }

    #[test]
    fn test_try_from_enforces_length() {
        assert!(RingElement::try_from(vec![1u64, 2, 3]).is_err());
        let v: Vec<u64> = RingElement::one().into();
        assert_eq!(v.len(), N);
    }
}
