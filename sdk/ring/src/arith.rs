//! Modular helpers over arbitrary-precision integers.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Num, Signed};

use crate::error::RingError;

/// `base^exponent mod modulus`, result in `[0, modulus)`.
///
/// # Panics
/// If `modulus` is not positive or `exponent` is negative.
pub fn mod_pow(base: &BigInt, exponent: &BigInt, modulus: &BigInt) -> BigInt {
    assert!(modulus.is_positive(), "modulus must be positive");
    assert!(!exponent.is_negative(), "exponent must be non-negative");
    reduce(base, modulus).modpow(exponent, modulus)
}

/// Reduces `x` into `[0, modulus)`.
pub fn reduce(x: &BigInt, modulus: &BigInt) -> BigInt {
    x.mod_floor(modulus)
}

/// Reduces `value` into `[0, modulus)` and then shifts it into `(-modulus/2, modulus/2]`.
///
/// Used to read back quantities whose sign is ambiguous after reduction, e.g. a field
/// element that encodes a small negative ring coefficient.
pub fn centered_mod(value: &BigInt, modulus: &BigInt) -> BigInt {
    let r = reduce(value, modulus);
    let half = modulus / 2;
    if r > half { r - modulus } else { r }
}

/// `centered_mod` for ring-scale values.
pub fn centered_mod_q(value: u64, q: u64) -> i64 {
    let r = value % q;
    if r > q / 2 {
        r as i64 - q as i64
    } else {
        r as i64
    }
}

/// Parses an external numeral: decimal, or hex with a `0x` prefix, optionally negative.
pub fn parse_numeral(text: &str) -> Result<BigInt, RingError> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) if !hex.is_empty() => BigInt::from_str_radix(hex, 16),
        Some(_) => return Err(RingError::InvalidNumeral(text.to_string())),
        None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            BigInt::from_str_radix(digits, 10)
        }
        None => return Err(RingError::InvalidNumeral(text.to_string())),
    };

    let value = parsed.map_err(|_| RingError::InvalidNumeral(text.to_string()))?;
    Ok(if negative { -value } else { value })
}
