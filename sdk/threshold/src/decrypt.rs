//! Audit decryption
//!
//! ```text
//! noisy[i] = (c0[i] + (s · c1)[i]) mod Q         i < 64
//! byte[i]  = round(center(noisy[i]) / Δ) mod 256
//! ```

use aegis_ring::{
    Ciphertext, DELTA, MESSAGE_SLOTS, N, PLAINTEXT_MODULUS, Q, centered_mod_q, decode_message,
    negacyclic_mul_mod_q,
};
use num_bigint::BigUint;
use zeroize::Zeroizing;

use crate::error::ThresholdError;
use crate::reconstruct::reconstruct_secret_key;
use crate::secret::RlweSecretKey;
use crate::shares::KeyShare;

/// Recover the 64 plaintext bytes
pub fn decrypt_message(secret: &RlweSecretKey, ciphertext: &Ciphertext) -> [u8; MESSAGE_SLOTS] {
    let s_c1 = Zeroizing::new(negacyclic_mul_mod_q(
        secret.coeffs(),
        ciphertext.c1().coeffs(),
        N,
        Q,
    ));

    let mut message = [0u8; MESSAGE_SLOTS];
    for (i, byte) in message.iter_mut().enumerate() {
        let noisy = centered_mod_q((ciphertext.c0()[i] + s_c1[i]) % Q, Q);
        *byte = round_div(noisy, DELTA as i64).rem_euclid(PLAINTEXT_MODULUS as i64) as u8;
    }
    message
}

/// Recover the owner public key `(x, y)`
pub fn decrypt(secret: &RlweSecretKey, ciphertext: &Ciphertext) -> (BigUint, BigUint) {
    decode_message(&decrypt_message(secret, ciphertext))
}

/// Reconstruct the secret from `shares`, decrypt, and discard the secret.
pub fn threshold_decrypt(
    shares: &[KeyShare],
    ciphertext: &Ciphertext,
) -> Result<(BigUint, BigUint), ThresholdError> {
    let secret = reconstruct_secret_key(shares)?;
    let owner = decrypt(&secret, ciphertext);
    log::info!("threshold decryption with {} shares", shares.len());
    Ok(owner)
}

/// Round-half-up division
fn round_div(value: i64, divisor: i64) -> i64 {
    let quotient = value.div_euclid(divisor);
    if 2 * value.rem_euclid(divisor) >= divisor {
        quotient + 1
    } else {
        quotient
    }
}
