//! Plaintext packing
//!
//! The audit plaintext is two field elements (owner x, owner y), each written
//! little-endian into 32 one-byte slots:
//!
//! ```text
//! slot:   0 ........ 31 | 32 ....... 63
//! byte:   owner_x (LE)  | owner_y (LE)
//! ```

use num_bigint::BigUint;

use crate::error::RingError;
use crate::params::MESSAGE_SLOTS;

/// Bytes per packed field element
pub const FIELD_BYTES: usize = MESSAGE_SLOTS / 2;

/// Pack two values into the 64 message slots.
pub fn encode_message(
    owner_x: &BigUint,
    owner_y: &BigUint,
) -> Result<[u8; MESSAGE_SLOTS], RingError> {
    let mut message = [0u8; MESSAGE_SLOTS];
    write_le(owner_x, &mut message[..FIELD_BYTES])?;
    write_le(owner_y, &mut message[FIELD_BYTES..])?;
    Ok(message)
}

/// Unpack the 64 message slots into (owner_x, owner_y).
pub fn decode_message(message: &[u8; MESSAGE_SLOTS]) -> (BigUint, BigUint) {
    (
        BigUint::from_bytes_le(&message[..FIELD_BYTES]),
        BigUint::from_bytes_le(&message[FIELD_BYTES..]),
    )
}

fn write_le(value: &BigUint, out: &mut [u8]) -> Result<(), RingError> {
    let bytes = value.to_bytes_le();
    // zero encodes as [0]
    if bytes.len() > out.len() {
        return Err(RingError::MessageTooWide {
            bytes: bytes.len(),
            max: out.len(),
        });
    }
    out[..bytes.len()].copy_from_slice(&bytes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_layout() {
        let x = BigUint::from(0x0102u32);
        let y = BigUint::from(0xffu32);
        let m = encode_message(&x, &y).unwrap();

        assert_eq!(m[0], 0x02);
        assert_eq!(m[1], 0x01);
        assert!(m[2..32].iter().all(|&b| b == 0));
        assert_eq!(m[32], 0xff);
        assert_eq!(decode_message(&m), (x, y));
    }

    #[test]
    fn test_full_width_values() {
        let max = (BigUint::from(1u8) << 256u32) - 1u8;
        let m = encode_message(&max, &BigUint::from(0u8)).unwrap();
        assert!(m[..32].iter().all(|&b| b == 0xff));
        assert_eq!(decode_message(&m).0, max);
    }

    #[test]
    fn test_rejects_wide_value() {
        let too_wide = BigUint::from(1u8) << 256u32;
        assert_eq!(
            encode_message(&BigUint::from(1u8), &too_wide),
            Err(RingError::MessageTooWide { bytes: 33, max: 32 })
        );
    }
}
