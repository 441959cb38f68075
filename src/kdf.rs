//! HKDF-Expand(SHA-256) and derivation into `Zq`.

use std::sync::Arc;

use hkdf::Hkdf;
use num_bigint::BigUint;
use sha2::Sha256;

use crate::conversions::cut_to_bit_length;
use crate::error::{CryptoError, CryptoResult, MAX_REJECTION_ROUNDS};
use crate::math::{ZqElement, ZqGroup};

const HASH_LENGTH: usize = 32;

/// `HKDF-Expand(prk, info, length)` with a pseudo-random key of at
/// least one hash block.
pub fn expand(prk: &[u8], info: &[u8], length: usize) -> CryptoResult<Vec<u8>> {
    if prk.len() < HASH_LENGTH {
        return Err(CryptoError::invalid(format!(
            "the pseudo-random key must have at least {HASH_LENGTH} bytes"
        )));
    }
    if length == 0 || length > 255 * HASH_LENGTH {
        return Err(CryptoError::invalid(format!(
            "output length must lie in [1, {}]",
            255 * HASH_LENGTH
        )));
    }
    let hkdf = Hkdf::<Sha256>::from_prk(prk)
        .map_err(|_| CryptoError::invalid("pseudo-random key rejected by HKDF"))?;
    let mut output = vec![0u8; length];
    hkdf.expand(info, &mut output)
        .map_err(|_| CryptoError::invalid("requested HKDF output is too long"))?;
    Ok(output)
}

/// Derives a uniform element of `Zq`, re-feeding each rejected draw as
/// the next pseudo-random key.
///
/// The group order must span at least one hash block so that a draw is
/// itself a valid feedback key.
pub fn kdf_to_zq(prk: &[u8], info: &[u8], group: &Arc<ZqGroup>) -> CryptoResult<ZqElement> {
    let q_bits = group.q_bit_length();
    let length = q_bits.div_ceil(8);
    if length < HASH_LENGTH {
        return Err(CryptoError::invalid(format!(
            "the group order must span at least {HASH_LENGTH} bytes"
        )));
    }
    let mut current = expand(prk, info, length)?;
    for _ in 0..MAX_REJECTION_ROUNDS {
        let candidate = BigUint::from_bytes_be(&cut_to_bit_length(&current, q_bits)?);
        if &candidate < group.q() {
            return ZqElement::create(candidate, group);
        }
        current = expand(&current, info, length)?;
    }
    Err(CryptoError::RejectionLoop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Num;

    // RFC 5869 test case 1: expand only
    #[test]
    fn expand_matches_rfc_5869() {
        let prk = hex::decode("077709362c2e32df0ddc3f0dc47bba6390b6c73bb50f9c3122ec844ad7c2b3e5")
            .unwrap();
        let info = hex::decode("f0f1f2f3f4f5f6f7f8f9").unwrap();
        let okm = expand(&prk, &info, 42).unwrap();
        assert_eq!(
            hex::encode(&okm),
            "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865"
        );
    }

    #[test]
    fn expand_validates_its_bounds() {
        let prk = [0u8; 32];
        assert!(expand(&prk[..16], b"info", 32).is_err());
        assert!(expand(&prk, b"info", 0).is_err());
        assert!(expand(&prk, b"info", 255 * 32 + 1).is_err());
        assert!(expand(&prk, b"info", 255 * 32).is_ok());
    }

    #[test]
    fn kdf_to_zq_is_deterministic_and_in_range() {
        // order of the 2048-bit MODP group, a 2047-bit prime
        let corpus: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/testdata/modp-group.json"
            ))
            .unwrap(),
        )
        .unwrap();
        let q = BigUint::from_str_radix(corpus["q_hex"].as_str().unwrap(), 16).unwrap();
        let zq = Arc::new(ZqGroup::new(q).unwrap());
        let prk = [7u8; 32];
        let a = kdf_to_zq(&prk, b"context", &zq).unwrap();
        let b = kdf_to_zq(&prk, b"context", &zq).unwrap();
        assert_eq!(a, b);
        assert!(a.value() < zq.q());
        let c = kdf_to_zq(&prk, b"other", &zq).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn kdf_to_zq_rejects_narrow_orders() {
        let zq = Arc::new(ZqGroup::new(BigUint::from(1019u32)).unwrap());
        assert!(kdf_to_zq(&[7u8; 32], b"info", &zq).is_err());
    }
}
