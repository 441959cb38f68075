//! Canonical byte encodings of integers and strings.
//!
//! Every hash input and every serialized artefact in this crate goes
//! through these functions, so their output must be stable down to the
//! byte: integers are minimal big-endian unsigned, strings are UTF-8,
//! decimal forms carry no sign and no leading zeros.

use num_bigint::BigUint;
use num_traits::{Num, Zero};

use crate::error::{CryptoError, CryptoResult};

/// Minimal big-endian unsigned representation of `x`.
///
/// Zero encodes as a single `0x00` byte, never as the empty array.
pub fn integer_to_byte_array(x: &BigUint) -> Vec<u8> {
    // BigUint::to_bytes_be already yields [0] for zero and no leading
    // zero bytes otherwise.
    x.to_bytes_be()
}

/// Interprets a non-empty byte array as a big-endian unsigned integer.
pub fn byte_array_to_integer(bytes: &[u8]) -> CryptoResult<BigUint> {
    if bytes.is_empty() {
        return Err(CryptoError::invalid(
            "byte array to convert must not be empty",
        ));
    }
    Ok(BigUint::from_bytes_be(bytes))
}

/// UTF-8 encoding of `s`.
pub fn string_to_byte_array(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

/// Strict UTF-8 decoding of a non-empty byte array.
pub fn byte_array_to_string(bytes: &[u8]) -> CryptoResult<String> {
    if bytes.is_empty() {
        return Err(CryptoError::invalid(
            "byte array to convert must not be empty",
        ));
    }
    String::from_utf8(bytes.to_vec())
        .map_err(|_| CryptoError::InvalidEncoding("byte array is not valid UTF-8".into()))
}

/// Sign-free decimal representation of `x`.
pub fn integer_to_string(x: &BigUint) -> String {
    x.to_str_radix(10)
}

/// Parses a decimal string matching `^[0-9]+$`.
pub fn string_to_integer(s: &str) -> CryptoResult<BigUint> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CryptoError::InvalidEncoding(format!(
            "string to convert must match ^[0-9]+$, got {s:?}"
        )));
    }
    BigUint::from_str_radix(s, 10)
        .map_err(|_| CryptoError::InvalidEncoding("string is not a valid decimal integer".into()))
}

/// Keeps the low `n` bits of `bytes`, big-endian.
///
/// The result has `ceil(n / 8)` bytes; when `n` is not a multiple of 8
/// the top byte is masked with `2^(n mod 8) - 1`.
pub fn cut_to_bit_length(bytes: &[u8], n: usize) -> CryptoResult<Vec<u8>> {
    if n == 0 || n > 8 * bytes.len() {
        return Err(CryptoError::invalid(format!(
            "requested bit length must be in [1, {}], got {n}",
            8 * bytes.len()
        )));
    }
    let length = n.div_ceil(8);
    let mut cut = bytes[bytes.len() - length..].to_vec();
    if n % 8 != 0 {
        cut[0] &= (1u16 << (n % 8)) as u8 - 1;
    }
    Ok(cut)
}

/// Number of bytes in the minimal big-endian representation of `x`.
pub fn byte_length(x: &BigUint) -> usize {
    if x.is_zero() {
        1
    } else {
        (x.bits() as usize).div_ceil(8)
    }
}
