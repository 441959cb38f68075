//! RFC 4648 codecs with strict decoding.
//!
//! Encoding is total; decoding validates the alphabet and padding and
//! fails with `InvalidEncoding` instead of guessing.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::{CryptoError, CryptoResult};

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Uppercase base16 encoding.
pub fn base16_encode(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Strict uppercase base16 decoding.
pub fn base16_decode(s: &str) -> CryptoResult<Vec<u8>> {
    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
    {
        return Err(CryptoError::InvalidEncoding(
            "base16 strings use the uppercase alphabet 0-9A-F".into(),
        ));
    }
    hex::decode(s).map_err(|e| CryptoError::InvalidEncoding(format!("invalid base16 string: {e}")))
}

/// Padded base32 encoding over the RFC 4648 alphabet.
pub fn base32_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(5) * 8);
    for chunk in bytes.chunks(5) {
        let mut buffer = [0u8; 5];
        buffer[..chunk.len()].copy_from_slice(chunk);
        let bits = u64::from_be_bytes([
            0, 0, 0, buffer[0], buffer[1], buffer[2], buffer[3], buffer[4],
        ]);
        // ceil(8 * len / 5) symbols carry data, the rest is padding
        let n_symbols = (8 * chunk.len()).div_ceil(5);
        for symbol in 0..8 {
            if symbol < n_symbols {
                let index = ((bits >> (35 - 5 * symbol)) & 0x1F) as usize;
                out.push(BASE32_ALPHABET[index] as char);
            } else {
                out.push('=');
            }
        }
    }
    out
}

/// Strict base32 decoding: canonical padding and zeroed trailing bits.
pub fn base32_decode(s: &str) -> CryptoResult<Vec<u8>> {
    if s.len() % 8 != 0 {
        return Err(CryptoError::InvalidEncoding(
            "base32 strings come in blocks of 8 characters".into(),
        ));
    }
    let trimmed = s.trim_end_matches('=');
    if trimmed.contains('=') {
        return Err(CryptoError::InvalidEncoding(
            "base32 padding may only appear at the end".into(),
        ));
    }
    let n_symbols = trimmed.len();
    let n_bytes = n_symbols * 5 / 8;
    // Only lengths produced by the encoder are canonical.
    if n_symbols % 8 != 0 && !matches!(n_symbols % 8, 2 | 4 | 5 | 7) {
        return Err(CryptoError::InvalidEncoding(
            "invalid base32 length".into(),
        ));
    }
    let mut out = Vec::with_capacity(n_bytes);
    let mut accumulator: u64 = 0;
    let mut n_bits = 0u32;
    for c in trimmed.bytes() {
        let index = BASE32_ALPHABET
            .iter()
            .position(|&a| a == c)
            .ok_or_else(|| {
                CryptoError::InvalidEncoding(format!(
                    "invalid base32 character {:?}",
                    c as char
                ))
            })?;
        accumulator = (accumulator << 5) | index as u64;
        n_bits += 5;
        if n_bits >= 8 {
            n_bits -= 8;
            out.push((accumulator >> n_bits) as u8);
        }
    }
    // Trailing bits left over from the last symbol must be zero.
    if n_bits > 0 && accumulator & ((1 << n_bits) - 1) != 0 {
        return Err(CryptoError::InvalidEncoding(
            "non-canonical base32 trailing bits".into(),
        ));
    }
    Ok(out)
}

/// Padded standard base64 encoding.
pub fn base64_encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Strict standard base64 decoding.
pub fn base64_decode(s: &str) -> CryptoResult<Vec<u8>> {
    BASE64
        .decode(s)
        .map_err(|e| CryptoError::InvalidEncoding(format!("invalid base64 string: {e}")))
}
