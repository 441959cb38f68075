use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::One;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Shake256};

use super::hashable::Hashable;
use crate::conversions::{cut_to_bit_length, integer_to_byte_array};
use crate::error::{CryptoError, CryptoResult, MAX_REJECTION_ROUNDS};
use crate::math::{GqElement, GqGroup, ZqElement, ZqGroup};

const LOG_TARGET: &str = "verimix::hashing";

/// One-byte domain tags keeping the hashable variants apart.
const TAG_BYTE_ARRAY: u8 = 0x00;
const TAG_NUMBER: u8 = 0x01;
const TAG_STRING: u8 = 0x02;
const TAG_LIST: u8 = 0x03;

/// Recursive hashing with typed domain separation.
///
/// The fixed-length primitive is SHA3-256 and the extendable-output
/// primitive is SHAKE-256. The digest length is part of the service so
/// that the challenge-size guard `hash_length_bits < bit_length(q)` can
/// be exercised with small test groups; production code uses [`new`]
/// and the full 32 bytes.
///
/// [`new`]: HashService::new
#[derive(Clone, Debug)]
pub struct HashService {
    hash_length_bytes: usize,
}

impl HashService {
    /// Full-length SHA3-256 service.
    pub fn new() -> Self {
        HashService {
            hash_length_bytes: 32,
        }
    }

    /// A service whose fixed-length digests are truncated to
    /// `hash_length_bytes`. Anything above the SHA3-256 output length
    /// is rejected.
    pub fn with_hash_length(hash_length_bytes: usize) -> CryptoResult<Self> {
        if hash_length_bytes == 0 || hash_length_bytes > 32 {
            return Err(CryptoError::invalid(
                "hash length must lie in [1, 32] bytes",
            ));
        }
        Ok(HashService { hash_length_bytes })
    }

    pub fn hash_length_bytes(&self) -> usize {
        self.hash_length_bytes
    }

    pub fn hash_length_bits(&self) -> usize {
        8 * self.hash_length_bytes
    }

    /// `recursiveHash` over one or more values.
    ///
    /// A single value hashes as itself; two or more hash as the list of
    /// the values. Fails with `EmptyHash` when no value or an empty
    /// list is supplied.
    pub fn recursive_hash(&self, values: &[Hashable]) -> CryptoResult<Vec<u8>> {
        hash_values(
            values,
            NodeDigest::Sha3 {
                truncate_to: self.hash_length_bytes,
            },
        )
    }

    /// `recursiveHashOfLength`: the XOF variant producing exactly
    /// `length_bits` bits, the last partial byte masked off.
    pub fn recursive_hash_of_length(
        &self,
        length_bits: usize,
        values: &[Hashable],
    ) -> CryptoResult<Vec<u8>> {
        if length_bits == 0 {
            return Err(CryptoError::invalid(
                "requested output length must be strictly positive",
            ));
        }
        let n_bytes = length_bits.div_ceil(8);
        let uncut = hash_values(values, NodeDigest::Shake { n_bytes })?;
        cut_to_bit_length(&uncut, length_bits)
    }

    /// Uniform element of `Zq` derived from the values.
    ///
    /// Draws `bit_length(q)` bits from the XOF and rejects by hashing
    /// again with the failed draw prepended, so the result is
    /// indistinguishable from uniform on `[0, q)`.
    pub fn recursive_hash_to_zq(
        &self,
        group: &Arc<ZqGroup>,
        values: &[Hashable],
    ) -> CryptoResult<ZqElement> {
        if values.is_empty() {
            return Err(CryptoError::EmptyHash);
        }
        let length_bits = group.q_bit_length();
        let mut hash = self.recursive_hash_of_length(length_bits, values)?;
        for _ in 0..MAX_REJECTION_ROUNDS {
            let candidate = BigUint::from_bytes_be(&hash);
            if &candidate < group.q() {
                return ZqElement::create(candidate, group);
            }
            let mut retry = Vec::with_capacity(values.len() + 1);
            retry.push(Hashable::Number(candidate));
            retry.extend_from_slice(values);
            hash = self.recursive_hash_of_length(length_bits, &retry)?;
        }
        tracing::error!(target: LOG_TARGET, "hash-to-Zq rejection loop exhausted its round budget");
        Err(CryptoError::RejectionLoop)
    }

    /// Hashes `x` into `[1, q - 1]` and squares the result into the
    /// quadratic-residue group.
    pub fn hash_and_square(&self, x: &BigUint, group: &Arc<GqGroup>) -> CryptoResult<GqElement> {
        if self.hash_length_bits() >= group.q_bit_length() {
            return Err(CryptoError::invalid(format!(
                "hash output of {} bits is too wide for a group order of {} bits",
                self.hash_length_bits(),
                group.q_bit_length(),
            )));
        }
        let zq_minus_one = Arc::new(ZqGroup::new(group.q() - BigUint::one())?);
        let h = self.recursive_hash_to_zq(&zq_minus_one, &[Hashable::Number(x.clone())])?;
        GqElement::from_square_root(&(h.value() + BigUint::one()), group)
    }
}

impl Default for HashService {
    fn default() -> Self {
        HashService::new()
    }
}

/// The node-level primitive: a tagged frame fed to either the
/// fixed-length hash or the XOF.
#[derive(Clone, Copy)]
enum NodeDigest {
    Sha3 { truncate_to: usize },
    Shake { n_bytes: usize },
}

impl NodeDigest {
    fn digest(self, tag: u8, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            NodeDigest::Sha3 { truncate_to } => {
                let mut hasher = Sha3_256::new();
                Digest::update(&mut hasher, [tag]);
                for part in parts {
                    Digest::update(&mut hasher, part);
                }
                hasher.finalize()[..truncate_to].to_vec()
            }
            NodeDigest::Shake { n_bytes } => {
                let mut hasher = Shake256::default();
                hasher.update(&[tag]);
                for part in parts {
                    hasher.update(part);
                }
                let mut out = vec![0u8; n_bytes];
                hasher.finalize_xof().read(&mut out);
                out
            }
        }
    }
}

fn hash_values(values: &[Hashable], digest: NodeDigest) -> CryptoResult<Vec<u8>> {
    match values {
        [] => Err(CryptoError::EmptyHash),
        [single] => hash_node(single, digest),
        many => {
            // k >= 2 arguments hash as the list of the arguments
            let children = many
                .iter()
                .map(|v| hash_node(v, digest))
                .collect::<CryptoResult<Vec<_>>>()?;
            Ok(hash_list_node(&children, digest))
        }
    }
}

fn hash_node(value: &Hashable, digest: NodeDigest) -> CryptoResult<Vec<u8>> {
    match value {
        Hashable::ByteArray(bytes) => Ok(digest.digest(TAG_BYTE_ARRAY, &[bytes.as_slice()])),
        Hashable::Number(n) => {
            let bytes = integer_to_byte_array(n);
            Ok(digest.digest(TAG_NUMBER, &[bytes.as_slice()]))
        }
        Hashable::String(s) => Ok(digest.digest(TAG_STRING, &[s.as_bytes()])),
        Hashable::List(items) => {
            if items.is_empty() {
                return Err(CryptoError::EmptyHash);
            }
            let children = items
                .iter()
                .map(|v| hash_node(v, digest))
                .collect::<CryptoResult<Vec<_>>>()?;
            Ok(hash_list_node(&children, digest))
        }
    }
}

fn hash_list_node(children: &[Vec<u8>], digest: NodeDigest) -> Vec<u8> {
    let parts: Vec<&[u8]> = children.iter().map(|c| c.as_slice()).collect();
    digest.digest(TAG_LIST, &parts)
}
