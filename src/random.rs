//! Uniform randomness for exponents, byte strings and voting codes.
//!
//! All draws go through rejection sampling on the caller's CSPRNG so the
//! outputs are uniform on their stated ranges, never biased by a modular
//! reduction.

use std::collections::BTreeSet;
use std::sync::Arc;

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::codec;
use crate::error::{CryptoError, CryptoResult, MAX_REJECTION_ROUNDS};
use crate::math::{GroupVector, ZqElement, ZqGroup};

const LOG_TARGET: &str = "verimix::random";

/// Uniform integer in `[0, upper_bound)` by rejection sampling on
/// `bit_length(upper_bound)` bits.
pub fn gen_random_integer<R: RngCore + CryptoRng>(
    upper_bound: &BigUint,
    rng: &mut R,
) -> CryptoResult<BigUint> {
    if upper_bound.is_zero() {
        return Err(CryptoError::invalid("upper bound must be strictly positive"));
    }
    let bits = upper_bound.bits();
    for _ in 0..MAX_REJECTION_ROUNDS {
        let candidate = rng.gen_biguint(bits);
        if &candidate < upper_bound {
            return Ok(candidate);
        }
    }
    tracing::error!(target: LOG_TARGET, "rejection sampling exhausted its round budget");
    Err(CryptoError::RejectionLoop)
}

/// `n` uniform bytes.
pub fn random_bytes<R: RngCore + CryptoRng>(n: usize, rng: &mut R) -> Vec<u8> {
    let mut bytes = vec![0u8; n];
    rng.fill_bytes(&mut bytes);
    bytes
}

/// Uniform element of `Zq`.
pub fn gen_random_exponent<R: RngCore + CryptoRng>(
    group: &Arc<ZqGroup>,
    rng: &mut R,
) -> CryptoResult<ZqElement> {
    let value = gen_random_integer(group.q(), rng)?;
    ZqElement::create(value, group)
}

/// Uniform element of `[2, q - 1]`, the private-key exponent domain.
///
/// 0 and 1 are excluded: the corresponding public keys would leak the
/// plaintext outright.
pub fn gen_random_private_exponent<R: RngCore + CryptoRng>(
    group: &Arc<ZqGroup>,
    rng: &mut R,
) -> CryptoResult<ZqElement> {
    let two = BigUint::from(2u8);
    if group.q() <= &two {
        return Err(CryptoError::invalid(
            "group order is too small for private exponents",
        ));
    }
    let value = gen_random_integer(&(group.q() - &two), rng)? + &two;
    ZqElement::create(value, group)
}

/// Vector of `n` independent uniform `Zq` draws.
pub fn gen_random_vector<R: RngCore + CryptoRng>(
    group: &Arc<ZqGroup>,
    n: usize,
    rng: &mut R,
) -> CryptoResult<GroupVector<ZqElement>> {
    let elements = (0..n)
        .map(|_| gen_random_exponent(group, rng))
        .collect::<CryptoResult<Vec<_>>>()?;
    GroupVector::from_elements_with_group(elements, group)
}

/// Stateless service façade over the operating-system CSPRNG.
///
/// `OsRng` carries no shared state, so one service value may be used
/// from any number of threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomService;

impl RandomService {
    pub fn new() -> Self {
        RandomService
    }

    pub fn gen_random_integer(&self, upper_bound: &BigUint) -> CryptoResult<BigUint> {
        gen_random_integer(upper_bound, &mut OsRng)
    }

    pub fn random_bytes(&self, n: usize) -> Vec<u8> {
        random_bytes(n, &mut OsRng)
    }

    pub fn gen_random_vector(
        &self,
        group: &Arc<ZqGroup>,
        n: usize,
    ) -> CryptoResult<GroupVector<ZqElement>> {
        gen_random_vector(group, n, &mut OsRng)
    }

    /// Uniform base16 string of exactly `l` characters.
    pub fn gen_random_base16_string(&self, l: usize) -> CryptoResult<String> {
        self.gen_random_base_string(l, 4, codec::base16_encode)
    }

    /// Uniform base32 string of exactly `l` characters.
    pub fn gen_random_base32_string(&self, l: usize) -> CryptoResult<String> {
        self.gen_random_base_string(l, 5, codec::base32_encode)
    }

    /// Uniform base64 string of exactly `l` characters.
    pub fn gen_random_base64_string(&self, l: usize) -> CryptoResult<String> {
        self.gen_random_base_string(l, 6, codec::base64_encode)
    }

    fn gen_random_base_string(
        &self,
        l: usize,
        bits_per_char: usize,
        encode: fn(&[u8]) -> String,
    ) -> CryptoResult<String> {
        if l == 0 {
            return Err(CryptoError::invalid(
                "requested string length must be strictly positive",
            ));
        }
        let n_bytes = (l * bits_per_char).div_ceil(8);
        let encoded = encode(&self.random_bytes(n_bytes));
        Ok(encoded.chars().take(l).collect())
    }

    /// `n` distinct decimal codes in `[0, 10^l)`, zero-padded to `l`
    /// characters.
    pub fn gen_unique_decimal_strings(&self, l: usize, n: usize) -> CryptoResult<Vec<String>> {
        if l == 0 {
            return Err(CryptoError::invalid(
                "code length must be strictly positive",
            ));
        }
        let bound = BigUint::from(10u8).pow(l as u32);
        if BigUint::from(n) > bound {
            return Err(CryptoError::invalid(format!(
                "cannot draw {n} distinct codes of length {l}"
            )));
        }
        let mut seen = BTreeSet::new();
        let mut codes = Vec::with_capacity(n);
        while codes.len() < n {
            let draw = self.gen_random_integer(&bound)?;
            let code = format!("{draw:0>width$}", width = l);
            if seen.insert(code.clone()) {
                codes.push(code);
            }
        }
        Ok(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_integer_respects_its_bound() {
        let mut rng = StdRng::seed_from_u64(42);
        let bound = BigUint::from(1000u32);
        for _ in 0..200 {
            assert!(gen_random_integer(&bound, &mut rng).unwrap() < bound);
        }
        assert!(gen_random_integer(&BigUint::one(), &mut rng).unwrap().is_zero());
        assert!(gen_random_integer(&BigUint::zero(), &mut rng).is_err());
    }

    #[test]
    fn private_exponents_exclude_zero_and_one() {
        let mut rng = StdRng::seed_from_u64(7);
        let zq = Arc::new(ZqGroup::new(BigUint::from(23u32)).unwrap());
        let two = BigUint::from(2u8);
        for _ in 0..200 {
            let x = gen_random_private_exponent(&zq, &mut rng).unwrap();
            assert!(x.value() >= &two && x.value() < &BigUint::from(23u32));
        }
    }

    #[test]
    fn random_vector_has_requested_size_and_group() {
        let mut rng = StdRng::seed_from_u64(1);
        let zq = Arc::new(ZqGroup::new(BigUint::from(1019u32)).unwrap());
        let v = gen_random_vector(&zq, 8, &mut rng).unwrap();
        assert_eq!(v.len(), 8);
        assert_eq!(v.group().as_ref(), zq.as_ref());
    }

    #[test]
    fn base_strings_have_exact_length_and_alphabet() {
        let service = RandomService::new();
        let s16 = service.gen_random_base16_string(11).unwrap();
        assert_eq!(s16.len(), 11);
        assert!(s16.chars().all(|c| c.is_ascii_hexdigit()));
        let s32 = service.gen_random_base32_string(7).unwrap();
        assert_eq!(s32.len(), 7);
        let s64 = service.gen_random_base64_string(22).unwrap();
        assert_eq!(s64.len(), 22);
        assert!(service.gen_random_base16_string(0).is_err());
    }

    #[test]
    fn unique_decimal_strings_are_distinct_and_padded() {
        let service = RandomService::new();
        let codes = service.gen_unique_decimal_strings(4, 50).unwrap();
        assert_eq!(codes.len(), 50);
        let distinct: BTreeSet<_> = codes.iter().collect();
        assert_eq!(distinct.len(), 50);
        for code in &codes {
            assert_eq!(code.len(), 4);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
        }
        // 10^1 = 10 possible codes of length 1
        assert!(service.gen_unique_decimal_strings(1, 11).is_err());
        assert_eq!(service.gen_unique_decimal_strings(1, 10).unwrap().len(), 10);
    }
}
