//! Modular-arithmetic helpers shared by the group layer.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Multiplicative inverse of `a` modulo `m`, if `gcd(a, m) = 1`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }
    let a = BigInt::from_biguint(Sign::Plus, a.clone());
    let m = BigInt::from_biguint(Sign::Plus, m.clone());
    let e = a.extended_gcd(&m);
    if !e.gcd.is_one() {
        return None;
    }
    // x may be negative; lift it into [0, m).
    let x = ((e.x % &m) + &m) % &m;
    x.to_biguint()
}

const SMALL_PRIMES: [u32; 16] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// Miller-Rabin test over the first sixteen prime bases.
///
/// Deterministic for every 64-bit input and a negligible error rate for
/// the multi-thousand-bit group parameters this crate validates.
pub fn is_probable_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u8);
    if n < &two {
        return false;
    }
    for p in SMALL_PRIMES {
        let p = BigUint::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // n - 1 = 2^s * d with d odd
    let n_minus_1 = n - BigUint::one();
    let s = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> s;

    'witness: for p in SMALL_PRIMES {
        let mut x = BigUint::from(p).modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue;
        }
        for _ in 0..s.saturating_sub(1) {
            x = x.modpow(&two, n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}
