use std::fmt;
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use super::arith::is_probable_prime;
use crate::error::{CryptoError, CryptoResult};

/// The quadratic-residue subgroup of `(Z/pZ)*` for a safe prime `p = 2q + 1`.
///
/// Groups are value-equal by their parameters and shared behind an [`Arc`]
/// by every element created in them. Construction validates the parameters
/// once; a group should therefore be built a single time per election and
/// reused.
#[derive(Clone, PartialEq, Eq)]
pub struct GqGroup {
    p: BigUint,
    q: BigUint,
    g: BigUint,
}

impl GqGroup {
    /// Builds and validates the group `(p, q, g)`.
    ///
    /// Requires `p` and `q` probable primes with `p = 2q + 1`, and
    /// `g ∈ [2, p - 1]` a member of the order-`q` subgroup.
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> CryptoResult<Self> {
        if p != BigUint::from(2u8) * &q + BigUint::one() {
            return Err(CryptoError::invalid("group modulus must satisfy p = 2q + 1"));
        }
        if !is_probable_prime(&p) {
            return Err(CryptoError::invalid("group modulus p must be prime"));
        }
        if !is_probable_prime(&q) {
            return Err(CryptoError::invalid("group order q must be prime"));
        }
        if g < BigUint::from(2u8) || g >= p {
            return Err(CryptoError::invalid("generator must lie in [2, p - 1]"));
        }
        if !g.modpow(&q, &p).is_one() {
            return Err(CryptoError::invalid(
                "generator must belong to the order-q subgroup",
            ));
        }
        Ok(GqGroup { p, q, g })
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn q(&self) -> &BigUint {
        &self.q
    }

    /// The raw generator value; use [`crate::math::GqElement::generator`]
    /// for the element form.
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// True when `value` is a member of the subgroup, i.e.
    /// `1 <= value < p` and `value^q mod p = 1`.
    pub fn is_group_member(&self, value: &BigUint) -> bool {
        !value.is_zero() && value < &self.p && value.modpow(&self.q, &self.p).is_one()
    }

    pub fn q_bit_length(&self) -> usize {
        self.q.bits() as usize
    }
}

impl fmt::Debug for GqGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GqGroup")
            .field("p", &self.p)
            .field("q", &self.q)
            .field("g", &self.g)
            .finish()
    }
}

/// The ring of integers modulo `q`.
///
/// The order is not primality-checked here: protocols that need a prime
/// order obtain it from a validated [`GqGroup`], while hash-to-Zq and key
/// derivation deliberately work modulo composite orders such as `q - 1`.
#[derive(Clone, PartialEq, Eq)]
pub struct ZqGroup {
    q: BigUint,
}

impl ZqGroup {
    pub fn new(q: BigUint) -> CryptoResult<Self> {
        if q <= BigUint::one() {
            return Err(CryptoError::invalid("group order must be greater than 1"));
        }
        Ok(ZqGroup { q })
    }

    /// The exponent group of `gq`, sharing its order `q`.
    pub fn same_order_as(gq: &GqGroup) -> Arc<ZqGroup> {
        Arc::new(ZqGroup {
            q: gq.q().clone(),
        })
    }

    pub fn q(&self) -> &BigUint {
        &self.q
    }

    pub fn q_bit_length(&self) -> usize {
        self.q.bits() as usize
    }
}

impl fmt::Debug for ZqGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZqGroup").field("q", &self.q).finish()
    }
}

#[cfg(test)]
pub(crate) mod test_groups {
    use super::*;

    /// Toy safe-prime group used across the crate's unit tests.
    pub fn toy_gq() -> Arc<GqGroup> {
        Arc::new(
            GqGroup::new(
                BigUint::from(2039u32),
                BigUint::from(1019u32),
                BigUint::from(4u32),
            )
            .unwrap(),
        )
    }

    /// The smallest group of the specification examples: p = 47, q = 23, g = 2.
    pub fn tiny_gq() -> Arc<GqGroup> {
        Arc::new(
            GqGroup::new(
                BigUint::from(47u32),
                BigUint::from(23u32),
                BigUint::from(2u32),
            )
            .unwrap(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_safe_prime_parameters() {
        let group = GqGroup::new(
            BigUint::from(47u32),
            BigUint::from(23u32),
            BigUint::from(2u32),
        )
        .unwrap();
        assert_eq!(group.q_bit_length(), 5);
        assert!(group.is_group_member(&BigUint::from(2u32)));
        assert!(group.is_group_member(&BigUint::one()));
        // 5 is not a quadratic residue mod 47
        assert!(!group.is_group_member(&BigUint::from(5u32)));
    }

    #[test]
    fn rejects_non_safe_prime_modulus() {
        // 13 = 2*6 + 1 but 6 is not prime
        assert!(GqGroup::new(
            BigUint::from(13u32),
            BigUint::from(6u32),
            BigUint::from(4u32)
        )
        .is_err());
        // p not prime
        assert!(GqGroup::new(
            BigUint::from(15u32),
            BigUint::from(7u32),
            BigUint::from(4u32)
        )
        .is_err());
    }

    #[test]
    fn rejects_generator_outside_subgroup() {
        // 5 has order 46 mod 47, not 23
        assert!(GqGroup::new(
            BigUint::from(47u32),
            BigUint::from(23u32),
            BigUint::from(5u32)
        )
        .is_err());
        // 1 is never a generator
        assert!(GqGroup::new(
            BigUint::from(47u32),
            BigUint::from(23u32),
            BigUint::one()
        )
        .is_err());
    }

    #[test]
    fn groups_are_value_equal() {
        let a = test_groups::toy_gq();
        let b = test_groups::toy_gq();
        assert_eq!(*a, *b);
        assert_ne!(*a, *test_groups::tiny_gq());
    }

    #[test]
    fn zq_group_rejects_trivial_orders() {
        assert!(ZqGroup::new(BigUint::one()).is_err());
        assert!(ZqGroup::new(BigUint::from(0u8)).is_err());
        assert!(ZqGroup::new(BigUint::from(2u8)).is_ok());
    }
}
