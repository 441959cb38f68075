use std::fmt;
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use super::arith::mod_inverse;
use super::groups::{GqGroup, ZqGroup};
use crate::error::{CryptoError, CryptoResult};

/// A value that belongs to exactly one group, carried alongside it.
///
/// Mixing members of different groups is a caller bug; arithmetic on
/// mismatched operands panics rather than producing an off-group value.
pub trait GroupMember: Clone + PartialEq + fmt::Debug {
    type Group: PartialEq + fmt::Debug;

    fn group(&self) -> &Arc<Self::Group>;
}

/// An element of the quadratic-residue group, `1 <= value < p` with
/// `value^q mod p = 1`. Immutable; arithmetic returns new elements.
#[derive(Clone, PartialEq, Eq)]
pub struct GqElement {
    value: BigUint,
    group: Arc<GqGroup>,
}

impl GqElement {
    /// Validates subgroup membership of `value` and wraps it.
    pub fn create(value: BigUint, group: &Arc<GqGroup>) -> CryptoResult<Self> {
        if !group.is_group_member(&value) {
            return Err(CryptoError::invalid(format!(
                "{value} is not a member of the group with modulus {}",
                group.p()
            )));
        }
        Ok(GqElement {
            value,
            group: Arc::clone(group),
        })
    }

    /// `r^2 mod p`, which lies in the subgroup for any `r` in `[1, p - 1]`.
    pub fn from_square_root(r: &BigUint, group: &Arc<GqGroup>) -> CryptoResult<Self> {
        if r.is_zero() || r >= group.p() {
            return Err(CryptoError::invalid(
                "square root must lie in [1, p - 1]",
            ));
        }
        Ok(GqElement {
            value: r.modpow(&BigUint::from(2u8), group.p()),
            group: Arc::clone(group),
        })
    }

    /// The neutral element 1.
    pub fn identity(group: &Arc<GqGroup>) -> Self {
        GqElement {
            value: BigUint::one(),
            group: Arc::clone(group),
        }
    }

    pub fn generator(group: &Arc<GqGroup>) -> Self {
        GqElement {
            value: group.g().clone(),
            group: Arc::clone(group),
        }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn is_identity(&self) -> bool {
        self.value.is_one()
    }

    /// `self * other mod p`.
    ///
    /// Panics if the operands belong to different groups.
    pub fn multiply(&self, other: &GqElement) -> GqElement {
        assert_eq!(
            self.group, other.group,
            "cannot multiply elements of different groups"
        );
        GqElement {
            value: (&self.value * &other.value) % self.group.p(),
            group: Arc::clone(&self.group),
        }
    }

    /// `self^exponent mod p`.
    ///
    /// Panics if the exponent group order differs from the group order.
    pub fn exponentiate(&self, exponent: &ZqElement) -> GqElement {
        assert_eq!(
            exponent.group().q(),
            self.group.q(),
            "exponent must come from the Zq group of the same order"
        );
        GqElement {
            value: self.value.modpow(exponent.value(), self.group.p()),
            group: Arc::clone(&self.group),
        }
    }

    /// The multiplicative inverse; always defined for group members.
    pub fn invert(&self) -> GqElement {
        let value = mod_inverse(&self.value, self.group.p())
            .expect("group members are coprime with the prime modulus");
        GqElement {
            value,
            group: Arc::clone(&self.group),
        }
    }

    /// `self / other mod p`.
    ///
    /// Panics if the operands belong to different groups.
    pub fn divide(&self, other: &GqElement) -> GqElement {
        self.multiply(&other.invert())
    }
}

impl GroupMember for GqElement {
    type Group = GqGroup;

    fn group(&self) -> &Arc<GqGroup> {
        &self.group
    }
}

impl fmt::Debug for GqElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GqElement({})", self.value)
    }
}

/// An element of `Z/qZ`, `0 <= value < q`.
#[derive(Clone, PartialEq, Eq)]
pub struct ZqElement {
    value: BigUint,
    group: Arc<ZqGroup>,
}

impl ZqElement {
    /// Wraps `value`, rejecting anything outside `[0, q)`.
    pub fn create(value: BigUint, group: &Arc<ZqGroup>) -> CryptoResult<Self> {
        if &value >= group.q() {
            return Err(CryptoError::invalid(format!(
                "{value} is out of range for the group of order {}",
                group.q()
            )));
        }
        Ok(ZqElement {
            value,
            group: Arc::clone(group),
        })
    }

    /// Reduces an arbitrary integer modulo `q`.
    pub fn reduce(value: &BigUint, group: &Arc<ZqGroup>) -> Self {
        ZqElement {
            value: value % group.q(),
            group: Arc::clone(group),
        }
    }

    pub fn from_u64(value: u64, group: &Arc<ZqGroup>) -> Self {
        Self::reduce(&BigUint::from(value), group)
    }

    pub fn zero(group: &Arc<ZqGroup>) -> Self {
        ZqElement {
            value: BigUint::zero(),
            group: Arc::clone(group),
        }
    }

    pub fn one(group: &Arc<ZqGroup>) -> Self {
        ZqElement {
            value: BigUint::one(),
            group: Arc::clone(group),
        }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// `self + other mod q`. Panics on mismatched groups.
    pub fn add(&self, other: &ZqElement) -> ZqElement {
        assert_eq!(
            self.group, other.group,
            "cannot add elements of different groups"
        );
        ZqElement {
            value: (&self.value + &other.value) % self.group.q(),
            group: Arc::clone(&self.group),
        }
    }

    /// `self - other mod q`. Panics on mismatched groups.
    pub fn subtract(&self, other: &ZqElement) -> ZqElement {
        assert_eq!(
            self.group, other.group,
            "cannot subtract elements of different groups"
        );
        let q = self.group.q();
        let value = if self.value >= other.value {
            &self.value - &other.value
        } else {
            q - (&other.value - &self.value)
        };
        ZqElement {
            value: value % q,
            group: Arc::clone(&self.group),
        }
    }

    /// `self * other mod q`. Panics on mismatched groups.
    pub fn multiply(&self, other: &ZqElement) -> ZqElement {
        assert_eq!(
            self.group, other.group,
            "cannot multiply elements of different groups"
        );
        ZqElement {
            value: (&self.value * &other.value) % self.group.q(),
            group: Arc::clone(&self.group),
        }
    }

    /// `-self mod q`.
    pub fn negate(&self) -> ZqElement {
        let value = if self.value.is_zero() {
            BigUint::zero()
        } else {
            self.group.q() - &self.value
        };
        ZqElement {
            value,
            group: Arc::clone(&self.group),
        }
    }
}

impl GroupMember for ZqElement {
    type Group = ZqGroup;

    fn group(&self) -> &Arc<ZqGroup> {
        &self.group
    }
}

impl fmt::Debug for ZqElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZqElement({})", self.value)
    }
}
