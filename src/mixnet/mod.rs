//! Bayer-Groth argument of a correct shuffle.
//!
//! A shuffle argument proves that an output ciphertext list is a
//! permutation-plus-re-encryption of an input list, without revealing
//! the permutation or the randomness. It composes five sub-arguments,
//! each an independently verifiable sigma protocol made non-interactive
//! with the recursive-hash challenge derivation; the commitments of one
//! round feed the challenges of the next.

mod hadamard;
mod multi_exponentiation;
mod permutation;
mod product;
mod shuffle;
mod single_value_product;
mod zero;

pub use hadamard::{
    gen_hadamard_argument, verify_hadamard_argument, HadamardArgument, HadamardStatement,
    HadamardWitness,
};
pub use multi_exponentiation::{
    gen_multi_exponentiation_argument, verify_multi_exponentiation_argument,
    MultiExponentiationArgument, MultiExponentiationStatement, MultiExponentiationWitness,
};
pub use permutation::Permutation;
pub use product::{
    gen_product_argument, verify_product_argument, ProductArgument, ProductStatement,
    ProductWitness,
};
pub use shuffle::{
    gen_shuffle_argument, verify_shuffle_argument, MixnetService, ShuffleArgument,
    ShuffleStatement, ShuffleWitness, VerifiableShuffle,
};
pub use single_value_product::{
    gen_single_value_product_argument, verify_single_value_product_argument,
    SingleValueProductArgument, SingleValueProductStatement, SingleValueProductWitness,
};
pub use zero::{gen_zero_argument, verify_zero_argument, ZeroArgument, ZeroStatement, ZeroWitness};

use std::sync::Arc;

use crate::commitment::CommitmentKey;
use crate::elgamal::ElGamalPublicKey;
use crate::error::{CryptoError, CryptoResult};
use crate::hashing::HashService;
use crate::math::{GqGroup, GroupMember, GroupVector, ZqElement, ZqGroup};
use crate::zkproofs::check_challenge_length;

/// Everything the sub-arguments share: the group, the mixing public
/// key, the commitment key and the hash service deriving challenges.
#[derive(Clone, Debug)]
pub struct ArgumentContext {
    group: Arc<GqGroup>,
    zq: Arc<ZqGroup>,
    public_key: ElGamalPublicKey,
    commitment_key: CommitmentKey,
    hash: HashService,
}

impl ArgumentContext {
    pub fn new(
        public_key: ElGamalPublicKey,
        commitment_key: CommitmentKey,
        hash: HashService,
    ) -> CryptoResult<Self> {
        if public_key.group() != commitment_key.group() {
            return Err(CryptoError::invalid(
                "public key and commitment key must share one group",
            ));
        }
        check_challenge_length(&hash, public_key.group())?;
        let group = Arc::clone(public_key.group());
        let zq = ZqGroup::same_order_as(&group);
        Ok(ArgumentContext {
            group,
            zq,
            public_key,
            commitment_key,
            hash,
        })
    }

    pub fn group(&self) -> &Arc<GqGroup> {
        &self.group
    }

    pub fn zq(&self) -> &Arc<ZqGroup> {
        &self.zq
    }

    pub fn public_key(&self) -> &ElGamalPublicKey {
        &self.public_key
    }

    pub fn commitment_key(&self) -> &CommitmentKey {
        &self.commitment_key
    }

    pub fn hash(&self) -> &HashService {
        &self.hash
    }
}

/// `(1, x, x², …, x^{count-1})`.
pub(crate) fn powers_of(x: &ZqElement, count: usize) -> GroupVector<ZqElement> {
    let zq = Arc::clone(x.group());
    let mut elements = Vec::with_capacity(count);
    let mut acc = ZqElement::one(&zq);
    for _ in 0..count {
        elements.push(acc.clone());
        acc = acc.multiply(x);
    }
    GroupVector::from_elements_with_group(elements, &zq)
        .expect("powers live in the exponent group")
}

/// The constant vector `(value, …, value)` of the given size.
pub(crate) fn constant_vector(value: &ZqElement, size: usize) -> GroupVector<ZqElement> {
    GroupVector::from_elements_with_group(vec![value.clone(); size], value.group())
        .expect("constant entries live in the exponent group")
}
