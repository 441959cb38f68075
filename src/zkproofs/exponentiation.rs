use rand::{CryptoRng, RngCore};

use super::challenge::ChallengeContext;
use super::check_challenge_length;
use crate::error::{CryptoError, CryptoResult};
use crate::hashing::{HashService, Hashable, HashableForm};
use crate::math::{GqElement, GroupMember, GroupVector, ZqElement, ZqGroup};
use crate::random::gen_random_exponent;

const LOG_TARGET: &str = "verimix::zkproofs::exponentiation";

const TAG: &str = "ExponentiationProof";

/// Proof of a common exponent: `yᵢ = gᵢ^x` for every base `gᵢ`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExponentiationProof {
    e: ZqElement,
    z: ZqElement,
}

impl ExponentiationProof {
    /// Proves that each `exponentiations[i]` equals `bases[i]^witness`.
    pub fn gen<R: RngCore + CryptoRng, S: AsRef<str>>(
        bases: &GroupVector<GqElement>,
        witness: &ZqElement,
        exponentiations: &GroupVector<GqElement>,
        auxiliary_information: &[S],
        hash: &HashService,
        rng: &mut R,
    ) -> CryptoResult<Self> {
        check_statement(bases, exponentiations)?;
        check_challenge_length(hash, bases.group())?;
        if witness.group().q() != bases.group().q() {
            return Err(CryptoError::invalid(
                "witness must match the group order",
            ));
        }
        let zq = witness.group();
        let b = gen_random_exponent(zq, rng)?;
        let commitment = bases.exponentiate(&b);
        let e = challenge(bases, exponentiations, &commitment, auxiliary_information, hash)?;
        let z = b.add(&e.multiply(witness));
        Ok(ExponentiationProof { e, z })
    }

    pub fn verify<S: AsRef<str>>(
        &self,
        bases: &GroupVector<GqElement>,
        exponentiations: &GroupVector<GqElement>,
        auxiliary_information: &[S],
        hash: &HashService,
    ) -> CryptoResult<bool> {
        check_statement(bases, exponentiations)?;
        check_challenge_length(hash, bases.group())?;
        if self.e.group().q() != bases.group().q() || self.z.group().q() != bases.group().q() {
            return Err(CryptoError::invalid(
                "proof and statement must share one group order",
            ));
        }
        // c'ᵢ = gᵢ^z · yᵢ^{-e}
        let neg_e = self.e.negate();
        let commitment = bases
            .exponentiate(&self.z)
            .entrywise_multiply(&exponentiations.exponentiate(&neg_e));
        let e_prime = challenge(bases, exponentiations, &commitment, auxiliary_information, hash)?;
        let accepted = e_prime == self.e;
        if !accepted {
            tracing::debug!(target: LOG_TARGET, "challenge mismatch, rejecting proof");
        }
        Ok(accepted)
    }

    pub fn e(&self) -> &ZqElement {
        &self.e
    }

    pub fn z(&self) -> &ZqElement {
        &self.z
    }

    pub(crate) fn from_parts(e: ZqElement, z: ZqElement) -> Self {
        ExponentiationProof { e, z }
    }
}

impl HashableForm for ExponentiationProof {
    fn to_hashable_form(&self) -> Hashable {
        Hashable::List(vec![self.e.to_hashable_form(), self.z.to_hashable_form()])
    }
}

fn check_statement(
    bases: &GroupVector<GqElement>,
    exponentiations: &GroupVector<GqElement>,
) -> CryptoResult<()> {
    if bases.is_empty() {
        return Err(CryptoError::invalid("the statement must not be empty"));
    }
    if bases.len() != exponentiations.len() {
        return Err(CryptoError::invalid(
            "bases and exponentiations must have the same size",
        ));
    }
    if bases.group() != exponentiations.group() {
        return Err(CryptoError::invalid(
            "bases and exponentiations must share one group",
        ));
    }
    Ok(())
}

fn challenge<S: AsRef<str>>(
    bases: &GroupVector<GqElement>,
    exponentiations: &GroupVector<GqElement>,
    commitment: &GroupVector<GqElement>,
    auxiliary_information: &[S],
    hash: &HashService,
) -> CryptoResult<ZqElement> {
    let group = bases.group();
    let zq = ZqGroup::same_order_as(group);
    // f = (p, q, g̃) with g̃ the vector of bases
    let f = Hashable::List(vec![
        Hashable::Number(group.p().clone()),
        Hashable::Number(group.q().clone()),
        bases.to_hashable_form(),
    ]);
    ChallengeContext::new()
        .push_raw(f)
        .push(exponentiations)
        .push(commitment)
        .tagged_aux(TAG, auxiliary_information)
        .derive(hash, &zq)
}
