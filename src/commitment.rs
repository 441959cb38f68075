//! Pedersen vector commitments over the quadratic-residue group.
//!
//! A key `(h, g₁ … g_ν)` commits a vector `a` with randomness `r` as
//! `h^r · ∏ gᵢ^{aᵢ}`; the scheme is perfectly hiding and linearly
//! homomorphic, which the shuffle argument relies on throughout.

use std::sync::Arc;

use num_bigint::BigUint;

use crate::error::{CryptoError, CryptoResult, MAX_REJECTION_ROUNDS};
use crate::hashing::{HashService, Hashable, HashableForm};
use crate::math::{GqElement, GqGroup, GroupMatrix, GroupMember, GroupVector, ZqElement};

const LOG_TARGET: &str = "verimix::commitment";

/// A commitment key `(h, g₁ … g_ν)` with every element distinct from
/// the identity and from the group generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitmentKey {
    h: GqElement,
    gs: GroupVector<GqElement>,
}

impl CommitmentKey {
    pub fn new(h: GqElement, gs: GroupVector<GqElement>) -> CryptoResult<Self> {
        if gs.is_empty() {
            return Err(CryptoError::invalid(
                "a commitment key needs at least one message base",
            ));
        }
        if h.group() != gs.group() {
            return Err(CryptoError::invalid(
                "all commitment key elements must share one group",
            ));
        }
        let generator = GqElement::generator(h.group());
        let forbidden = |e: &GqElement| e.is_identity() || e == &generator;
        if forbidden(&h) || gs.iter().any(forbidden) {
            return Err(CryptoError::invalid(
                "commitment key elements must differ from 1 and from the generator",
            ));
        }
        Ok(CommitmentKey { h, gs })
    }

    /// Derives a key of `nu` message bases from nothing but the group,
    /// by hashing and squaring a running counter. Prover and verifier
    /// obtain the same key without any trusted setup.
    pub fn derive(group: &Arc<GqGroup>, nu: usize, hash: &HashService) -> CryptoResult<Self> {
        if nu == 0 {
            return Err(CryptoError::invalid(
                "a commitment key needs at least one message base",
            ));
        }
        tracing::debug!(target: LOG_TARGET, nu, "deriving commitment key");
        let generator = GqElement::generator(group);
        let mut elements = Vec::with_capacity(nu + 1);
        let mut count = BigUint::from(0u8);
        while elements.len() < nu + 1 {
            let mut found = false;
            for _ in 0..MAX_REJECTION_ROUNDS {
                let candidate = hash.hash_and_square(&count, group)?;
                count += 1u8;
                if !candidate.is_identity() && candidate != generator {
                    elements.push(candidate);
                    found = true;
                    break;
                }
            }
            if !found {
                return Err(CryptoError::RejectionLoop);
            }
        }
        let gs = elements.split_off(1);
        let h = elements.pop().expect("one element remains after the split");
        CommitmentKey::new(h, GroupVector::from_elements_with_group(gs, group)?)
    }

    /// The number ν of message bases.
    pub fn size(&self) -> usize {
        self.gs.len()
    }

    pub fn h(&self) -> &GqElement {
        &self.h
    }

    pub fn gs(&self) -> &GroupVector<GqElement> {
        &self.gs
    }

    pub fn group(&self) -> &Arc<GqGroup> {
        self.h.group()
    }

    /// `com(a, r) = h^r · ∏ gᵢ^{aᵢ}` for `0 < |a| <= ν`.
    pub fn get_commitment(
        &self,
        elements: &GroupVector<ZqElement>,
        randomness: &ZqElement,
    ) -> CryptoResult<GqElement> {
        if elements.is_empty() || elements.len() > self.size() {
            return Err(CryptoError::invalid(format!(
                "can commit to 1..={} elements, got {}",
                self.size(),
                elements.len()
            )));
        }
        if elements.group().q() != self.group().q() {
            return Err(CryptoError::invalid(
                "committed elements must match the key's group order",
            ));
        }
        let bases = self.gs.subvector(0, elements.len()).prepend(self.h.clone());
        let exponents = elements.prepend(randomness.clone());
        Ok(bases.multi_exponentiate(&exponents))
    }

    /// Commits each column of `matrix` under its own randomness,
    /// yielding one commitment per column.
    pub fn get_commitment_matrix(
        &self,
        matrix: &GroupMatrix<ZqElement>,
        randomness: &GroupVector<ZqElement>,
    ) -> CryptoResult<GroupVector<GqElement>> {
        if randomness.len() != matrix.n_cols() {
            return Err(CryptoError::invalid(
                "one randomness element is needed per matrix column",
            ));
        }
        let commitments = (0..matrix.n_cols())
            .map(|j| self.get_commitment(&matrix.column(j), randomness.get(j)))
            .collect::<CryptoResult<Vec<_>>>()?;
        GroupVector::from_elements_with_group(commitments, self.group())
    }
}

impl HashableForm for CommitmentKey {
    fn to_hashable_form(&self) -> Hashable {
        let mut items = Vec::with_capacity(1 + self.size());
        items.push(self.h.to_hashable_form());
        items.extend(self.gs.iter().map(HashableForm::to_hashable_form));
        Hashable::List(items)
    }
}
