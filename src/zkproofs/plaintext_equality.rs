use std::sync::Arc;

use rand::{CryptoRng, RngCore};

use super::challenge::ChallengeContext;
use super::check_challenge_length;
use crate::elgamal::ElGamalMultiRecipientCiphertext;
use crate::error::{CryptoError, CryptoResult};
use crate::hashing::{HashService, Hashable, HashableForm};
use crate::math::{GqElement, GroupMember, GroupVector, ZqElement, ZqGroup};
use crate::random::gen_random_exponent;

const LOG_TARGET: &str = "verimix::zkproofs::plaintext_equality";

const TAG: &str = "PlaintextEqualityProof";

/// Proof that two single-recipient ciphertexts, under different keys,
/// decrypt to the same message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaintextEqualityProof {
    e: ZqElement,
    z: GroupVector<ZqElement>,
}

/// The homomorphism `φ(x, x') = (g^x, g^{x'}, h^x / h'^{x'})`
/// underlying the proof.
pub fn compute_phi_plaintext_equality(
    pre_image: (&ZqElement, &ZqElement),
    h: &GqElement,
    h_prime: &GqElement,
) -> CryptoResult<GroupVector<GqElement>> {
    let (x, x_prime) = pre_image;
    if x.group() != x_prime.group() {
        return Err(CryptoError::invalid(
            "pre-image components must share one group",
        ));
    }
    if h.group() != h_prime.group() {
        return Err(CryptoError::invalid("bases must share one group"));
    }
    if x.group().q() != h.group().q() {
        return Err(CryptoError::invalid(
            "pre-image and bases must share one group order",
        ));
    }
    let g = GqElement::generator(h.group());
    GroupVector::from_elements(vec![
        g.exponentiate(x),
        g.exponentiate(x_prime),
        h.exponentiate(x).divide(&h_prime.exponentiate(x_prime)),
    ])
}

impl PlaintextEqualityProof {
    /// Proves that `first` (under `h`, randomness `x`) and `second`
    /// (under `h'`, randomness `x'`) carry the same plaintext.
    #[allow(clippy::too_many_arguments)]
    pub fn gen<R: RngCore + CryptoRng, S: AsRef<str>>(
        first: &ElGamalMultiRecipientCiphertext,
        second: &ElGamalMultiRecipientCiphertext,
        h: &GqElement,
        h_prime: &GqElement,
        randomness: (&ZqElement, &ZqElement),
        auxiliary_information: &[S],
        hash: &HashService,
        rng: &mut R,
    ) -> CryptoResult<Self> {
        check_statement(first, second, h, h_prime)?;
        check_challenge_length(hash, h.group())?;
        let zq = randomness.0.group();
        if zq.q() != h.group().q() {
            return Err(CryptoError::invalid(
                "randomness must match the group order",
            ));
        }
        let b = (
            gen_random_exponent(zq, rng)?,
            gen_random_exponent(zq, rng)?,
        );
        let commitment = compute_phi_plaintext_equality((&b.0, &b.1), h, h_prime)?;
        let e = challenge(first, second, h, h_prime, &commitment, auxiliary_information, hash)?;
        let z = GroupVector::from_elements(vec![
            b.0.add(&e.multiply(randomness.0)),
            b.1.add(&e.multiply(randomness.1)),
        ])?;
        Ok(PlaintextEqualityProof { e, z })
    }

    /// Checks the proof against the two ciphertexts and keys.
    #[allow(clippy::too_many_arguments)]
    pub fn verify<S: AsRef<str>>(
        &self,
        first: &ElGamalMultiRecipientCiphertext,
        second: &ElGamalMultiRecipientCiphertext,
        h: &GqElement,
        h_prime: &GqElement,
        auxiliary_information: &[S],
        hash: &HashService,
    ) -> CryptoResult<bool> {
        check_statement(first, second, h, h_prime)?;
        check_challenge_length(hash, h.group())?;
        if self.z.len() != 2 {
            return Err(CryptoError::invalid("the response must have two components"));
        }
        if self.e.group().q() != h.group().q() {
            return Err(CryptoError::invalid(
                "proof and statement must share one group order",
            ));
        }
        let x_comm = compute_phi_plaintext_equality((&self.z[0], &self.z[1]), h, h_prime)?;
        let y_aux = statement_vector(first, second)?;
        // c' = φ(z) ⊙ y^{-e}, element-wise
        let neg_e = self.e.negate();
        let commitment = x_comm.entrywise_multiply(&y_aux.exponentiate(&neg_e));
        let e_prime = challenge(first, second, h, h_prime, &commitment, auxiliary_information, hash)?;
        let accepted = e_prime == self.e;
        if !accepted {
            tracing::debug!(target: LOG_TARGET, "challenge mismatch, rejecting proof");
        }
        Ok(accepted)
    }

    pub fn e(&self) -> &ZqElement {
        &self.e
    }

    pub fn z(&self) -> &GroupVector<ZqElement> {
        &self.z
    }

    pub(crate) fn from_parts(e: ZqElement, z: GroupVector<ZqElement>) -> Self {
        PlaintextEqualityProof { e, z }
    }
}

impl HashableForm for PlaintextEqualityProof {
    fn to_hashable_form(&self) -> Hashable {
        Hashable::List(vec![self.e.to_hashable_form(), self.z.to_hashable_form()])
    }
}

fn check_statement(
    first: &ElGamalMultiRecipientCiphertext,
    second: &ElGamalMultiRecipientCiphertext,
    h: &GqElement,
    h_prime: &GqElement,
) -> CryptoResult<()> {
    if first.size() != 1 || second.size() != 1 {
        return Err(CryptoError::invalid(
            "plaintext equality is defined over single-phi ciphertexts",
        ));
    }
    if first.group() != second.group() || first.group() != h.group() || h.group() != h_prime.group()
    {
        return Err(CryptoError::invalid(
            "ciphertexts and keys must share one group",
        ));
    }
    Ok(())
}

/// `y = (c₀, c'₀, c₁ / c'₁)`, the image whose pre-image is proven.
fn statement_vector(
    first: &ElGamalMultiRecipientCiphertext,
    second: &ElGamalMultiRecipientCiphertext,
) -> CryptoResult<GroupVector<GqElement>> {
    GroupVector::from_elements(vec![
        first.gamma().clone(),
        second.gamma().clone(),
        first.get_phi(0).divide(second.get_phi(0)),
    ])
}

fn challenge<S: AsRef<str>>(
    first: &ElGamalMultiRecipientCiphertext,
    second: &ElGamalMultiRecipientCiphertext,
    h: &GqElement,
    h_prime: &GqElement,
    commitment: &GroupVector<GqElement>,
    auxiliary_information: &[S],
    hash: &HashService,
) -> CryptoResult<ZqElement> {
    let group = h.group();
    let zq = ZqGroup::same_order_as(group);
    // f = (p, q, g, h, h')
    let f = Hashable::List(vec![
        Hashable::Number(group.p().clone()),
        Hashable::Number(group.q().clone()),
        Hashable::Number(group.g().clone()),
        h.to_hashable_form(),
        h_prime.to_hashable_form(),
    ]);
    // h_aux opens with the tag and binds the φ components not in y
    let mut h_aux = vec![
        Hashable::String(TAG.to_owned()),
        first.get_phi(0).to_hashable_form(),
        second.get_phi(0).to_hashable_form(),
    ];
    h_aux.extend(
        auxiliary_information
            .iter()
            .map(|s| Hashable::String(s.as_ref().to_owned())),
    );
    ChallengeContext::new()
        .push_raw(f)
        .push(&statement_vector(first, second)?)
        .push(commitment)
        .push_raw(Hashable::List(h_aux))
        .derive(hash, &zq)
}
