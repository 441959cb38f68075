use std::sync::Arc;

use crate::error::{CryptoError, CryptoResult};
use crate::hashing::{Hashable, HashableForm};
use crate::math::{GqElement, GqGroup, GroupMember, GroupVector, ZqElement};

use super::keypair::{ElGamalPrivateKey, ElGamalPublicKey};

/// A plaintext vector `(m₁ … m_k)` of group elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElGamalMultiRecipientMessage {
    elements: GroupVector<GqElement>,
}

impl ElGamalMultiRecipientMessage {
    pub fn from_elements(elements: GroupVector<GqElement>) -> CryptoResult<Self> {
        if elements.is_empty() {
            return Err(CryptoError::invalid("a message needs at least one element"));
        }
        Ok(ElGamalMultiRecipientMessage { elements })
    }

    /// The all-ones message, the plaintext of a re-encryption layer.
    pub fn ones(group: &Arc<GqGroup>, k: usize) -> CryptoResult<Self> {
        if k == 0 {
            return Err(CryptoError::invalid("a message needs at least one element"));
        }
        let elements = vec![GqElement::identity(group); k];
        Ok(ElGamalMultiRecipientMessage {
            elements: GroupVector::from_elements_with_group(elements, group)?,
        })
    }

    pub fn size(&self) -> usize {
        self.elements.len()
    }

    pub fn get(&self, i: usize) -> &GqElement {
        self.elements.get(i)
    }

    pub fn elements(&self) -> &GroupVector<GqElement> {
        &self.elements
    }

    pub fn group(&self) -> &Arc<GqGroup> {
        self.elements.group()
    }
}

impl HashableForm for ElGamalMultiRecipientMessage {
    fn to_hashable_form(&self) -> Hashable {
        self.elements.to_hashable_form()
    }
}

/// A multi-recipient ciphertext `(γ, φ₁ … φ_k)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElGamalMultiRecipientCiphertext {
    gamma: GqElement,
    phis: GroupVector<GqElement>,
}

impl ElGamalMultiRecipientCiphertext {
    /// Encrypts `message` with randomness `exponent` under `public_key`.
    ///
    /// The message may address fewer recipients than the key; the
    /// ciphertext then has as many phis as the message.
    pub fn get_ciphertext(
        message: &ElGamalMultiRecipientMessage,
        exponent: &ZqElement,
        public_key: &ElGamalPublicKey,
    ) -> CryptoResult<Self> {
        if message.size() > public_key.size() {
            return Err(CryptoError::invalid(format!(
                "cannot encrypt {} message elements with {} key elements",
                message.size(),
                public_key.size()
            )));
        }
        if message.group() != public_key.group() {
            return Err(CryptoError::invalid(
                "message and public key must share one group",
            ));
        }
        let group = message.group();
        if exponent.group().q() != group.q() {
            return Err(CryptoError::invalid(
                "encryption randomness must match the group order",
            ));
        }
        let gamma = GqElement::generator(group).exponentiate(exponent);
        let phis = message
            .elements()
            .iter()
            .zip(public_key.elements().iter())
            .map(|(m, h)| m.multiply(&h.exponentiate(exponent)))
            .collect();
        Ok(ElGamalMultiRecipientCiphertext {
            gamma,
            phis: GroupVector::from_elements_with_group(phis, group)?,
        })
    }

    /// Decrypts with the first `k` secret exponents, `mᵢ = φᵢ / γ^{xᵢ}`.
    pub fn get_message(
        &self,
        secret_key: &ElGamalPrivateKey,
    ) -> CryptoResult<ElGamalMultiRecipientMessage> {
        if self.size() > secret_key.size() {
            return Err(CryptoError::invalid(format!(
                "cannot decrypt {} phis with {} key elements",
                self.size(),
                secret_key.size()
            )));
        }
        if secret_key.group().q() != self.group().q() {
            return Err(CryptoError::invalid(
                "secret key and ciphertext must share one group order",
            ));
        }
        let elements = self
            .phis
            .iter()
            .zip(secret_key.exponents().iter())
            .map(|(phi, x)| phi.divide(&self.gamma.exponentiate(x)))
            .collect();
        ElGamalMultiRecipientMessage::from_elements(GroupVector::from_elements_with_group(
            elements,
            self.group(),
        )?)
    }

    /// Reassembles a ciphertext from its elements, as when loading a
    /// persisted artefact.
    pub fn from_parts(gamma: GqElement, phis: GroupVector<GqElement>) -> CryptoResult<Self> {
        if phis.is_empty() {
            return Err(CryptoError::invalid(
                "a ciphertext needs at least one phi",
            ));
        }
        if gamma.group() != phis.group() {
            return Err(CryptoError::invalid(
                "gamma and phis must share one group",
            ));
        }
        Ok(ElGamalMultiRecipientCiphertext { gamma, phis })
    }

    /// The neutral ciphertext `(1, 1 … 1)` of size `k`, the identity of
    /// ciphertext multiplication.
    pub fn neutral(k: usize, group: &Arc<GqGroup>) -> CryptoResult<Self> {
        if k == 0 {
            return Err(CryptoError::invalid(
                "a ciphertext needs at least one phi",
            ));
        }
        Ok(ElGamalMultiRecipientCiphertext {
            gamma: GqElement::identity(group),
            phis: GroupVector::from_elements_with_group(
                vec![GqElement::identity(group); k],
                group,
            )?,
        })
    }

    /// Element-wise product `(γγ', φᵢφᵢ')`, the homomorphic composition.
    pub fn get_ciphertext_product(&self, other: &Self) -> CryptoResult<Self> {
        if self.size() != other.size() {
            return Err(CryptoError::invalid(
                "ciphertexts to multiply must have the same size",
            ));
        }
        if self.group() != other.group() {
            return Err(CryptoError::invalid(
                "ciphertexts to multiply must share one group",
            ));
        }
        Ok(ElGamalMultiRecipientCiphertext {
            gamma: self.gamma.multiply(&other.gamma),
            phis: self.phis.entrywise_multiply(&other.phis),
        })
    }

    /// `(γ^a, φᵢ^a)`.
    pub fn get_ciphertext_exponentiation(&self, a: &ZqElement) -> Self {
        ElGamalMultiRecipientCiphertext {
            gamma: self.gamma.exponentiate(a),
            phis: self.phis.exponentiate(a),
        }
    }

    /// `∏ᵢ cᵢ^{aᵢ}` over equally sized ciphertexts, slot by slot through
    /// the multi-exponentiation fast path.
    pub fn get_ciphertext_vector_exponentiation(
        ciphertexts: &GroupVector<ElGamalMultiRecipientCiphertext>,
        exponents: &GroupVector<ZqElement>,
    ) -> CryptoResult<Self> {
        if ciphertexts.is_empty() {
            return Err(CryptoError::invalid(
                "the ciphertext vector must not be empty",
            ));
        }
        if ciphertexts.len() != exponents.len() {
            return Err(CryptoError::invalid(
                "ciphertext and exponent vectors must have the same size",
            ));
        }
        let k = ciphertexts.get(0).size();
        if ciphertexts.iter().any(|c| c.size() != k) {
            return Err(CryptoError::invalid(
                "all ciphertexts must have the same size",
            ));
        }
        let group = ciphertexts.group();
        let gammas = GroupVector::from_elements_with_group(
            ciphertexts.iter().map(|c| c.gamma.clone()).collect(),
            group,
        )?;
        let gamma = gammas.multi_exponentiate(exponents);
        let phis = (0..k)
            .map(|i| {
                let slot = GroupVector::from_elements_with_group(
                    ciphertexts.iter().map(|c| c.phis.get(i).clone()).collect(),
                    group,
                )?;
                Ok(slot.multi_exponentiate(exponents))
            })
            .collect::<CryptoResult<Vec<_>>>()?;
        Ok(ElGamalMultiRecipientCiphertext {
            gamma,
            phis: GroupVector::from_elements_with_group(phis, group)?,
        })
    }

    /// Compresses to `k'` phis by folding the tail into the last kept
    /// position: `(φ₁ … φ_{k'-1}, ∏_{i >= k'} φᵢ)`.
    pub fn compress(&self, k_prime: usize) -> CryptoResult<Self> {
        if k_prime == 0 || k_prime >= self.size() {
            return Err(CryptoError::invalid(format!(
                "compressed size must lie in [1, {}), got {k_prime}",
                self.size()
            )));
        }
        let head = self.phis.subvector(0, k_prime - 1);
        let tail_product = self.phis.subvector(k_prime - 1, self.size()).product();
        Ok(ElGamalMultiRecipientCiphertext {
            gamma: self.gamma.clone(),
            phis: head.append(tail_product),
        })
    }

    /// Multiplies a fresh encryption of ones onto the ciphertext,
    /// leaving the plaintext unchanged under a new randomness layer.
    pub fn reencrypt(
        &self,
        exponent: &ZqElement,
        public_key: &ElGamalPublicKey,
    ) -> CryptoResult<Self> {
        let ones = ElGamalMultiRecipientMessage::ones(self.group(), self.size())?;
        let layer = Self::get_ciphertext(&ones, exponent, public_key)?;
        self.get_ciphertext_product(&layer)
    }

    /// The number of phis.
    pub fn size(&self) -> usize {
        self.phis.len()
    }

    pub fn gamma(&self) -> &GqElement {
        &self.gamma
    }

    pub fn phis(&self) -> &GroupVector<GqElement> {
        &self.phis
    }

    pub fn get_phi(&self, i: usize) -> &GqElement {
        self.phis.get(i)
    }
}

impl GroupMember for ElGamalMultiRecipientCiphertext {
    type Group = GqGroup;

    fn group(&self) -> &Arc<GqGroup> {
        self.gamma.group()
    }
}

impl HashableForm for ElGamalMultiRecipientCiphertext {
    /// `(γ, φ₁ … φ_k)` as a flat list.
    fn to_hashable_form(&self) -> Hashable {
        let mut items = Vec::with_capacity(1 + self.size());
        items.push(self.gamma.to_hashable_form());
        items.extend(self.phis.iter().map(HashableForm::to_hashable_form));
        Hashable::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elgamal::ElGamalKeyPair;
    use crate::math::test_groups::toy_gq;
    use crate::math::ZqGroup;
    use crate::random::{gen_random_exponent, gen_random_vector};
    use num_bigint::BigUint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn random_message<R: rand::RngCore + rand::CryptoRng>(
        group: &Arc<GqGroup>,
        k: usize,
        rng: &mut R,
    ) -> ElGamalMultiRecipientMessage {
        let zq = ZqGroup::same_order_as(group);
        let g = GqElement::generator(group);
        let elements = (0..k)
            .map(|_| g.exponentiate(&gen_random_exponent(&zq, rng).unwrap()))
            .collect();
        ElGamalMultiRecipientMessage::from_elements(
            GroupVector::from_elements_with_group(elements, group).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn encrypt_then_decrypt_returns_the_message() {
        let mut rng = StdRng::seed_from_u64(3);
        let group = toy_gq();
        let zq = ZqGroup::same_order_as(&group);
        let pair = ElGamalKeyPair::generate(&group, 3, &mut rng).unwrap();
        let message = random_message(&group, 3, &mut rng);
        let r = gen_random_exponent(&zq, &mut rng).unwrap();
        let ciphertext =
            ElGamalMultiRecipientCiphertext::get_ciphertext(&message, &r, pair.public_key())
                .unwrap();
        assert_eq!(
            ciphertext.get_message(pair.private_key()).unwrap(),
            message
        );
    }

    #[test]
    fn shorter_messages_use_a_key_prefix() {
        let mut rng = StdRng::seed_from_u64(4);
        let group = toy_gq();
        let zq = ZqGroup::same_order_as(&group);
        let pair = ElGamalKeyPair::generate(&group, 5, &mut rng).unwrap();
        let message = random_message(&group, 2, &mut rng);
        let r = gen_random_exponent(&zq, &mut rng).unwrap();
        let ciphertext =
            ElGamalMultiRecipientCiphertext::get_ciphertext(&message, &r, pair.public_key())
                .unwrap();
        assert_eq!(ciphertext.size(), 2);
        assert_eq!(
            ciphertext.get_message(pair.private_key()).unwrap(),
            message
        );
        // the key can never be shorter than the message
        let long = random_message(&group, 6, &mut rng);
        assert!(ElGamalMultiRecipientCiphertext::get_ciphertext(
            &long,
            &r,
            pair.public_key()
        )
        .is_err());
    }

    #[test]
    fn neutral_element_is_the_multiplication_identity() {
        let mut rng = StdRng::seed_from_u64(5);
        let group = toy_gq();
        let zq = ZqGroup::same_order_as(&group);
        let pair = ElGamalKeyPair::generate(&group, 2, &mut rng).unwrap();
        let message = random_message(&group, 2, &mut rng);
        let r = gen_random_exponent(&zq, &mut rng).unwrap();
        let c = ElGamalMultiRecipientCiphertext::get_ciphertext(&message, &r, pair.public_key())
            .unwrap();
        let neutral = ElGamalMultiRecipientCiphertext::neutral(2, &group).unwrap();
        assert_eq!(c.get_ciphertext_product(&neutral).unwrap(), c);
    }

    #[test]
    fn reencryption_preserves_the_plaintext() {
        let mut rng = StdRng::seed_from_u64(6);
        let group = toy_gq();
        let zq = ZqGroup::same_order_as(&group);
        let pair = ElGamalKeyPair::generate(&group, 3, &mut rng).unwrap();
        let message = random_message(&group, 3, &mut rng);
        let r = gen_random_exponent(&zq, &mut rng).unwrap();
        let r_prime = gen_random_exponent(&zq, &mut rng).unwrap();
        let c = ElGamalMultiRecipientCiphertext::get_ciphertext(&message, &r, pair.public_key())
            .unwrap();
        let c_prime = c.reencrypt(&r_prime, pair.public_key()).unwrap();
        assert_ne!(c_prime, c);
        assert_eq!(c_prime.get_message(pair.private_key()).unwrap(), message);
    }

    #[test]
    fn vector_exponentiation_matches_the_unrolled_product() {
        let mut rng = StdRng::seed_from_u64(7);
        let group = toy_gq();
        let zq = ZqGroup::same_order_as(&group);
        let pair = ElGamalKeyPair::generate(&group, 2, &mut rng).unwrap();
        let ciphertexts = GroupVector::from_elements(
            (0..4)
                .map(|_| {
                    let m = random_message(&group, 2, &mut rng);
                    let r = gen_random_exponent(&zq, &mut rng).unwrap();
                    ElGamalMultiRecipientCiphertext::get_ciphertext(&m, &r, pair.public_key())
                        .unwrap()
                })
                .collect(),
        )
        .unwrap();
        let exponents = gen_random_vector(&zq, 4, &mut rng).unwrap();
        let fast = ElGamalMultiRecipientCiphertext::get_ciphertext_vector_exponentiation(
            &ciphertexts,
            &exponents,
        )
        .unwrap();
        let slow = ciphertexts
            .iter()
            .zip(exponents.iter())
            .map(|(c, a)| c.get_ciphertext_exponentiation(a))
            .reduce(|acc, c| acc.get_ciphertext_product(&c).unwrap())
            .unwrap();
        assert_eq!(fast, slow);
    }

    #[test]
    fn compression_folds_the_tail_into_the_last_phi() {
        let mut rng = StdRng::seed_from_u64(8);
        let group = toy_gq();
        let zq = ZqGroup::same_order_as(&group);
        let pair = ElGamalKeyPair::generate(&group, 4, &mut rng).unwrap();
        let message = random_message(&group, 4, &mut rng);
        let r = gen_random_exponent(&zq, &mut rng).unwrap();
        let c = ElGamalMultiRecipientCiphertext::get_ciphertext(&message, &r, pair.public_key())
            .unwrap();
        let compressed = c.compress(2).unwrap();
        assert_eq!(compressed.size(), 2);
        assert_eq!(compressed.get_phi(0), c.get_phi(0));
        let tail = c.get_phi(1).multiply(c.get_phi(2)).multiply(c.get_phi(3));
        assert_eq!(compressed.get_phi(1), &tail);
        assert!(c.compress(0).is_err());
        assert!(c.compress(4).is_err());
    }

    // end-to-end over the 2048-bit MODP group
    #[test]
    fn roundtrip_in_the_large_standard_group() {
        use num_traits::Num;

        let corpus: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/testdata/modp-group.json"
            ))
            .unwrap(),
        )
        .unwrap();
        let p = BigUint::from_str_radix(corpus["p_hex"].as_str().unwrap(), 16).unwrap();
        let q = BigUint::from_str_radix(corpus["q_hex"].as_str().unwrap(), 16).unwrap();
        let g = BigUint::from_str_radix(corpus["g"].as_str().unwrap(), 10).unwrap();
        let group = Arc::new(crate::math::GqGroup::new(p, q, g).unwrap());
        let mut rng = StdRng::seed_from_u64(2048);
        let pair = ElGamalKeyPair::generate(&group, 3, &mut rng).unwrap();
        let message = random_message(&group, 3, &mut rng);
        let zq = ZqGroup::same_order_as(&group);
        let r = gen_random_exponent(&zq, &mut rng).unwrap();
        let ciphertext =
            ElGamalMultiRecipientCiphertext::get_ciphertext(&message, &r, pair.public_key())
                .unwrap();
        assert_eq!(
            ciphertext.get_message(pair.private_key()).unwrap(),
            message
        );
    }

    #[test]
    fn hashable_form_is_gamma_then_phis() {
        let group = toy_gq();
        let neutral = ElGamalMultiRecipientCiphertext::neutral(2, &group).unwrap();
        assert_eq!(
            neutral.to_hashable_form(),
            Hashable::List(vec![
                Hashable::Number(BigUint::from(1u8)),
                Hashable::Number(BigUint::from(1u8)),
                Hashable::Number(BigUint::from(1u8)),
            ])
        );
    }
}
