use std::sync::Arc;

use rand::{CryptoRng, RngCore};

use crate::error::{CryptoError, CryptoResult};
use crate::hashing::{Hashable, HashableForm};
use crate::math::{GqElement, GqGroup, GroupVector, ZqElement, ZqGroup};
use crate::random::gen_random_private_exponent;

const LOG_TARGET: &str = "verimix::elgamal";

/// The secret exponents `(x₁ … x_k)`, each in `[2, q - 1]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElGamalPrivateKey {
    exponents: GroupVector<ZqElement>,
}

impl ElGamalPrivateKey {
    pub fn from_exponents(exponents: GroupVector<ZqElement>) -> CryptoResult<Self> {
        if exponents.is_empty() {
            return Err(CryptoError::invalid("a private key needs at least one exponent"));
        }
        Ok(ElGamalPrivateKey { exponents })
    }

    pub fn size(&self) -> usize {
        self.exponents.len()
    }

    pub fn exponents(&self) -> &GroupVector<ZqElement> {
        &self.exponents
    }

    pub fn group(&self) -> &Arc<ZqGroup> {
        self.exponents.group()
    }
}

/// The public elements `(h₁ … h_k)` with `hᵢ = g^{xᵢ}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElGamalPublicKey {
    elements: GroupVector<GqElement>,
}

impl ElGamalPublicKey {
    pub fn from_elements(elements: GroupVector<GqElement>) -> CryptoResult<Self> {
        if elements.is_empty() {
            return Err(CryptoError::invalid("a public key needs at least one element"));
        }
        Ok(ElGamalPublicKey { elements })
    }

    pub fn size(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &GroupVector<GqElement> {
        &self.elements
    }

    pub fn get(&self, i: usize) -> &GqElement {
        self.elements.get(i)
    }

    pub fn group(&self) -> &Arc<GqGroup> {
        self.elements.group()
    }
}

impl HashableForm for ElGamalPublicKey {
    fn to_hashable_form(&self) -> Hashable {
        self.elements.to_hashable_form()
    }
}

/// A matching multi-recipient key pair.
#[derive(Clone, Debug)]
pub struct ElGamalKeyPair {
    private_key: ElGamalPrivateKey,
    public_key: ElGamalPublicKey,
}

impl ElGamalKeyPair {
    /// Samples `k` secret exponents uniformly from `[2, q - 1]` and
    /// derives the public elements `hᵢ = g^{xᵢ}`.
    ///
    /// 0 and 1 are excluded from the secret domain: a zero or one
    /// exponent would make `φᵢ` independent of `hᵢ` or equal to
    /// `mᵢ · γ`, defeating the encryption.
    pub fn generate<R: RngCore + CryptoRng>(
        group: &Arc<GqGroup>,
        k: usize,
        rng: &mut R,
    ) -> CryptoResult<Self> {
        if k == 0 {
            return Err(CryptoError::invalid(
                "the number of recipients must be strictly positive",
            ));
        }
        tracing::debug!(target: LOG_TARGET, k, "generating ElGamal key pair");
        let zq = ZqGroup::same_order_as(group);
        let generator = GqElement::generator(group);
        let mut exponents = Vec::with_capacity(k);
        let mut elements = Vec::with_capacity(k);
        for _ in 0..k {
            let x = gen_random_private_exponent(&zq, rng)?;
            elements.push(generator.exponentiate(&x));
            exponents.push(x);
        }
        Ok(ElGamalKeyPair {
            private_key: ElGamalPrivateKey {
                exponents: GroupVector::from_elements_with_group(exponents, &zq)?,
            },
            public_key: ElGamalPublicKey {
                elements: GroupVector::from_elements_with_group(elements, group)?,
            },
        })
    }

    pub fn private_key(&self) -> &ElGamalPrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &ElGamalPublicKey {
        &self.public_key
    }
}
