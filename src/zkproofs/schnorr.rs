use rand::{CryptoRng, RngCore};

use super::challenge::ChallengeContext;
use super::check_challenge_length;
use crate::error::{CryptoError, CryptoResult};
use crate::hashing::{HashService, Hashable, HashableForm};
use crate::math::{GqElement, GroupMember, ZqElement, ZqGroup};
use crate::random::gen_random_exponent;

const LOG_TARGET: &str = "verimix::zkproofs::schnorr";

const TAG: &str = "SchnorrProof";

/// Proof of knowledge of `x` with `y = g^x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchnorrProof {
    e: ZqElement,
    z: ZqElement,
}

impl SchnorrProof {
    /// Proves knowledge of the `witness` behind `statement = g^witness`.
    pub fn gen<R: RngCore + CryptoRng, S: AsRef<str>>(
        witness: &ZqElement,
        statement: &GqElement,
        auxiliary_information: &[S],
        hash: &HashService,
        rng: &mut R,
    ) -> CryptoResult<Self> {
        let zq = witness.group();
        check_statement(witness, statement)?;
        check_challenge_length(hash, statement.group())?;
        let b = gen_random_exponent(zq, rng)?;
        Self::gen_with_commitment_randomness(witness, statement, auxiliary_information, hash, b)
    }

    /// Checks the proof against `statement` and the same auxiliary
    /// information the prover used.
    pub fn verify<S: AsRef<str>>(
        &self,
        statement: &GqElement,
        auxiliary_information: &[S],
        hash: &HashService,
    ) -> CryptoResult<bool> {
        check_statement(&self.e, statement)?;
        check_statement(&self.z, statement)?;
        check_challenge_length(hash, statement.group())?;
        let group = statement.group();
        let g = GqElement::generator(group);
        // c' = g^z · y^{-e}
        let commitment = g
            .exponentiate(&self.z)
            .multiply(&statement.exponentiate(&self.e.negate()));
        let e_prime = challenge(statement, &commitment, auxiliary_information, hash)?;
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
        SchnorrProof { e, z }
    }

    fn gen_with_commitment_randomness<S: AsRef<str>>(
        witness: &ZqElement,
        statement: &GqElement,
        auxiliary_information: &[S],
        hash: &HashService,
        b: ZqElement,
    ) -> CryptoResult<Self> {
        let group = statement.group();
        let commitment = GqElement::generator(group).exponentiate(&b);
        let e = challenge(statement, &commitment, auxiliary_information, hash)?;
        let z = b.add(&e.multiply(witness));
        Ok(SchnorrProof { e, z })
    }
}

impl HashableForm for SchnorrProof {
    fn to_hashable_form(&self) -> Hashable {
        Hashable::List(vec![self.e.to_hashable_form(), self.z.to_hashable_form()])
    }
}

fn check_statement(exponent: &ZqElement, statement: &GqElement) -> CryptoResult<()> {
    if exponent.group().q() != statement.group().q() {
        return Err(CryptoError::invalid(
            "exponent and statement must share one group order",
        ));
    }
    Ok(())
}

fn challenge<S: AsRef<str>>(
    statement: &GqElement,
    commitment: &GqElement,
    auxiliary_information: &[S],
    hash: &HashService,
) -> CryptoResult<ZqElement> {
    let group = statement.group();
    let zq = ZqGroup::same_order_as(group);
    ChallengeContext::new()
        .push(group.as_ref())
        .push(statement)
        .push(commitment)
        .tagged_aux(TAG, auxiliary_information)
        .derive(hash, &zq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::test_groups::toy_gq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn setup() -> (
        Arc<crate::math::GqGroup>,
        Arc<ZqGroup>,
        HashService,
        StdRng,
    ) {
        let group = toy_gq();
        let zq = ZqGroup::same_order_as(&group);
        (group, zq, HashService::with_hash_length(1).unwrap(), StdRng::seed_from_u64(17))
    }

    #[test]
    fn honest_proof_verifies() {
        let (group, zq, hash, mut rng) = setup();
        let x = gen_random_exponent(&zq, &mut rng).unwrap();
        let y = GqElement::generator(&group).exponentiate(&x);
        let aux = ["election-2026", "ballot-box-7"];
        let proof = SchnorrProof::gen(&x, &y, &aux, &hash, &mut rng).unwrap();
        assert!(proof.verify(&y, &aux, &hash).unwrap());
    }

    #[test]
    fn empty_aux_is_allowed_and_bound() {
        let (group, zq, hash, mut rng) = setup();
        let x = gen_random_exponent(&zq, &mut rng).unwrap();
        let y = GqElement::generator(&group).exponentiate(&x);
        let proof = SchnorrProof::gen::<_, &str>(&x, &y, &[], &hash, &mut rng).unwrap();
        assert!(proof.verify::<&str>(&y, &[], &hash).unwrap());
        // aux added after the fact must be rejected
        assert!(!proof.verify(&y, &["late"], &hash).unwrap());
    }

    #[test]
    fn tampering_flips_the_verdict() {
        let (group, zq, hash, mut rng) = setup();
        let x = gen_random_exponent(&zq, &mut rng).unwrap();
        let y = GqElement::generator(&group).exponentiate(&x);
        let aux = ["aux"];
        let proof = SchnorrProof::gen(&x, &y, &aux, &hash, &mut rng).unwrap();

        let one = ZqElement::one(&zq);
        let bad_e = SchnorrProof::from_parts(proof.e().add(&one), proof.z().clone());
        assert!(!bad_e.verify(&y, &aux, &hash).unwrap());
        let bad_z = SchnorrProof::from_parts(proof.e().clone(), proof.z().add(&one));
        assert!(!bad_z.verify(&y, &aux, &hash).unwrap());

        // wrong statement
        let other = y.multiply(&GqElement::generator(&group));
        assert!(!proof.verify(&other, &aux, &hash).unwrap());
        // wrong aux
        assert!(!proof.verify(&y, &["tampered"], &hash).unwrap());
    }

    #[test]
    fn pinned_commitment_randomness_matches_the_corpus() {
        use num_bigint::BigUint;
        use num_traits::Num;
        use serde_json::Value;

        let corpus: Value = serde_json::from_str(
            &std::fs::read_to_string(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/testdata/schnorr.json"
            ))
            .unwrap(),
        )
        .unwrap();
        let hash = HashService::with_hash_length(1).unwrap();
        let cases = corpus["cases"].as_array().unwrap();
        assert!(!cases.is_empty());
        let dec = |v: &Value| BigUint::from_str_radix(v.as_str().unwrap(), 10).unwrap();
        for case in cases {
            let group = std::sync::Arc::new(
                crate::math::GqGroup::new(dec(&case["p"]), dec(&case["q"]), dec(&case["g"]))
                    .unwrap(),
            );
            let zq = ZqGroup::same_order_as(&group);
            let x = ZqElement::create(dec(&case["witness"]), &zq).unwrap();
            let y = GqElement::create(dec(&case["statement"]), &group).unwrap();
            let aux: Vec<String> = case["aux"]
                .as_array()
                .unwrap()
                .iter()
                .map(|s| s.as_str().unwrap().to_owned())
                .collect();
            let b = ZqElement::create(dec(&case["commitment_randomness"]), &zq).unwrap();
            let proof =
                SchnorrProof::gen_with_commitment_randomness(&x, &y, &aux, &hash, b).unwrap();
            assert_eq!(proof.e().value(), &dec(&case["expected_e"]));
            assert_eq!(proof.z().value(), &dec(&case["expected_z"]));
            assert!(proof.verify(&y, &aux, &hash).unwrap());
        }
    }

    #[test]
    fn oversized_hash_is_rejected_up_front() {
        let (group, zq, _, mut rng) = setup();
        let wide = HashService::new(); // 256 bits against a 10-bit order
        let x = gen_random_exponent(&zq, &mut rng).unwrap();
        let y = GqElement::generator(&group).exponentiate(&x);
        assert!(matches!(
            SchnorrProof::gen::<_, &str>(&x, &y, &[], &wide, &mut rng),
            Err(CryptoError::InvalidArgument(_))
        ));
    }
}
