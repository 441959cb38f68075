//! The composed shuffle argument and the mix-net service façade.
//!
//! The prover commits the permutation and its challenge powers, then
//! ties them together with a product argument (the committed values are
//! the permuted challenge terms) and a multi-exponentiation argument
//! (the shuffled ciphertexts re-encrypt the challenge-weighted input
//! product).

use rand::{CryptoRng, RngCore};

use super::multi_exponentiation::{
    gen_multi_exponentiation_argument, verify_multi_exponentiation_argument,
    MultiExponentiationArgument, MultiExponentiationStatement, MultiExponentiationWitness,
};
use super::permutation::Permutation;
use super::product::{
    gen_product_argument, verify_product_argument, ProductArgument, ProductStatement,
    ProductWitness,
};
use super::{constant_vector, powers_of, ArgumentContext};
use crate::commitment::CommitmentKey;
use crate::elgamal::{ElGamalMultiRecipientCiphertext, ElGamalPublicKey};
use crate::error::{CryptoError, CryptoResult};
use crate::hashing::HashService;
use crate::math::{GqElement, GroupMatrix, GroupVector, ZqElement};
use crate::random::{gen_random_exponent, gen_random_vector};
use crate::zkproofs::ChallengeContext;

const LOG_TARGET: &str = "verimix::mixnet::shuffle";

const TAG: &str = "ShuffleArgument";

/// Statement: `shuffled` is a permutation-plus-re-encryption of
/// `ciphertexts` under the context's public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShuffleStatement {
    pub ciphertexts: GroupVector<ElGamalMultiRecipientCiphertext>,
    pub shuffled: GroupVector<ElGamalMultiRecipientCiphertext>,
}

/// Witness: the permutation `π` and the re-encryption randomness, with
/// `shuffled[i] = ciphertexts[π(i)] · E(1; ρᵢ)`.
#[derive(Clone, Debug)]
pub struct ShuffleWitness {
    pub permutation: Permutation,
    pub randomness: GroupVector<ZqElement>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShuffleArgument {
    c_a: GroupVector<GqElement>,
    c_b: GroupVector<GqElement>,
    product: ProductArgument,
    multi_exponentiation: MultiExponentiationArgument,
}

pub fn gen_shuffle_argument<R: RngCore + CryptoRng>(
    context: &ArgumentContext,
    statement: &ShuffleStatement,
    witness: &ShuffleWitness,
    dimensions: (usize, usize),
    rng: &mut R,
) -> CryptoResult<ShuffleArgument> {
    let zq = context.zq();
    let ck = context.commitment_key();
    let (m, n) = dimensions;
    let count = check_statement(context, statement, dimensions)?;
    if witness.permutation.size() != count || witness.randomness.len() != count {
        return Err(CryptoError::invalid(
            "witness dimensions do not match the statement",
        ));
    }
    if witness.randomness.group().as_ref() != zq.as_ref() {
        return Err(CryptoError::invalid(
            "witness randomness must match the group order",
        ));
    }
    // the witness must actually connect the two ciphertext lists
    for i in 0..count {
        let reencrypted = statement
            .ciphertexts
            .get(witness.permutation.get(i))
            .reencrypt(witness.randomness.get(i), context.public_key())?;
        if &reencrypted != statement.shuffled.get(i) {
            return Err(CryptoError::invalid(
                "witness does not map the input list onto the shuffled list",
            ));
        }
    }
    tracing::debug!(target: LOG_TARGET, count, m, n, "generating shuffle argument");

    // commit the permutation, column by column
    let a_vector = GroupVector::from_elements_with_group(
        witness
            .permutation
            .iter()
            .map(|value| ZqElement::from_u64(value as u64, zq))
            .collect(),
        zq,
    )?;
    let a_matrix = GroupMatrix::from_column_vector(&a_vector, n, m)?;
    let r = gen_random_vector(zq, m, rng)?;
    let c_a = ck.get_commitment_matrix(&a_matrix, &r)?;

    let x = challenge(context, statement, &c_a, None, "x")?;
    let x_powers = powers_of(&x, count);

    // b_i = x^{π(i)}, committed the same way
    let b_vector = GroupVector::from_elements_with_group(
        witness
            .permutation
            .iter()
            .map(|value| x_powers.get(value).clone())
            .collect(),
        zq,
    )?;
    let b_matrix = GroupMatrix::from_column_vector(&b_vector, n, m)?;
    let s = gen_random_vector(zq, m, rng)?;
    let c_b = ck.get_commitment_matrix(&b_matrix, &s)?;

    let y = challenge(context, statement, &c_a, Some(&c_b), "y")?;
    let z = challenge(context, statement, &c_a, Some(&c_b), "z")?;

    // product argument over d = y·a + b - z
    let product_statement = product_statement(context, statement, &c_a, &c_b, &x, &y, &z, n)?;
    let d_vector = a_vector
        .scalar_multiply(&y)
        .add(&b_vector)
        .add(&constant_vector(&z.negate(), count));
    let d_matrix = GroupMatrix::from_column_vector(&d_vector, n, m)?;
    let t = GroupVector::from_elements_with_group(
        r.iter()
            .zip(s.iter())
            .map(|(r_i, s_i)| y.multiply(r_i).add(s_i))
            .collect(),
        zq,
    )?;
    let product = gen_product_argument(
        context,
        &product_statement,
        &ProductWitness {
            a: d_matrix,
            r: t,
        },
        rng,
    )?;

    // multi-exponentiation argument over the shuffled list and b
    let me_statement = multi_exp_statement(statement, &c_b, &x_powers, m, n)?;
    let mut rho = ZqElement::zero(zq);
    for (rho_i, b_i) in witness.randomness.iter().zip(b_vector.iter()) {
        rho = rho.add(&rho_i.multiply(b_i));
    }
    let multi_exponentiation = gen_multi_exponentiation_argument(
        context,
        &me_statement,
        &MultiExponentiationWitness {
            a: b_matrix,
            r: s,
            rho: rho.negate(),
        },
        rng,
    )?;

    Ok(ShuffleArgument {
        c_a,
        c_b,
        product,
        multi_exponentiation,
    })
}

pub fn verify_shuffle_argument(
    context: &ArgumentContext,
    statement: &ShuffleStatement,
    argument: &ShuffleArgument,
    dimensions: (usize, usize),
) -> CryptoResult<bool> {
    let (m, n) = dimensions;
    let count = check_statement(context, statement, dimensions)?;
    if argument.c_a.len() != m || argument.c_b.len() != m {
        return Err(CryptoError::invalid(
            "one commitment per column is needed on both sides",
        ));
    }
    if argument.c_a.group() != context.group() || argument.c_b.group() != context.group() {
        return Err(CryptoError::invalid(
            "argument commitments must live in the context's group",
        ));
    }

    let x = challenge(context, statement, &argument.c_a, None, "x")?;
    let x_powers = powers_of(&x, count);
    let y = challenge(context, statement, &argument.c_a, Some(&argument.c_b), "y")?;
    let z = challenge(context, statement, &argument.c_a, Some(&argument.c_b), "z")?;

    let product_statement = product_statement(
        context,
        statement,
        &argument.c_a,
        &argument.c_b,
        &x,
        &y,
        &z,
        n,
    )?;
    let product_ok = verify_product_argument(context, &product_statement, &argument.product)?;

    let me_statement = multi_exp_statement(statement, &argument.c_b, &x_powers, m, n)?;
    let multi_exp_ok = verify_multi_exponentiation_argument(
        context,
        &me_statement,
        &argument.multi_exponentiation,
    )?;

    let accepted = product_ok && multi_exp_ok;
    if !accepted {
        tracing::debug!(target: LOG_TARGET, product_ok, multi_exp_ok, "shuffle argument rejected");
    }
    Ok(accepted)
}

/// Both sides build the same product statement: commitments
/// `c_{A}^y ⊙ c_B ⊙ com(-z̄, 0)` opening to `∏ (y·i + x^i - z)`.
#[allow(clippy::too_many_arguments)]
fn product_statement(
    context: &ArgumentContext,
    statement: &ShuffleStatement,
    c_a: &GroupVector<GqElement>,
    c_b: &GroupVector<GqElement>,
    x: &ZqElement,
    y: &ZqElement,
    z: &ZqElement,
    n: usize,
) -> CryptoResult<ProductStatement> {
    let zq = context.zq();
    let count = statement.ciphertexts.len();
    let minus_z = constant_vector(&z.negate(), n);
    let c_minus_z = context
        .commitment_key()
        .get_commitment(&minus_z, &ZqElement::zero(zq))?;
    let c_d = GroupVector::from_elements_with_group(
        c_a.iter()
            .zip(c_b.iter())
            .map(|(c_a_i, c_b_i)| c_a_i.exponentiate(y).multiply(c_b_i).multiply(&c_minus_z))
            .collect(),
        context.group(),
    )?;
    // ∏_i (y·i + x^i - z), over the untouched index order
    let x_powers = powers_of(x, count);
    let mut b = ZqElement::one(zq);
    for i in 0..count {
        let term = y
            .multiply(&ZqElement::from_u64(i as u64, zq))
            .add(x_powers.get(i))
            .subtract(z);
        b = b.multiply(&term);
    }
    Ok(ProductStatement { c_a: c_d, b })
}

/// Both sides build the same multi-exponentiation statement: the
/// shuffled list, reshaped row-wise, must open `∏ Cᵢ^{xⁱ}` under the
/// exponents committed in `c_B`.
fn multi_exp_statement(
    statement: &ShuffleStatement,
    c_b: &GroupVector<GqElement>,
    x_powers: &GroupVector<ZqElement>,
    m: usize,
    n: usize,
) -> CryptoResult<MultiExponentiationStatement> {
    let weighted_product = ElGamalMultiRecipientCiphertext::get_ciphertext_vector_exponentiation(
        &statement.ciphertexts,
        x_powers,
    )?;
    Ok(MultiExponentiationStatement {
        ciphertexts: GroupMatrix::from_row_vector(&statement.shuffled, m, n)?,
        c: weighted_product,
        c_a: c_b.clone(),
    })
}

fn check_statement(
    context: &ArgumentContext,
    statement: &ShuffleStatement,
    dimensions: (usize, usize),
) -> CryptoResult<usize> {
    let (m, n) = dimensions;
    let count = statement.ciphertexts.len();
    if count < 2 || statement.shuffled.len() != count {
        return Err(CryptoError::invalid(
            "a shuffle needs at least two ciphertexts on both sides",
        ));
    }
    if m == 0 || n < 2 || m * n != count {
        return Err(CryptoError::invalid(format!(
            "dimensions {m} x {n} do not decompose {count} ciphertexts",
        )));
    }
    if n > context.commitment_key().size() {
        return Err(CryptoError::invalid(format!(
            "column height {n} exceeds the commitment key size {}",
            context.commitment_key().size()
        )));
    }
    if statement.ciphertexts.group() != context.group()
        || statement.shuffled.group() != context.group()
    {
        return Err(CryptoError::invalid(
            "ciphertexts must live in the context's group",
        ));
    }
    let phi_count = statement.ciphertexts.get(0).size();
    if statement
        .ciphertexts
        .iter()
        .chain(statement.shuffled.iter())
        .any(|c| c.size() != phi_count)
    {
        return Err(CryptoError::invalid(
            "all ciphertexts must have the same number of phis",
        ));
    }
    if phi_count > context.public_key().size() {
        return Err(CryptoError::invalid(
            "ciphertexts are wider than the public key",
        ));
    }
    Ok(count)
}

fn challenge(
    context: &ArgumentContext,
    statement: &ShuffleStatement,
    c_a: &GroupVector<GqElement>,
    c_b: Option<&GroupVector<GqElement>>,
    label: &str,
) -> CryptoResult<ZqElement> {
    let mut builder = ChallengeContext::new()
        .push(context.group().as_ref())
        .push(context.public_key())
        .push(&statement.ciphertexts)
        .push(&statement.shuffled)
        .push(c_a);
    if let Some(c_b) = c_b {
        builder = builder.push(c_b);
    }
    builder
        .tagged_aux(TAG, &[label])
        .derive(context.hash(), context.zq())
}

/// The verifiable output of one mixing pass.
#[derive(Clone, Debug)]
pub struct VerifiableShuffle {
    pub shuffled: GroupVector<ElGamalMultiRecipientCiphertext>,
    pub argument: ShuffleArgument,
    pub dimensions: (usize, usize),
}

/// Shuffles, re-encrypts and argues in one call; the counterpart
/// verifies everything a mixing node hands over.
#[derive(Clone, Debug)]
pub struct MixnetService {
    context: ArgumentContext,
}

impl MixnetService {
    pub fn new(
        public_key: ElGamalPublicKey,
        commitment_key: CommitmentKey,
        hash: HashService,
    ) -> CryptoResult<Self> {
        Ok(MixnetService {
            context: ArgumentContext::new(public_key, commitment_key, hash)?,
        })
    }

    pub fn context(&self) -> &ArgumentContext {
        &self.context
    }

    /// Picks the flattest decomposition `count = m · n` whose column
    /// height fits the commitment key.
    fn pick_dimensions(&self, count: usize) -> CryptoResult<(usize, usize)> {
        let nu = self.context.commitment_key().size();
        for m in 1..=count / 2 {
            if count % m == 0 {
                let n = count / m;
                if (2..=nu).contains(&n) {
                    return Ok((m, n));
                }
            }
        }
        Err(CryptoError::invalid(format!(
            "no decomposition of {count} ciphertexts fits a commitment key of size {nu}",
        )))
    }

    /// Permutes and re-encrypts `ciphertexts`, returning the shuffled
    /// list with its argument of correctness.
    pub fn gen_shuffle<R: RngCore + CryptoRng>(
        &self,
        ciphertexts: &GroupVector<ElGamalMultiRecipientCiphertext>,
        rng: &mut R,
    ) -> CryptoResult<VerifiableShuffle> {
        let count = ciphertexts.len();
        let dimensions = self.pick_dimensions(count)?;
        let zq = self.context.zq();
        let permutation = Permutation::random(count, rng)?;
        let randomness = gen_random_vector(zq, count, rng)?;
        let shuffled = GroupVector::from_elements_with_group(
            (0..count)
                .map(|i| {
                    ciphertexts
                        .get(permutation.get(i))
                        .reencrypt(randomness.get(i), self.context.public_key())
                })
                .collect::<CryptoResult<Vec<_>>>()?,
            self.context.group(),
        )?;
        let statement = ShuffleStatement {
            ciphertexts: ciphertexts.clone(),
            shuffled: shuffled.clone(),
        };
        let witness = ShuffleWitness {
            permutation,
            randomness,
        };
        let argument = gen_shuffle_argument(&self.context, &statement, &witness, dimensions, rng)?;
        Ok(VerifiableShuffle {
            shuffled,
            argument,
            dimensions,
        })
    }

    /// Checks a mixing node's output against its input.
    pub fn verify_shuffle(
        &self,
        ciphertexts: &GroupVector<ElGamalMultiRecipientCiphertext>,
        shuffle: &VerifiableShuffle,
    ) -> CryptoResult<bool> {
        let statement = ShuffleStatement {
            ciphertexts: ciphertexts.clone(),
            shuffled: shuffle.shuffled.clone(),
        };
        verify_shuffle_argument(
            &self.context,
            &statement,
            &shuffle.argument,
            shuffle.dimensions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elgamal::{ElGamalKeyPair, ElGamalMultiRecipientMessage};
    use crate::math::test_groups::toy_gq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn service(nu: usize, key_size: usize, rng: &mut StdRng) -> MixnetService {
        let group = toy_gq();
        let hash = HashService::with_hash_length(1).unwrap();
        let pair = ElGamalKeyPair::generate(&group, key_size, rng).unwrap();
        let ck = CommitmentKey::derive(&group, nu, &hash).unwrap();
        MixnetService::new(pair.public_key().clone(), ck, hash).unwrap()
    }

    fn random_ciphertexts(
        service: &MixnetService,
        count: usize,
        phi_count: usize,
        rng: &mut StdRng,
    ) -> GroupVector<ElGamalMultiRecipientCiphertext> {
        let ctx = service.context();
        let zq = ctx.zq().clone();
        let generator = GqElement::generator(ctx.group());
        GroupVector::from_elements(
            (0..count)
                .map(|_| {
                    let message = ElGamalMultiRecipientMessage::from_elements(
                        GroupVector::from_elements_with_group(
                            (0..phi_count)
                                .map(|_| {
                                    generator
                                        .exponentiate(&gen_random_exponent(&zq, rng).unwrap())
                                })
                                .collect(),
                            ctx.group(),
                        )
                        .unwrap(),
                    )
                    .unwrap();
                    let r = gen_random_exponent(&zq, rng).unwrap();
                    ElGamalMultiRecipientCiphertext::get_ciphertext(
                        &message,
                        &r,
                        ctx.public_key(),
                    )
                    .unwrap()
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn shuffle_and_verify_roundtrip() {
        let mut rng = StdRng::seed_from_u64(157);
        let service = service(4, 2, &mut rng);
        for count in [4usize, 6, 8] {
            let ciphertexts = random_ciphertexts(&service, count, 2, &mut rng);
            let shuffle = service.gen_shuffle(&ciphertexts, &mut rng).unwrap();
            assert!(
                service.verify_shuffle(&ciphertexts, &shuffle).unwrap(),
                "count = {count}"
            );
        }
    }

    #[test]
    fn single_column_decomposition_works() {
        let mut rng = StdRng::seed_from_u64(163);
        let service = service(4, 1, &mut rng);
        // 3 <= nu, so m = 1, n = 3
        let ciphertexts = random_ciphertexts(&service, 3, 1, &mut rng);
        let shuffle = service.gen_shuffle(&ciphertexts, &mut rng).unwrap();
        assert_eq!(shuffle.dimensions, (1, 3));
        assert!(service.verify_shuffle(&ciphertexts, &shuffle).unwrap());
    }

    #[test]
    fn shuffled_output_decrypts_to_the_same_multiset() {
        let mut rng = StdRng::seed_from_u64(167);
        let group = toy_gq();
        let hash = HashService::with_hash_length(1).unwrap();
        let pair = ElGamalKeyPair::generate(&group, 1, &mut rng).unwrap();
        let ck = CommitmentKey::derive(&group, 2, &hash).unwrap();
        let service = MixnetService::new(pair.public_key().clone(), ck, hash).unwrap();
        let ciphertexts = random_ciphertexts(&service, 4, 1, &mut rng);
        let shuffle = service.gen_shuffle(&ciphertexts, &mut rng).unwrap();
        let mut before: Vec<_> = ciphertexts
            .iter()
            .map(|c| {
                c.get_message(pair.private_key())
                    .unwrap()
                    .get(0)
                    .value()
                    .clone()
            })
            .collect();
        let mut after: Vec<_> = shuffle
            .shuffled
            .iter()
            .map(|c| {
                c.get_message(pair.private_key())
                    .unwrap()
                    .get(0)
                    .value()
                    .clone()
            })
            .collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    // shuffle instance produced outside this crate: the argument must
    // verify over externally computed ciphertexts
    #[test]
    fn external_shuffle_instance_argues_and_verifies() {
        use crate::elgamal::{ElGamalPrivateKey, ElGamalPublicKey};
        use num_bigint::BigUint;
        use num_traits::Num;
        use serde_json::Value;
        use std::sync::Arc;

        let corpus: Value = serde_json::from_str(
            &std::fs::read_to_string(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/testdata/shuffle.json"
            ))
            .unwrap(),
        )
        .unwrap();
        let dec = |v: &Value| BigUint::from_str_radix(v.as_str().unwrap(), 10).unwrap();
        let group = Arc::new(
            crate::math::GqGroup::new(dec(&corpus["p"]), dec(&corpus["q"]), dec(&corpus["g"]))
                .unwrap(),
        );
        let zq = crate::math::ZqGroup::same_order_as(&group);
        let ciphertext_list = |key: &str| {
            GroupVector::from_elements(
                corpus[key]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|c| {
                        ElGamalMultiRecipientCiphertext::from_parts(
                            GqElement::create(dec(&c["gamma"]), &group).unwrap(),
                            GroupVector::from_elements(
                                c["phis"]
                                    .as_array()
                                    .unwrap()
                                    .iter()
                                    .map(|p| GqElement::create(dec(p), &group).unwrap())
                                    .collect(),
                            )
                            .unwrap(),
                        )
                        .unwrap()
                    })
                    .collect(),
            )
            .unwrap()
        };
        let inputs = ciphertext_list("inputs");
        let outputs = ciphertext_list("outputs");
        let public_key = ElGamalPublicKey::from_elements(
            GroupVector::from_elements(
                corpus["public_key"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|h| GqElement::create(dec(h), &group).unwrap())
                    .collect(),
            )
            .unwrap(),
        )
        .unwrap();
        let secret_key = ElGamalPrivateKey::from_exponents(
            GroupVector::from_elements(
                corpus["secret_key"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|x| ZqElement::create(dec(x), &zq).unwrap())
                    .collect(),
            )
            .unwrap(),
        )
        .unwrap();
        let permutation = Permutation::from_mapping(
            corpus["permutation"]
                .as_array()
                .unwrap()
                .iter()
                .map(|i| i.as_u64().unwrap() as usize)
                .collect(),
        )
        .unwrap();
        let randomness = GroupVector::from_elements(
            corpus["rho"]
                .as_array()
                .unwrap()
                .iter()
                .map(|r| ZqElement::create(dec(r), &zq).unwrap())
                .collect(),
        )
        .unwrap();
        let dimensions = (
            corpus["dimensions"]["m"].as_u64().unwrap() as usize,
            corpus["dimensions"]["n"].as_u64().unwrap() as usize,
        );

        // the corpus instance decrypts to the permuted messages
        for (i, expected) in corpus["messages"].as_array().unwrap().iter().enumerate() {
            let message = inputs.get(i).get_message(&secret_key).unwrap();
            assert_eq!(message.get(0).value(), &dec(expected));
        }

        let hash = HashService::with_hash_length(1).unwrap();
        let ck = CommitmentKey::derive(&group, dimensions.1, &hash).unwrap();
        let context = ArgumentContext::new(public_key, ck, hash).unwrap();
        let statement = ShuffleStatement {
            ciphertexts: inputs,
            shuffled: outputs,
        };
        let witness = ShuffleWitness {
            permutation,
            randomness,
        };
        let mut rng = StdRng::seed_from_u64(191919);
        let argument =
            gen_shuffle_argument(&context, &statement, &witness, dimensions, &mut rng).unwrap();
        assert!(verify_shuffle_argument(&context, &statement, &argument, dimensions).unwrap());
    }

    #[test]
    fn tampered_shuffle_is_rejected() {
        let mut rng = StdRng::seed_from_u64(173);
        let service = service(4, 2, &mut rng);
        let ciphertexts = random_ciphertexts(&service, 4, 2, &mut rng);
        let shuffle = service.gen_shuffle(&ciphertexts, &mut rng).unwrap();

        // replace one output by a fresh encryption of something else
        let mut outputs: Vec<_> = shuffle.shuffled.iter().cloned().collect();
        outputs[2] = random_ciphertexts(&service, 1, 2, &mut rng).get(0).clone();
        let forged = VerifiableShuffle {
            shuffled: GroupVector::from_elements(outputs).unwrap(),
            argument: shuffle.argument.clone(),
            dimensions: shuffle.dimensions,
        };
        assert!(!service.verify_shuffle(&ciphertexts, &forged).unwrap());

        // or present the argument against a different input list
        let other_inputs = random_ciphertexts(&service, 4, 2, &mut rng);
        assert!(!service.verify_shuffle(&other_inputs, &shuffle).unwrap());
    }

    #[test]
    fn undecomposable_counts_are_rejected() {
        let mut rng = StdRng::seed_from_u64(179);
        // nu = 2 and 5 ciphertexts: 5 = 1·5 or 5·1, neither fits
        let service = service(2, 1, &mut rng);
        let ciphertexts = random_ciphertexts(&service, 5, 1, &mut rng);
        assert!(service.gen_shuffle(&ciphertexts, &mut rng).is_err());
    }

    #[test]
    fn degenerate_dimensions_are_rejected() {
        let mut rng = StdRng::seed_from_u64(181);
        let service = service(4, 1, &mut rng);
        let ciphertexts = random_ciphertexts(&service, 4, 1, &mut rng);
        let statement = ShuffleStatement {
            ciphertexts: ciphertexts.clone(),
            shuffled: ciphertexts.clone(),
        };
        let witness = ShuffleWitness {
            permutation: Permutation::from_mapping((0..4).collect()).unwrap(),
            randomness: constant_vector(&ZqElement::zero(service.context().zq()), 4),
        };
        // n = 1 is degenerate even though 4 = 4·1
        assert!(gen_shuffle_argument(
            service.context(),
            &statement,
            &witness,
            (4, 1),
            &mut rng
        )
        .is_err());
    }
}
