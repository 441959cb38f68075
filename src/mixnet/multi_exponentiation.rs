//! Multi-exponentiation argument: a public ciphertext is the product of
//! the rows of a ciphertext matrix raised to committed exponents, up to
//! a re-encryption layer.

use rand::{CryptoRng, RngCore};

use super::{powers_of, ArgumentContext};
use crate::elgamal::{ElGamalMultiRecipientCiphertext, ElGamalMultiRecipientMessage};
use crate::error::{CryptoError, CryptoResult};
use crate::math::{GqElement, GroupMatrix, GroupMember, GroupVector, ZqElement};
use crate::random::{gen_random_exponent, gen_random_vector};
use crate::zkproofs::ChallengeContext;

const LOG_TARGET: &str = "verimix::mixnet::multi_exponentiation";

const TAG: &str = "MultiExponentiationArgument";

/// Statement: `c = E(1; ρ) · ∏ᵢ Cᵢ^{aᵢ}` with the exponent columns
/// `aᵢ` committed in `c_a` and `Cᵢ` the rows of the ciphertext matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiExponentiationStatement {
    pub ciphertexts: GroupMatrix<ElGamalMultiRecipientCiphertext>,
    pub c: ElGamalMultiRecipientCiphertext,
    pub c_a: GroupVector<GqElement>,
}

#[derive(Clone, Debug)]
pub struct MultiExponentiationWitness {
    pub a: GroupMatrix<ZqElement>,
    pub r: GroupVector<ZqElement>,
    pub rho: ZqElement,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiExponentiationArgument {
    c_a0: GqElement,
    c_b: GroupVector<GqElement>,
    e: GroupVector<ElGamalMultiRecipientCiphertext>,
    a_vec: GroupVector<ZqElement>,
    r: ZqElement,
    b: ZqElement,
    s: ZqElement,
    tau: ZqElement,
}

pub fn gen_multi_exponentiation_argument<R: RngCore + CryptoRng>(
    context: &ArgumentContext,
    statement: &MultiExponentiationStatement,
    witness: &MultiExponentiationWitness,
    rng: &mut R,
) -> CryptoResult<MultiExponentiationArgument> {
    let zq = context.zq();
    let ck = context.commitment_key();
    let m = statement.ciphertexts.n_rows();
    let n = statement.ciphertexts.n_cols();
    let phi_count = check_statement(context, statement)?;
    if witness.a.n_rows() != n || witness.a.n_cols() != m || witness.r.len() != m {
        return Err(CryptoError::invalid(
            "witness dimensions do not match the statement",
        ));
    }
    if ck.get_commitment_matrix(&witness.a, &witness.r)? != statement.c_a {
        return Err(CryptoError::invalid(
            "witness does not open the exponent commitments",
        ));
    }
    // E(1; ρ) · ∏ rows^columns must reproduce the public ciphertext
    let mut claimed = ElGamalMultiRecipientCiphertext::get_ciphertext(
        &ElGamalMultiRecipientMessage::ones(context.group(), phi_count)?,
        &witness.rho,
        context.public_key(),
    )?;
    for u in 0..m {
        let factor = ElGamalMultiRecipientCiphertext::get_ciphertext_vector_exponentiation(
            &statement.ciphertexts.row(u),
            &witness.a.column(u),
        )?;
        claimed = claimed.get_ciphertext_product(&factor)?;
    }
    if claimed != statement.c {
        return Err(CryptoError::invalid(
            "witness does not open the multi-exponentiation statement",
        ));
    }
    tracing::debug!(target: LOG_TARGET, m, n, "generating multi-exponentiation argument");

    let a_0 = gen_random_vector(zq, n, rng)?;
    let r_0 = gen_random_exponent(zq, rng)?;
    let c_a0 = ck.get_commitment(&a_0, &r_0)?;

    // diagonal masking values; position m is pinned to the statement
    let mut b_vals = Vec::with_capacity(2 * m);
    let mut s_vals = Vec::with_capacity(2 * m);
    let mut tau_vals = Vec::with_capacity(2 * m);
    for k in 0..2 * m {
        if k == m {
            b_vals.push(ZqElement::zero(zq));
            s_vals.push(ZqElement::zero(zq));
            tau_vals.push(witness.rho.clone());
        } else {
            b_vals.push(gen_random_exponent(zq, rng)?);
            s_vals.push(gen_random_exponent(zq, rng)?);
            tau_vals.push(gen_random_exponent(zq, rng)?);
        }
    }
    let c_b = GroupVector::from_elements_with_group(
        b_vals
            .iter()
            .zip(s_vals.iter())
            .map(|(b_k, s_k)| {
                ck.get_commitment(
                    &GroupVector::from_elements_with_group(vec![b_k.clone()], zq)?,
                    s_k,
                )
            })
            .collect::<CryptoResult<Vec<_>>>()?,
        context.group(),
    )?;

    // extended exponent columns: a_0 then the witness columns
    let full_a: Vec<GroupVector<ZqElement>> = std::iter::once(a_0.clone())
        .chain((0..m).map(|i| witness.a.column(i)))
        .collect();
    let generator = GqElement::generator(context.group());
    let mut e_vals = Vec::with_capacity(2 * m);
    for (k, (b_k, tau_k)) in b_vals.iter().zip(tau_vals.iter()).enumerate() {
        let masked = ElGamalMultiRecipientMessage::from_elements(
            GroupVector::from_elements_with_group(
                vec![generator.exponentiate(b_k); phi_count],
                context.group(),
            )?,
        )?;
        let mut e_k = ElGamalMultiRecipientCiphertext::get_ciphertext(
            &masked,
            tau_k,
            context.public_key(),
        )?;
        // diagonal k collects the pairs with m - (u + 1) + l = k
        for u in 0..m {
            let l = (k + u + 1).checked_sub(m);
            if let Some(l) = l {
                if l <= m {
                    let factor =
                        ElGamalMultiRecipientCiphertext::get_ciphertext_vector_exponentiation(
                            &statement.ciphertexts.row(u),
                            &full_a[l],
                        )?;
                    e_k = e_k.get_ciphertext_product(&factor)?;
                }
            }
        }
        e_vals.push(e_k);
    }
    debug_assert_eq!(&e_vals[m], &statement.c);
    let e = GroupVector::from_elements_with_group(e_vals, context.group())?;

    let x = challenge(context, statement, &c_a0, &c_b, &e)?;
    let x_powers = powers_of(&x, 2 * m);

    // l runs to m < 2m, so every needed power is in the table
    let mut a_vec = a_0;
    let mut r_bar = r_0;
    for l in 1..=m {
        let x_l = x_powers.get(l);
        a_vec = a_vec.add(&full_a[l].scalar_multiply(x_l));
        r_bar = r_bar.add(&witness.r.get(l - 1).multiply(x_l));
    }
    let fold = |values: &[ZqElement]| {
        values
            .iter()
            .zip(x_powers.iter())
            .fold(ZqElement::zero(zq), |acc, (v, x_k)| {
                acc.add(&v.multiply(x_k))
            })
    };
    let b_bar = fold(&b_vals);
    let s_bar = fold(&s_vals);
    let tau_bar = fold(&tau_vals);

    Ok(MultiExponentiationArgument {
        c_a0,
        c_b,
        e,
        a_vec,
        r: r_bar,
        b: b_bar,
        s: s_bar,
        tau: tau_bar,
    })
}

pub fn verify_multi_exponentiation_argument(
    context: &ArgumentContext,
    statement: &MultiExponentiationStatement,
    argument: &MultiExponentiationArgument,
) -> CryptoResult<bool> {
    let zq = context.zq();
    let ck = context.commitment_key();
    let m = statement.ciphertexts.n_rows();
    let n = statement.ciphertexts.n_cols();
    let phi_count = check_statement(context, statement)?;
    if argument.c_b.len() != 2 * m || argument.e.len() != 2 * m {
        return Err(CryptoError::invalid(
            "the masking vectors must have 2m entries",
        ));
    }
    if argument.a_vec.len() != n {
        return Err(CryptoError::invalid(
            "the exponent response must have one entry per matrix column",
        ));
    }
    if argument.e.iter().any(|c| c.size() != phi_count) {
        return Err(CryptoError::invalid(
            "masking ciphertexts must match the statement's width",
        ));
    }
    if argument.c_a0.group() != context.group()
        || argument.c_b.group() != context.group()
        || argument.e.group() != context.group()
        || argument.a_vec.group().as_ref() != zq.as_ref()
        || argument.r.group().as_ref() != zq.as_ref()
        || argument.b.group().as_ref() != zq.as_ref()
        || argument.s.group().as_ref() != zq.as_ref()
        || argument.tau.group().as_ref() != zq.as_ref()
    {
        return Err(CryptoError::invalid(
            "argument must live in the context's groups",
        ));
    }

    // position m is pinned: E_m is the statement and c_{b_m} commits 0
    // with randomness 0
    let pinned = argument.e.get(m) == &statement.c && argument.c_b.get(m).is_identity();

    let x = challenge(context, statement, &argument.c_a0, &argument.c_b, &argument.e)?;
    let x_powers = powers_of(&x, 2 * m);

    // com(ā, r̄) = c_{a_0} · ∏ c_{A_i}^{x^i}
    let full_c_a = statement.c_a.prepend(argument.c_a0.clone());
    let opens_a = ck.get_commitment(&argument.a_vec, &argument.r)?
        == full_c_a.multi_exponentiate(&x_powers.subvector(0, m + 1));

    // com(b̄, s̄) = ∏ c_{b_k}^{x^k}
    let opens_b = ck.get_commitment(
        &GroupVector::from_elements_with_group(vec![argument.b.clone()], zq)?,
        &argument.s,
    )? == argument.c_b.multi_exponentiate(&x_powers);

    // ∏ E_k^{x^k} = E(g^b̄; τ̄) · ∏ C_u^{x^{m-1-u}·ā}
    let lhs = ElGamalMultiRecipientCiphertext::get_ciphertext_vector_exponentiation(
        &argument.e,
        &x_powers,
    )?;
    let generator = GqElement::generator(context.group());
    let masked = ElGamalMultiRecipientMessage::from_elements(
        GroupVector::from_elements_with_group(
            vec![generator.exponentiate(&argument.b); phi_count],
            context.group(),
        )?,
    )?;
    let mut rhs = ElGamalMultiRecipientCiphertext::get_ciphertext(
        &masked,
        &argument.tau,
        context.public_key(),
    )?;
    for u in 0..m {
        let weighted = argument.a_vec.scalar_multiply(x_powers.get(m - 1 - u));
        let factor = ElGamalMultiRecipientCiphertext::get_ciphertext_vector_exponentiation(
            &statement.ciphertexts.row(u),
            &weighted,
        )?;
        rhs = rhs.get_ciphertext_product(&factor)?;
    }
    let ciphertexts_match = lhs == rhs;

    let accepted = pinned && opens_a && opens_b && ciphertexts_match;
    if !accepted {
        tracing::debug!(
            target: LOG_TARGET,
            pinned, opens_a, opens_b, ciphertexts_match,
            "multi-exponentiation argument rejected"
        );
    }
    Ok(accepted)
}

/// Shared shape checks; returns the uniform phi count of the matrix.
fn check_statement(
    context: &ArgumentContext,
    statement: &MultiExponentiationStatement,
) -> CryptoResult<usize> {
    let m = statement.ciphertexts.n_rows();
    let n = statement.ciphertexts.n_cols();
    if m == 0 || n == 0 {
        return Err(CryptoError::invalid("the ciphertext matrix must not be empty"));
    }
    if n > context.commitment_key().size() {
        return Err(CryptoError::invalid(format!(
            "matrix rows must have at most {} entries, got {n}",
            context.commitment_key().size()
        )));
    }
    if statement.c_a.len() != m {
        return Err(CryptoError::invalid(
            "one exponent commitment is needed per matrix row",
        ));
    }
    if statement.ciphertexts.group() != context.group()
        || statement.c.group() != context.group()
        || statement.c_a.group() != context.group()
    {
        return Err(CryptoError::invalid(
            "statement must live in the context's group",
        ));
    }
    let phi_count = statement.c.size();
    let mut widths = statement
        .ciphertexts
        .rows()
        .flat_map(|row| row.iter().map(|c| c.size()).collect::<Vec<_>>());
    if widths.any(|w| w != phi_count) {
        return Err(CryptoError::invalid(
            "all ciphertexts must have the same number of phis",
        ));
    }
    if phi_count > context.public_key().size() {
        return Err(CryptoError::invalid(
            "ciphertexts are wider than the public key",
        ));
    }
    Ok(phi_count)
}

fn challenge(
    context: &ArgumentContext,
    statement: &MultiExponentiationStatement,
    c_a0: &GqElement,
    c_b: &GroupVector<GqElement>,
    e: &GroupVector<ElGamalMultiRecipientCiphertext>,
) -> CryptoResult<ZqElement> {
    ChallengeContext::new()
        .push(context.group().as_ref())
        .push(context.public_key())
        .push(&statement.ciphertexts)
        .push(&statement.c)
        .push(&statement.c_a)
        .push(c_a0)
        .push(c_b)
        .push(e)
        .tagged_aux::<&str>(TAG, &[])
        .derive(context.hash(), context.zq())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixnet::test_context::context;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn random_ciphertexts(
        ctx: &ArgumentContext,
        count: usize,
        phi_count: usize,
        rng: &mut StdRng,
    ) -> GroupVector<ElGamalMultiRecipientCiphertext> {
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

    fn instance(
        ctx: &ArgumentContext,
        m: usize,
        n: usize,
        phi_count: usize,
        rng: &mut StdRng,
    ) -> (MultiExponentiationStatement, MultiExponentiationWitness) {
        let zq = ctx.zq().clone();
        let flat = random_ciphertexts(ctx, m * n, phi_count, rng);
        let matrix = GroupMatrix::from_row_vector(&flat, m, n).unwrap();
        let a_flat = gen_random_vector(&zq, n * m, rng).unwrap();
        let a = GroupMatrix::from_column_vector(&a_flat, n, m).unwrap();
        let r = gen_random_vector(&zq, m, rng).unwrap();
        let rho = gen_random_exponent(&zq, rng).unwrap();
        let mut c = ElGamalMultiRecipientCiphertext::get_ciphertext(
            &ElGamalMultiRecipientMessage::ones(ctx.group(), phi_count).unwrap(),
            &rho,
            ctx.public_key(),
        )
        .unwrap();
        for u in 0..m {
            let factor = ElGamalMultiRecipientCiphertext::get_ciphertext_vector_exponentiation(
                &matrix.row(u),
                &a.column(u),
            )
            .unwrap();
            c = c.get_ciphertext_product(&factor).unwrap();
        }
        let statement = MultiExponentiationStatement {
            ciphertexts: matrix,
            c,
            c_a: ctx.commitment_key().get_commitment_matrix(&a, &r).unwrap(),
        };
        (statement, MultiExponentiationWitness { a, r, rho })
    }

    #[test]
    fn honest_argument_verifies() {
        let mut rng = StdRng::seed_from_u64(137);
        let ctx = context(3, 2);
        for (m, n) in [(1usize, 2usize), (2, 2), (2, 3)] {
            let (statement, witness) = instance(&ctx, m, n, 2, &mut rng);
            let argument =
                gen_multi_exponentiation_argument(&ctx, &statement, &witness, &mut rng).unwrap();
            assert!(
                verify_multi_exponentiation_argument(&ctx, &statement, &argument).unwrap(),
                "m = {m}, n = {n}"
            );
        }
    }

    #[test]
    fn forged_product_ciphertext_is_rejected() {
        let mut rng = StdRng::seed_from_u64(139);
        let ctx = context(3, 2);
        let (statement, witness) = instance(&ctx, 2, 2, 2, &mut rng);
        let argument =
            gen_multi_exponentiation_argument(&ctx, &statement, &witness, &mut rng).unwrap();
        let zq = ctx.zq().clone();
        let forged = MultiExponentiationStatement {
            ciphertexts: statement.ciphertexts.clone(),
            c: statement
                .c
                .reencrypt(&gen_random_exponent(&zq, &mut rng).unwrap(), ctx.public_key())
                .unwrap(),
            c_a: statement.c_a.clone(),
        };
        // the pinned E_m no longer matches the statement
        assert!(!verify_multi_exponentiation_argument(&ctx, &forged, &argument).unwrap());
    }

    #[test]
    fn tampered_response_is_rejected() {
        let mut rng = StdRng::seed_from_u64(149);
        let ctx = context(3, 2);
        let (statement, witness) = instance(&ctx, 2, 2, 2, &mut rng);
        let mut argument =
            gen_multi_exponentiation_argument(&ctx, &statement, &witness, &mut rng).unwrap();
        argument.tau = argument.tau.add(&ZqElement::one(ctx.zq()));
        assert!(!verify_multi_exponentiation_argument(&ctx, &statement, &argument).unwrap());
    }

    #[test]
    fn inconsistent_witness_is_an_error() {
        let mut rng = StdRng::seed_from_u64(151);
        let ctx = context(3, 2);
        let (statement, mut witness) = instance(&ctx, 2, 2, 2, &mut rng);
        witness.rho = witness.rho.add(&ZqElement::one(ctx.zq()));
        assert!(
            gen_multi_exponentiation_argument(&ctx, &statement, &witness, &mut rng).is_err()
        );
    }
}
