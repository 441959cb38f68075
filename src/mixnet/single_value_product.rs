//! Single-value product argument: a committed vector multiplies out to
//! a public value.

use rand::{CryptoRng, RngCore};

use super::ArgumentContext;
use crate::error::{CryptoError, CryptoResult};
use crate::math::{GqElement, GroupMember, GroupVector, ZqElement};
use crate::random::{gen_random_exponent, gen_random_vector};
use crate::zkproofs::ChallengeContext;

const LOG_TARGET: &str = "verimix::mixnet::single_value_product";

const TAG: &str = "SingleValueProductArgument";

/// Statement: `c_a` commits a vector whose entries multiply to `b`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleValueProductStatement {
    pub commitment: GqElement,
    pub product: ZqElement,
}

/// Witness: the committed vector `a` and the commitment randomness.
#[derive(Clone, Debug)]
pub struct SingleValueProductWitness {
    pub elements: GroupVector<ZqElement>,
    pub randomness: ZqElement,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleValueProductArgument {
    c_d: GqElement,
    c_lower_delta: GqElement,
    c_upper_delta: GqElement,
    a_tilde: GroupVector<ZqElement>,
    b_tilde: GroupVector<ZqElement>,
    r_tilde: ZqElement,
    s_tilde: ZqElement,
}

pub fn gen_single_value_product_argument<R: RngCore + CryptoRng>(
    context: &ArgumentContext,
    statement: &SingleValueProductStatement,
    witness: &SingleValueProductWitness,
    rng: &mut R,
) -> CryptoResult<SingleValueProductArgument> {
    let zq = context.zq();
    let n = witness.elements.len();
    if n < 2 || n > context.commitment_key().size() {
        return Err(CryptoError::invalid(format!(
            "the committed vector must have 2..={} elements, got {n}",
            context.commitment_key().size()
        )));
    }
    if witness.elements.group().as_ref() != zq.as_ref() {
        return Err(CryptoError::invalid(
            "witness must match the context's group order",
        ));
    }
    // the witness must actually open the statement
    if context
        .commitment_key()
        .get_commitment(&witness.elements, &witness.randomness)?
        != statement.commitment
        || witness.elements.product() != statement.product
    {
        return Err(CryptoError::invalid(
            "witness does not open the product statement",
        ));
    }
    tracing::debug!(target: LOG_TARGET, n, "generating single-value product argument");

    let a = &witness.elements;
    // running products b_k = a_0 · … · a_k
    let mut running = Vec::with_capacity(n);
    let mut acc = ZqElement::one(zq);
    for element in a.iter() {
        acc = acc.multiply(element);
        running.push(acc.clone());
    }
    let b_vec = GroupVector::from_elements_with_group(running, zq)?;

    let d = gen_random_vector(zq, n, rng)?;
    let r_d = gen_random_exponent(zq, rng)?;
    // δ has the first entry pinned to d₀ and the last to zero
    let mut delta_elements: Vec<ZqElement> = Vec::with_capacity(n);
    delta_elements.push(d.get(0).clone());
    for _ in 1..n - 1 {
        delta_elements.push(gen_random_exponent(zq, rng)?);
    }
    delta_elements.push(ZqElement::zero(zq));
    let delta = GroupVector::from_elements_with_group(delta_elements, zq)?;
    let s_0 = gen_random_exponent(zq, rng)?;
    let s_x = gen_random_exponent(zq, rng)?;

    let c_d = context.commitment_key().get_commitment(&d, &r_d)?;
    // (-δ_k · d_{k+1}) for k = 0 .. n-2
    let lower = GroupVector::from_elements_with_group(
        (0..n - 1)
            .map(|k| delta.get(k).negate().multiply(d.get(k + 1)))
            .collect(),
        zq,
    )?;
    let c_lower_delta = context.commitment_key().get_commitment(&lower, &s_0)?;
    // (δ_k − a_k·δ_{k-1} − b_{k-1}·d_k) for k = 1 .. n-1
    let upper = GroupVector::from_elements_with_group(
        (1..n)
            .map(|k| {
                delta
                    .get(k)
                    .subtract(&a.get(k).multiply(delta.get(k - 1)))
                    .subtract(&b_vec.get(k - 1).multiply(d.get(k)))
            })
            .collect(),
        zq,
    )?;
    let c_upper_delta = context.commitment_key().get_commitment(&upper, &s_x)?;

    let x = challenge(context, statement, &c_d, &c_lower_delta, &c_upper_delta)?;

    let a_tilde = a.scalar_multiply(&x).add(&d);
    let b_tilde = b_vec.scalar_multiply(&x).add(&delta);
    let r_tilde = x.multiply(&witness.randomness).add(&r_d);
    let s_tilde = x.multiply(&s_x).add(&s_0);

    Ok(SingleValueProductArgument {
        c_d,
        c_lower_delta,
        c_upper_delta,
        a_tilde,
        b_tilde,
        r_tilde,
        s_tilde,
    })
}

pub fn verify_single_value_product_argument(
    context: &ArgumentContext,
    statement: &SingleValueProductStatement,
    argument: &SingleValueProductArgument,
) -> CryptoResult<bool> {
    let zq = context.zq();
    let n = argument.a_tilde.len();
    if n < 2 || n > context.commitment_key().size() || argument.b_tilde.len() != n {
        return Err(CryptoError::invalid(
            "argument dimensions do not fit the commitment key",
        ));
    }
    if argument.a_tilde.group().as_ref() != zq.as_ref()
        || argument.b_tilde.group().as_ref() != zq.as_ref()
        || argument.r_tilde.group().as_ref() != zq.as_ref()
        || argument.s_tilde.group().as_ref() != zq.as_ref()
        || argument.c_d.group() != context.group()
        || argument.c_lower_delta.group() != context.group()
        || argument.c_upper_delta.group() != context.group()
        || statement.commitment.group() != context.group()
        || statement.product.group().as_ref() != zq.as_ref()
    {
        return Err(CryptoError::invalid(
            "argument and statement must live in the context's groups",
        ));
    }

    let x = challenge(
        context,
        statement,
        &argument.c_d,
        &argument.c_lower_delta,
        &argument.c_upper_delta,
    )?;

    // com(ã, r̃) = c_a^x · c_d
    let opens_a = context
        .commitment_key()
        .get_commitment(&argument.a_tilde, &argument.r_tilde)?
        == statement.commitment.exponentiate(&x).multiply(&argument.c_d);

    // com((x·b̃_k − b̃_{k-1}·ã_k)_k, s̃) = c_Δ^x · c_δ
    let folded = GroupVector::from_elements_with_group(
        (1..n)
            .map(|k| {
                x.multiply(argument.b_tilde.get(k))
                    .subtract(&argument.b_tilde.get(k - 1).multiply(argument.a_tilde.get(k)))
            })
            .collect(),
        zq,
    )?;
    let opens_delta = context
        .commitment_key()
        .get_commitment(&folded, &argument.s_tilde)?
        == argument
            .c_upper_delta
            .exponentiate(&x)
            .multiply(&argument.c_lower_delta);

    // the running product starts at ã₀ and ends at x·b
    let starts = argument.b_tilde.get(0) == argument.a_tilde.get(0);
    let ends = argument.b_tilde.get(n - 1) == &x.multiply(&statement.product);

    let accepted = opens_a && opens_delta && starts && ends;
    if !accepted {
        tracing::debug!(
            target: LOG_TARGET,
            opens_a, opens_delta, starts, ends,
            "single-value product argument rejected"
        );
    }
    Ok(accepted)
}

fn challenge(
    context: &ArgumentContext,
    statement: &SingleValueProductStatement,
    c_d: &GqElement,
    c_lower_delta: &GqElement,
    c_upper_delta: &GqElement,
) -> CryptoResult<ZqElement> {
    ChallengeContext::new()
        .push(context.group().as_ref())
        .push(&statement.commitment)
        .push(&statement.product)
        .push(c_d)
        .push(c_lower_delta)
        .push(c_upper_delta)
        .tagged_aux::<&str>(TAG, &[])
        .derive(context.hash(), context.zq())
}
