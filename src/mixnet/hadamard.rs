//! Hadamard argument: a committed vector is the entry-wise product of
//! the columns of a committed matrix. Reduces to a zero argument.

use rand::{CryptoRng, RngCore};

use super::zero::{gen_zero_argument, verify_zero_argument, ZeroArgument, ZeroStatement, ZeroWitness};
use super::{constant_vector, powers_of, ArgumentContext};
use crate::error::{CryptoError, CryptoResult};
use crate::math::{GqElement, GroupMatrix, GroupMember, GroupVector, ZqElement};
use crate::random::{gen_random_exponent, gen_random_vector};
use crate::zkproofs::ChallengeContext;

const LOG_TARGET: &str = "verimix::mixnet::hadamard";

const TAG: &str = "HadamardArgument";

/// Statement: `c_a` commits the columns of `A`, `c_b` commits
/// `b = a₁ ∘ a₂ ∘ … ∘ a_m`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HadamardStatement {
    pub c_a: GroupVector<GqElement>,
    pub c_b: GqElement,
}

#[derive(Clone, Debug)]
pub struct HadamardWitness {
    pub a: GroupMatrix<ZqElement>,
    pub r: GroupVector<ZqElement>,
    pub b: GroupVector<ZqElement>,
    pub s: ZqElement,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HadamardArgument {
    c_b_vector: GroupVector<GqElement>,
    zero: ZeroArgument,
}

pub fn gen_hadamard_argument<R: RngCore + CryptoRng>(
    context: &ArgumentContext,
    statement: &HadamardStatement,
    witness: &HadamardWitness,
    rng: &mut R,
) -> CryptoResult<HadamardArgument> {
    let zq = context.zq();
    let ck = context.commitment_key();
    let m = statement.c_a.len();
    let n = witness.a.n_rows();
    check_statement(context, statement)?;
    if witness.a.n_cols() != m || witness.r.len() != m || witness.b.len() != n {
        return Err(CryptoError::invalid(
            "witness dimensions do not match the statement",
        ));
    }
    if n == 0 || n > ck.size() {
        return Err(CryptoError::invalid(format!(
            "matrix columns must have 1..={} entries, got {n}",
            ck.size()
        )));
    }
    if ck.get_commitment_matrix(&witness.a, &witness.r)? != statement.c_a
        || ck.get_commitment(&witness.b, &witness.s)? != statement.c_b
    {
        return Err(CryptoError::invalid(
            "witness does not open the Hadamard statement",
        ));
    }
    let full_product = (1..m).fold(witness.a.column(0), |acc, i| acc.hadamard(&witness.a.column(i)));
    if full_product != witness.b {
        return Err(CryptoError::invalid(
            "witness vector is not the Hadamard product of the columns",
        ));
    }
    tracing::debug!(target: LOG_TARGET, m, n, "generating Hadamard argument");

    // prefix products b_i = a₁ ∘ … ∘ a_{i+1}; first and last reuse the
    // statement's commitments and randomness
    let mut prefix = Vec::with_capacity(m);
    prefix.push(witness.a.column(0));
    for i in 1..m {
        let last: &GroupVector<ZqElement> = prefix.last().expect("non-empty");
        prefix.push(last.hadamard(&witness.a.column(i)));
    }
    let mut s_vec = Vec::with_capacity(m);
    s_vec.push(witness.r.get(0).clone());
    for _ in 1..m - 1 {
        s_vec.push(gen_random_exponent(zq, rng)?);
    }
    s_vec.push(witness.s.clone());
    let mut c_b_elements = Vec::with_capacity(m);
    c_b_elements.push(statement.c_a.get(0).clone());
    for i in 1..m - 1 {
        c_b_elements.push(ck.get_commitment(&prefix[i], &s_vec[i])?);
    }
    c_b_elements.push(statement.c_b.clone());
    let c_b_vector = GroupVector::from_elements_with_group(c_b_elements, context.group())?;

    let (x, y) = challenges(context, statement, &c_b_vector)?;
    let zero_statement = reduce_statement(context, statement, &c_b_vector, &x, &y, n)?;

    // zero witness columns: (a₂ … a_m, -1) against (x⁰b₁ … x^{m-2}b_{m-1}, d)
    let x_powers = powers_of(&x, m);
    let minus_one = constant_vector(&ZqElement::one(zq).negate(), n);
    let mut zero_a_cols: Vec<GroupVector<ZqElement>> =
        (1..m).map(|i| witness.a.column(i)).collect();
    zero_a_cols.push(minus_one);
    let mut zero_r: Vec<ZqElement> = (1..m).map(|i| witness.r.get(i).clone()).collect();
    zero_r.push(ZqElement::zero(zq));

    let mut zero_b_cols: Vec<GroupVector<ZqElement>> = (0..m - 1)
        .map(|i| prefix[i].scalar_multiply(x_powers.get(i)))
        .collect();
    let mut zero_s: Vec<ZqElement> = (0..m - 1)
        .map(|i| s_vec[i].multiply(x_powers.get(i)))
        .collect();
    let mut d = constant_vector(&ZqElement::zero(zq), n);
    let mut d_rand = ZqElement::zero(zq);
    for i in 0..m - 1 {
        d = d.add(&prefix[i + 1].scalar_multiply(x_powers.get(i)));
        d_rand = d_rand.add(&s_vec[i + 1].multiply(x_powers.get(i)));
    }
    zero_b_cols.push(d);
    zero_s.push(d_rand);

    let zero_witness = ZeroWitness {
        a: columns_to_matrix(&zero_a_cols)?,
        r: GroupVector::from_elements_with_group(zero_r, zq)?,
        b: columns_to_matrix(&zero_b_cols)?,
        s: GroupVector::from_elements_with_group(zero_s, zq)?,
    };
    debug_assert_eq!(zero_statement.c_a.len(), m);
    let zero = gen_zero_argument(context, &zero_statement, &zero_witness, rng)?;

    Ok(HadamardArgument { c_b_vector, zero })
}

pub fn verify_hadamard_argument(
    context: &ArgumentContext,
    statement: &HadamardStatement,
    argument: &HadamardArgument,
) -> CryptoResult<bool> {
    check_statement(context, statement)?;
    let m = statement.c_a.len();
    if argument.c_b_vector.len() != m {
        return Err(CryptoError::invalid(
            "the intermediate commitment vector must have m entries",
        ));
    }
    if argument.c_b_vector.group() != context.group() {
        return Err(CryptoError::invalid(
            "argument commitments must live in the context's group",
        ));
    }

    // the chain is anchored at both ends
    let anchored = argument.c_b_vector.get(0) == statement.c_a.get(0)
        && argument.c_b_vector.get(m - 1) == &statement.c_b;

    let (x, y) = challenges(context, statement, &argument.c_b_vector)?;
    // the -1 commitment needs the column height, which the zero
    // argument's response vector pins down
    let n = argument.zero.column_height();
    if n == 0 || n > context.commitment_key().size() {
        return Err(CryptoError::invalid(
            "argument dimensions do not fit the commitment key",
        ));
    }
    let zero_statement = reduce_statement(context, statement, &argument.c_b_vector, &x, &y, n)?;

    let zero_ok = verify_zero_argument(context, &zero_statement, &argument.zero)?;
    let accepted = anchored && zero_ok;
    if !accepted {
        tracing::debug!(target: LOG_TARGET, anchored, zero_ok, "Hadamard argument rejected");
    }
    Ok(accepted)
}

/// Builds the zero statement both sides agree on: columns
/// `(c_{A_2} … c_{A_m}, c_{-1})` against `(c_{B_1}^{x⁰} … c_{B_{m-1}}^{x^{m-2}}, c_d)`.
fn reduce_statement(
    context: &ArgumentContext,
    statement: &HadamardStatement,
    c_b_vector: &GroupVector<GqElement>,
    x: &ZqElement,
    y: &ZqElement,
    n: usize,
) -> CryptoResult<ZeroStatement> {
    let zq = context.zq();
    let ck = context.commitment_key();
    let m = statement.c_a.len();
    let x_powers = powers_of(x, m);
    let minus_one = constant_vector(&ZqElement::one(zq).negate(), n);
    let c_minus_one = ck.get_commitment(&minus_one, &ZqElement::zero(zq))?;

    let mut zero_c_a: Vec<GqElement> = (1..m).map(|i| statement.c_a.get(i).clone()).collect();
    zero_c_a.push(c_minus_one);

    let mut zero_c_b: Vec<GqElement> = (0..m - 1)
        .map(|i| c_b_vector.get(i).exponentiate(x_powers.get(i)))
        .collect();
    let mut c_d = GqElement::identity(context.group());
    for i in 0..m - 1 {
        c_d = c_d.multiply(&c_b_vector.get(i + 1).exponentiate(x_powers.get(i)));
    }
    zero_c_b.push(c_d);

    Ok(ZeroStatement {
        c_a: GroupVector::from_elements_with_group(zero_c_a, context.group())?,
        c_b: GroupVector::from_elements_with_group(zero_c_b, context.group())?,
        y: y.clone(),
    })
}

fn check_statement(context: &ArgumentContext, statement: &HadamardStatement) -> CryptoResult<()> {
    if statement.c_a.len() < 2 {
        return Err(CryptoError::invalid(
            "the Hadamard argument needs at least two columns",
        ));
    }
    if statement.c_a.group() != context.group() || statement.c_b.group() != context.group() {
        return Err(CryptoError::invalid(
            "statement commitments must live in the context's group",
        ));
    }
    Ok(())
}

fn columns_to_matrix(columns: &[GroupVector<ZqElement>]) -> CryptoResult<GroupMatrix<ZqElement>> {
    let n = columns.first().map(|c| c.len()).unwrap_or(0);
    GroupMatrix::from_rows(
        (0..n)
            .map(|row| columns.iter().map(|c| c.get(row).clone()).collect())
            .collect(),
    )
}

fn challenges(
    context: &ArgumentContext,
    statement: &HadamardStatement,
    c_b_vector: &GroupVector<GqElement>,
) -> CryptoResult<(ZqElement, ZqElement)> {
    let derive = |label: &str| {
        ChallengeContext::new()
            .push(context.group().as_ref())
            .push(&statement.c_a)
            .push(&statement.c_b)
            .push(c_b_vector)
            .tagged_aux(TAG, &[label])
            .derive(context.hash(), context.zq())
    };
    Ok((derive("x")?, derive("y")?))
}
