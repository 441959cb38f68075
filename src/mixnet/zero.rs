//! Zero argument: paired columns of two committed matrices sum to zero
//! under the bilinear map `a ⋆ b = Σ_j a_j · b_j · y^{j+1}`.

use rand::{CryptoRng, RngCore};

use super::{powers_of, ArgumentContext};
use crate::error::{CryptoError, CryptoResult};
use crate::math::{GqElement, GroupMatrix, GroupMember, GroupVector, ZqElement};
use crate::random::{gen_random_exponent, gen_random_vector};
use crate::zkproofs::ChallengeContext;

const LOG_TARGET: &str = "verimix::mixnet::zero";

const TAG: &str = "ZeroArgument";

/// Statement: commitments to the columns of `A` and `B` such that
/// `Σ_i a_i ⋆ b_i = 0` for the map defined by `y`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZeroStatement {
    pub c_a: GroupVector<GqElement>,
    pub c_b: GroupVector<GqElement>,
    pub y: ZqElement,
}

/// Witness: the matrices and their commitment randomness, column-wise.
#[derive(Clone, Debug)]
pub struct ZeroWitness {
    pub a: GroupMatrix<ZqElement>,
    pub r: GroupVector<ZqElement>,
    pub b: GroupMatrix<ZqElement>,
    pub s: GroupVector<ZqElement>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZeroArgument {
    c_a0: GqElement,
    c_bm: GqElement,
    c_d: GroupVector<GqElement>,
    a_bar: GroupVector<ZqElement>,
    b_bar: GroupVector<ZqElement>,
    r_bar: ZqElement,
    s_bar: ZqElement,
    t_bar: ZqElement,
}

impl ZeroArgument {
    /// Column height of the matrices the argument speaks about.
    pub fn column_height(&self) -> usize {
        self.a_bar.len()
    }
}

/// `a ⋆ b = Σ_j a_j · b_j · y^{j+1}`.
pub(crate) fn bilinear_star(
    a: &GroupVector<ZqElement>,
    b: &GroupVector<ZqElement>,
    y: &ZqElement,
) -> ZqElement {
    assert_eq!(a.len(), b.len(), "star operands must have the same size");
    let zq = y.group();
    let mut y_power = y.clone();
    let mut sum = ZqElement::zero(zq);
    for (a_j, b_j) in a.iter().zip(b.iter()) {
        sum = sum.add(&a_j.multiply(b_j).multiply(&y_power));
        y_power = y_power.multiply(y);
    }
    sum
}

pub fn gen_zero_argument<R: RngCore + CryptoRng>(
    context: &ArgumentContext,
    statement: &ZeroStatement,
    witness: &ZeroWitness,
    rng: &mut R,
) -> CryptoResult<ZeroArgument> {
    let zq = context.zq();
    let ck = context.commitment_key();
    let m = statement.c_a.len();
    let n = witness.a.n_rows();
    check_statement(context, statement)?;
    if witness.a.n_cols() != m
        || witness.b.n_cols() != m
        || witness.b.n_rows() != n
        || witness.r.len() != m
        || witness.s.len() != m
    {
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
    // the witness must open the statement and satisfy the zero claim
    if ck.get_commitment_matrix(&witness.a, &witness.r)? != statement.c_a
        || ck.get_commitment_matrix(&witness.b, &witness.s)? != statement.c_b
    {
        return Err(CryptoError::invalid(
            "witness does not open the zero statement",
        ));
    }
    let claim = (0..m).fold(ZqElement::zero(zq), |acc, i| {
        acc.add(&bilinear_star(
            &witness.a.column(i),
            &witness.b.column(i),
            &statement.y,
        ))
    });
    if !claim.is_zero() {
        return Err(CryptoError::invalid(
            "witness columns do not star-sum to zero",
        ));
    }
    tracing::debug!(target: LOG_TARGET, m, n, "generating zero argument");

    let a_0 = gen_random_vector(zq, n, rng)?;
    let b_m = gen_random_vector(zq, n, rng)?;
    let r_0 = gen_random_exponent(zq, rng)?;
    let s_m = gen_random_exponent(zq, rng)?;
    let c_a0 = ck.get_commitment(&a_0, &r_0)?;
    let c_bm = ck.get_commitment(&b_m, &s_m)?;

    // extended column families: a_0 prepended, b_m appended
    let a_cols: Vec<GroupVector<ZqElement>> = std::iter::once(a_0)
        .chain((0..m).map(|i| witness.a.column(i)))
        .collect();
    let b_cols: Vec<GroupVector<ZqElement>> = (0..m)
        .map(|j| witness.b.column(j))
        .chain(std::iter::once(b_m))
        .collect();

    // d_k = Σ_{i + m - j = k} a_i ⋆ b_j, with d_{m+1} pinned to zero
    let mut d = Vec::with_capacity(2 * m + 1);
    for k in 0..=2 * m {
        if k == m + 1 {
            d.push(ZqElement::zero(zq));
            continue;
        }
        let mut sum = ZqElement::zero(zq);
        for (i, a_col) in a_cols.iter().enumerate() {
            let j = (i + m).checked_sub(k);
            if let Some(j) = j {
                if j <= m {
                    sum = sum.add(&bilinear_star(a_col, &b_cols[j], &statement.y));
                }
            }
        }
        d.push(sum);
    }
    let mut t = Vec::with_capacity(2 * m + 1);
    for k in 0..=2 * m {
        if k == m + 1 {
            t.push(ZqElement::zero(zq));
        } else {
            t.push(gen_random_exponent(zq, rng)?);
        }
    }
    let c_d = GroupVector::from_elements_with_group(
        d.iter()
            .zip(t.iter())
            .map(|(d_k, t_k)| {
                ck.get_commitment(
                    &GroupVector::from_elements_with_group(vec![d_k.clone()], zq)?,
                    t_k,
                )
            })
            .collect::<CryptoResult<Vec<_>>>()?,
        context.group(),
    )?;

    let x = challenge(context, statement, &c_a0, &c_bm, &c_d)?;
    let x_powers = powers_of(&x, 2 * m + 1);

    // ā = Σ x^i a_i, b̄ = Σ x^{m-j} b_j, with matching randomness sums
    let mut a_bar = constantly_zero(n, zq);
    let mut r_bar = ZqElement::zero(zq);
    for (i, a_col) in a_cols.iter().enumerate() {
        a_bar = a_bar.add(&a_col.scalar_multiply(x_powers.get(i)));
        let r_i = if i == 0 {
            &r_0
        } else {
            witness.r.get(i - 1)
        };
        r_bar = r_bar.add(&r_i.multiply(x_powers.get(i)));
    }
    let mut b_bar = constantly_zero(n, zq);
    let mut s_bar = ZqElement::zero(zq);
    for (j, b_col) in b_cols.iter().enumerate() {
        b_bar = b_bar.add(&b_col.scalar_multiply(x_powers.get(m - j)));
        let s_j = if j == m { &s_m } else { witness.s.get(j) };
        s_bar = s_bar.add(&s_j.multiply(x_powers.get(m - j)));
    }
    let t_bar = (0..=2 * m).fold(ZqElement::zero(zq), |acc, k| {
        acc.add(&t[k].multiply(x_powers.get(k)))
    });

    Ok(ZeroArgument {
        c_a0,
        c_bm,
        c_d,
        a_bar,
        b_bar,
        r_bar,
        s_bar,
        t_bar,
    })
}

pub fn verify_zero_argument(
    context: &ArgumentContext,
    statement: &ZeroStatement,
    argument: &ZeroArgument,
) -> CryptoResult<bool> {
    let zq = context.zq();
    let ck = context.commitment_key();
    let m = statement.c_a.len();
    check_statement(context, statement)?;
    if argument.c_d.len() != 2 * m + 1 {
        return Err(CryptoError::invalid(
            "the d-commitment vector must have 2m + 1 entries",
        ));
    }
    let n = argument.a_bar.len();
    if n == 0 || n > ck.size() || argument.b_bar.len() != n {
        return Err(CryptoError::invalid(
            "argument dimensions do not fit the commitment key",
        ));
    }
    if argument.c_a0.group() != context.group()
        || argument.c_bm.group() != context.group()
        || argument.c_d.group() != context.group()
        || argument.a_bar.group().as_ref() != zq.as_ref()
        || argument.b_bar.group().as_ref() != zq.as_ref()
        || argument.t_bar.group().as_ref() != zq.as_ref()
    {
        return Err(CryptoError::invalid(
            "argument must live in the context's groups",
        ));
    }

    // c_{d_{m+1}} must be the commitment to zero with zero randomness
    let pinned = argument.c_d.get(m + 1).is_identity();

    let x = challenge(context, statement, &argument.c_a0, &argument.c_bm, &argument.c_d)?;
    let x_powers = powers_of(&x, 2 * m + 1);

    // com(ā, r̄) = ∏ c_{A_i}^{x^i} over c_{A_0} = c_{a_0}
    let full_c_a = statement.c_a.prepend(argument.c_a0.clone());
    let opens_a = ck.get_commitment(&argument.a_bar, &argument.r_bar)?
        == full_c_a.multi_exponentiate(&x_powers.subvector(0, m + 1));

    // com(b̄, s̄) = ∏ c_{B_j}^{x^{m-j}} over c_{B_m} = c_{b_m}
    let full_c_b = statement.c_b.append(argument.c_bm.clone());
    let descending = GroupVector::from_elements_with_group(
        (0..=m).map(|j| x_powers.get(m - j).clone()).collect(),
        zq,
    )?;
    let opens_b = ck.get_commitment(&argument.b_bar, &argument.s_bar)?
        == full_c_b.multi_exponentiate(&descending);

    // com(ā ⋆ b̄, t̄) = ∏ c_{d_k}^{x^k}
    let star = bilinear_star(&argument.a_bar, &argument.b_bar, &statement.y);
    let opens_d = ck.get_commitment(
        &GroupVector::from_elements_with_group(vec![star], zq)?,
        &argument.t_bar,
    )? == argument.c_d.multi_exponentiate(&x_powers);

    let accepted = pinned && opens_a && opens_b && opens_d;
    if !accepted {
        tracing::debug!(
            target: LOG_TARGET,
            pinned, opens_a, opens_b, opens_d,
            "zero argument rejected"
        );
    }
    Ok(accepted)
}

fn check_statement(context: &ArgumentContext, statement: &ZeroStatement) -> CryptoResult<()> {
    if statement.c_a.is_empty() || statement.c_a.len() != statement.c_b.len() {
        return Err(CryptoError::invalid(
            "the commitment vectors must be non-empty and equally sized",
        ));
    }
    if statement.c_a.group() != context.group() || statement.c_b.group() != context.group() {
        return Err(CryptoError::invalid(
            "statement commitments must live in the context's group",
        ));
    }
    if statement.y.group().as_ref() != context.zq().as_ref() {
        return Err(CryptoError::invalid(
            "the bilinear-map scalar must match the group order",
        ));
    }
    Ok(())
}

fn constantly_zero(n: usize, zq: &std::sync::Arc<crate::math::ZqGroup>) -> GroupVector<ZqElement> {
    GroupVector::from_elements_with_group(vec![ZqElement::zero(zq); n], zq)
        .expect("zero entries live in the exponent group")
}

fn challenge(
    context: &ArgumentContext,
    statement: &ZeroStatement,
    c_a0: &GqElement,
    c_bm: &GqElement,
    c_d: &GroupVector<GqElement>,
) -> CryptoResult<ZqElement> {
    ChallengeContext::new()
        .push(context.group().as_ref())
        .push(&statement.c_a)
        .push(&statement.c_b)
        .push(&statement.y)
        .push(c_a0)
        .push(c_bm)
        .push(c_d)
        .tagged_aux::<&str>(TAG, &[])
        .derive(context.hash(), context.zq())
}
