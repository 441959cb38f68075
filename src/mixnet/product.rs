//! Product argument: the entries of a committed matrix multiply to a
//! public value. One column collapses to a bare single-value product;
//! more columns route through a Hadamard argument first.

use rand::{CryptoRng, RngCore};

use super::hadamard::{
    gen_hadamard_argument, verify_hadamard_argument, HadamardArgument, HadamardStatement,
    HadamardWitness,
};
use super::single_value_product::{
    gen_single_value_product_argument, verify_single_value_product_argument,
    SingleValueProductArgument, SingleValueProductStatement, SingleValueProductWitness,
};
use super::ArgumentContext;
use crate::error::{CryptoError, CryptoResult};
use crate::math::{GqElement, GroupMatrix, GroupVector, ZqElement};
use crate::random::gen_random_exponent;

const LOG_TARGET: &str = "verimix::mixnet::product";

/// Statement: the committed matrix columns multiply, entry over entry
/// and column over column, to `b`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductStatement {
    pub c_a: GroupVector<GqElement>,
    pub b: ZqElement,
}

#[derive(Clone, Debug)]
pub struct ProductWitness {
    pub a: GroupMatrix<ZqElement>,
    pub r: GroupVector<ZqElement>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductArgument {
    /// Commitment to the column-wise Hadamard product; absent when the
    /// matrix has a single column.
    c_b: Option<GqElement>,
    hadamard: Option<HadamardArgument>,
    single_value_product: SingleValueProductArgument,
}

pub fn gen_product_argument<R: RngCore + CryptoRng>(
    context: &ArgumentContext,
    statement: &ProductStatement,
    witness: &ProductWitness,
    rng: &mut R,
) -> CryptoResult<ProductArgument> {
    let zq = context.zq();
    let ck = context.commitment_key();
    let m = statement.c_a.len();
    let n = witness.a.n_rows();
    if m == 0 {
        return Err(CryptoError::invalid("the statement must not be empty"));
    }
    if witness.a.n_cols() != m || witness.r.len() != m {
        return Err(CryptoError::invalid(
            "witness dimensions do not match the statement",
        ));
    }
    if n < 2 || n > ck.size() {
        return Err(CryptoError::invalid(format!(
            "matrix columns must have 2..={} entries, got {n}",
            ck.size()
        )));
    }
    if ck.get_commitment_matrix(&witness.a, &witness.r)? != statement.c_a {
        return Err(CryptoError::invalid(
            "witness does not open the product statement",
        ));
    }
    let full_product = witness.a.to_row_vector().product();
    if full_product != statement.b {
        return Err(CryptoError::invalid(
            "witness entries do not multiply to the stated product",
        ));
    }
    tracing::debug!(target: LOG_TARGET, m, n, "generating product argument");

    if m == 1 {
        let single_value_product = gen_single_value_product_argument(
            context,
            &SingleValueProductStatement {
                commitment: statement.c_a.get(0).clone(),
                product: statement.b.clone(),
            },
            &SingleValueProductWitness {
                elements: witness.a.column(0),
                randomness: witness.r.get(0).clone(),
            },
            rng,
        )?;
        return Ok(ProductArgument {
            c_b: None,
            hadamard: None,
            single_value_product,
        });
    }

    // b = a₁ ∘ … ∘ a_m, committed fresh
    let b_vec = (1..m).fold(witness.a.column(0), |acc, i| acc.hadamard(&witness.a.column(i)));
    let s = gen_random_exponent(zq, rng)?;
    let c_b = ck.get_commitment(&b_vec, &s)?;

    let hadamard = gen_hadamard_argument(
        context,
        &HadamardStatement {
            c_a: statement.c_a.clone(),
            c_b: c_b.clone(),
        },
        &HadamardWitness {
            a: witness.a.clone(),
            r: witness.r.clone(),
            b: b_vec.clone(),
            s: s.clone(),
        },
        rng,
    )?;
    let single_value_product = gen_single_value_product_argument(
        context,
        &SingleValueProductStatement {
            commitment: c_b.clone(),
            product: statement.b.clone(),
        },
        &SingleValueProductWitness {
            elements: b_vec,
            randomness: s,
        },
        rng,
    )?;

    Ok(ProductArgument {
        c_b: Some(c_b),
        hadamard: Some(hadamard),
        single_value_product,
    })
}

pub fn verify_product_argument(
    context: &ArgumentContext,
    statement: &ProductStatement,
    argument: &ProductArgument,
) -> CryptoResult<bool> {
    let m = statement.c_a.len();
    if m == 0 {
        return Err(CryptoError::invalid("the statement must not be empty"));
    }
    if statement.c_a.group() != context.group() {
        return Err(CryptoError::invalid(
            "statement commitments must live in the context's group",
        ));
    }

    if m == 1 {
        if argument.c_b.is_some() || argument.hadamard.is_some() {
            return Err(CryptoError::invalid(
                "a one-column product argument carries no Hadamard part",
            ));
        }
        return verify_single_value_product_argument(
            context,
            &SingleValueProductStatement {
                commitment: statement.c_a.get(0).clone(),
                product: statement.b.clone(),
            },
            &argument.single_value_product,
        );
    }

    let (Some(c_b), Some(hadamard)) = (&argument.c_b, &argument.hadamard) else {
        return Err(CryptoError::invalid(
            "a multi-column product argument needs its Hadamard part",
        ));
    };
    let hadamard_ok = verify_hadamard_argument(
        context,
        &HadamardStatement {
            c_a: statement.c_a.clone(),
            c_b: c_b.clone(),
        },
        hadamard,
    )?;
    let svp_ok = verify_single_value_product_argument(
        context,
        &SingleValueProductStatement {
            commitment: c_b.clone(),
            product: statement.b.clone(),
        },
        &argument.single_value_product,
    )?;
    let accepted = hadamard_ok && svp_ok;
    if !accepted {
        tracing::debug!(target: LOG_TARGET, hadamard_ok, svp_ok, "product argument rejected");
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixnet::test_context::context;
    use crate::random::gen_random_vector;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn instance(
        ctx: &ArgumentContext,
        m: usize,
        n: usize,
        rng: &mut StdRng,
    ) -> (ProductStatement, ProductWitness) {
        let zq = ctx.zq().clone();
        let flat = gen_random_vector(&zq, n * m, rng).unwrap();
        let a = GroupMatrix::from_column_vector(&flat, n, m).unwrap();
        let r = gen_random_vector(&zq, m, rng).unwrap();
        let statement = ProductStatement {
            c_a: ctx.commitment_key().get_commitment_matrix(&a, &r).unwrap(),
            b: flat.product(),
        };
        (statement, ProductWitness { a, r })
    }

    #[test]
    fn honest_argument_verifies_for_one_and_many_columns() {
        let mut rng = StdRng::seed_from_u64(109);
        let ctx = context(3, 1);
        for (m, n) in [(1usize, 3usize), (2, 2), (3, 3)] {
            let (statement, witness) = instance(&ctx, m, n, &mut rng);
            let argument = gen_product_argument(&ctx, &statement, &witness, &mut rng).unwrap();
            assert!(
                verify_product_argument(&ctx, &statement, &argument).unwrap(),
                "m = {m}, n = {n}"
            );
        }
    }

    #[test]
    fn wrong_product_is_rejected() {
        let mut rng = StdRng::seed_from_u64(113);
        let ctx = context(3, 1);
        let (statement, witness) = instance(&ctx, 2, 3, &mut rng);
        let argument = gen_product_argument(&ctx, &statement, &witness, &mut rng).unwrap();
        let forged = ProductStatement {
            c_a: statement.c_a.clone(),
            b: statement.b.add(&ZqElement::one(ctx.zq())),
        };
        assert!(!verify_product_argument(&ctx, &forged, &argument).unwrap());
    }

    #[test]
    fn single_row_matrices_are_rejected() {
        let mut rng = StdRng::seed_from_u64(127);
        let ctx = context(3, 1);
        let zq = ctx.zq().clone();
        let flat = gen_random_vector(&zq, 2, &mut rng).unwrap();
        let a = GroupMatrix::from_column_vector(&flat, 1, 2).unwrap();
        let r = gen_random_vector(&zq, 2, &mut rng).unwrap();
        let statement = ProductStatement {
            c_a: ctx.commitment_key().get_commitment_matrix(&a, &r).unwrap(),
            b: flat.product(),
        };
        let witness = ProductWitness { a, r };
        assert!(gen_product_argument(&ctx, &statement, &witness, &mut rng).is_err());
    }

    #[test]
    fn mixed_shape_arguments_are_errors() {
        let mut rng = StdRng::seed_from_u64(131);
        let ctx = context(3, 1);
        let (statement, witness) = instance(&ctx, 2, 2, &mut rng);
        let argument = gen_product_argument(&ctx, &statement, &witness, &mut rng).unwrap();
        // present Hadamard part against a one-column statement
        let narrow = ProductStatement {
            c_a: statement.c_a.subvector(0, 1),
            b: statement.b.clone(),
        };
        assert!(verify_product_argument(&ctx, &narrow, &argument).is_err());
    }
}
