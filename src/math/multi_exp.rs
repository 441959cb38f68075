//! Simultaneous multi-exponentiation.
//!
//! Every mix-net verifier spends most of its time in products of the form
//! `∏ bᵢ^eᵢ mod p`; interleaving the square-and-multiply walks of all
//! bases shares the squarings and cuts the multiplication count roughly
//! by the chunk width.

use num_bigint::BigUint;
use num_traits::One;

/// Backend seam for `∏ bases[i]^exponents[i] mod modulus`.
///
/// The default implementation is pure Rust; a GMP-style backend can be
/// swapped in behind this trait without touching the callers.
pub trait MultiExpBackend {
    fn multi_mod_exp(&self, bases: &[BigUint], exponents: &[BigUint], modulus: &BigUint)
        -> BigUint;
}

/// Straus' interleaved method with per-chunk subset-product tables.
#[derive(Clone, Copy, Debug)]
pub struct SimultaneousMultiExp {
    chunk_width: usize,
}

impl SimultaneousMultiExp {
    pub fn new(chunk_width: usize) -> Self {
        assert!(
            (1..=8).contains(&chunk_width),
            "chunk width must be in [1, 8]"
        );
        SimultaneousMultiExp { chunk_width }
    }
}

impl Default for SimultaneousMultiExp {
    fn default() -> Self {
        SimultaneousMultiExp { chunk_width: 5 }
    }
}

impl MultiExpBackend for SimultaneousMultiExp {
    fn multi_mod_exp(
        &self,
        bases: &[BigUint],
        exponents: &[BigUint],
        modulus: &BigUint,
    ) -> BigUint {
        assert_eq!(
            bases.len(),
            exponents.len(),
            "bases and exponents must have the same length"
        );
        if bases.is_empty() {
            return BigUint::one() % modulus;
        }

        // One subset-product table of 2^c entries per chunk of c bases.
        let tables: Vec<Vec<BigUint>> = bases
            .chunks(self.chunk_width)
            .map(|chunk| {
                let mut table = vec![BigUint::one(); 1 << chunk.len()];
                for (j, base) in chunk.iter().enumerate() {
                    let bit = 1usize << j;
                    for mask in bit..(bit << 1) {
                        table[mask] = (&table[mask - bit] * base) % modulus;
                    }
                }
                table
            })
            .collect();

        let max_bits = exponents.iter().map(|e| e.bits()).max().unwrap_or(0);
        let mut acc = BigUint::one();
        for bit in (0..max_bits).rev() {
            acc = (&acc * &acc) % modulus;
            for (chunk_index, chunk) in exponents.chunks(self.chunk_width).enumerate() {
                let mut mask = 0usize;
                for (j, exponent) in chunk.iter().enumerate() {
                    if exponent.bit(bit) {
                        mask |= 1 << j;
                    }
                }
                if mask != 0 {
                    acc = (&acc * &tables[chunk_index][mask]) % modulus;
                }
            }
        }
        acc
    }
}

/// `∏ bases[i]^exponents[i] mod modulus` with the default backend.
pub fn multi_mod_exp(bases: &[BigUint], exponents: &[BigUint], modulus: &BigUint) -> BigUint {
    SimultaneousMultiExp::default().multi_mod_exp(bases, exponents, modulus)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(bases: &[BigUint], exponents: &[BigUint], modulus: &BigUint) -> BigUint {
        bases
            .iter()
            .zip(exponents)
            .fold(BigUint::one(), |acc, (b, e)| {
                (acc * b.modpow(e, modulus)) % modulus
            })
    }

    #[test]
    fn matches_naive_product_of_single_exponentiations() {
        let modulus = BigUint::from(2039u32);
        let bases: Vec<BigUint> = (2u32..14).map(BigUint::from).collect();
        let exponents: Vec<BigUint> = (100u32..112).map(|e| BigUint::from(e * 37 + 5)).collect();
        for width in 1..=8 {
            let backend = SimultaneousMultiExp::new(width);
            assert_eq!(
                backend.multi_mod_exp(&bases, &exponents, &modulus),
                naive(&bases, &exponents, &modulus),
                "chunk width {width}"
            );
        }
    }

    #[test]
    fn empty_product_is_one() {
        assert_eq!(
            multi_mod_exp(&[], &[], &BigUint::from(7u32)),
            BigUint::one()
        );
    }

    #[test]
    fn zero_exponents_yield_one() {
        let modulus = BigUint::from(47u32);
        let bases = vec![BigUint::from(2u32), BigUint::from(3u32)];
        let exponents = vec![BigUint::from(0u32), BigUint::from(0u32)];
        assert_eq!(
            multi_mod_exp(&bases, &exponents, &modulus),
            BigUint::one()
        );
    }
}
