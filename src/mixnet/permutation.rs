use rand::{CryptoRng, Rng, RngCore};

use crate::error::{CryptoError, CryptoResult};

/// A permutation of `{0, …, size - 1}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    mapping: Vec<usize>,
}

impl Permutation {
    /// Uniform permutation by an in-place Fisher-Yates walk.
    pub fn random<R: RngCore + CryptoRng>(size: usize, rng: &mut R) -> CryptoResult<Self> {
        if size == 0 {
            return Err(CryptoError::invalid(
                "a permutation needs at least one element",
            ));
        }
        let mut mapping: Vec<usize> = (0..size).collect();
        for i in (1..size).rev() {
            let j = rng.gen_range(0..=i);
            mapping.swap(i, j);
        }
        Ok(Permutation { mapping })
    }

    /// Wraps an explicit mapping, validating it is a bijection.
    pub fn from_mapping(mapping: Vec<usize>) -> CryptoResult<Self> {
        if mapping.is_empty() {
            return Err(CryptoError::invalid(
                "a permutation needs at least one element",
            ));
        }
        let mut seen = vec![false; mapping.len()];
        for &value in &mapping {
            if value >= mapping.len() || seen[value] {
                return Err(CryptoError::invalid(
                    "mapping is not a permutation of its index range",
                ));
            }
            seen[value] = true;
        }
        Ok(Permutation { mapping })
    }

    pub fn size(&self) -> usize {
        self.mapping.len()
    }

    /// The image `π(i)`.
    pub fn get(&self, i: usize) -> usize {
        self.mapping[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.mapping.iter().copied()
    }
}
