//! Process-wide security configuration.
//!
//! A level fixes the whole primitive suite: SHA3-256 hashing, SHAKE-256
//! extendable output, SHA-256 for the KDF, AES-256-GCM, RSASSA-PSS
//! signing. Only the parameter sizes move between levels.

use once_cell::sync::OnceCell;

use crate::error::{CryptoError, CryptoResult};
use crate::hashing::HashService;

static GLOBAL_LEVEL: OnceCell<SecurityLevel> = OnceCell::new();

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SecurityLevel {
    /// Toy parameters for tests only; offers no security whatsoever.
    TestingOnly,
    Legacy,
    Extended,
}

impl SecurityLevel {
    /// Bit length of the group modulus `p`.
    pub fn p_bit_length(&self) -> usize {
        match self {
            SecurityLevel::TestingOnly => 48,
            SecurityLevel::Legacy => 2048,
            SecurityLevel::Extended => 3072,
        }
    }

    /// Claimed symmetric-equivalent strength.
    pub fn symmetric_bit_length(&self) -> usize {
        match self {
            SecurityLevel::TestingOnly => 16,
            SecurityLevel::Legacy => 112,
            SecurityLevel::Extended => 128,
        }
    }

    /// The recursive-hash service of this level. The testing level
    /// truncates the digest so that challenge derivation stays below
    /// its tiny group orders.
    pub fn hash_service(&self) -> HashService {
        match self {
            SecurityLevel::TestingOnly => HashService::with_hash_length(2)
                .expect("two bytes is a valid digest length"),
            SecurityLevel::Legacy | SecurityLevel::Extended => HashService::new(),
        }
    }

    /// Argon2id `(memory KiB, parallelism, iterations)`.
    pub fn argon2_parameters(&self) -> (u32, u32, u32) {
        match self {
            SecurityLevel::TestingOnly => (256, 1, 1),
            SecurityLevel::Legacy => (65536, 4, 3),
            SecurityLevel::Extended => (131072, 4, 3),
        }
    }

    /// Selects the process-wide level, once, at startup.
    pub fn set_global(self) -> CryptoResult<()> {
        GLOBAL_LEVEL
            .set(self)
            .map_err(|_| CryptoError::invalid("the security level has already been selected"))
    }

    /// The selected level; [`Extended`] when none was set.
    ///
    /// [`Extended`]: SecurityLevel::Extended
    pub fn global() -> SecurityLevel {
        *GLOBAL_LEVEL.get().unwrap_or(&SecurityLevel::Extended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_expose_their_parameter_sizes() {
        assert_eq!(SecurityLevel::TestingOnly.p_bit_length(), 48);
        assert_eq!(SecurityLevel::Legacy.p_bit_length(), 2048);
        assert_eq!(SecurityLevel::Extended.p_bit_length(), 3072);
        assert_eq!(SecurityLevel::Extended.symmetric_bit_length(), 128);
    }

    #[test]
    fn testing_level_narrows_the_digest() {
        assert_eq!(SecurityLevel::TestingOnly.hash_service().hash_length_bytes(), 2);
        assert_eq!(SecurityLevel::Extended.hash_service().hash_length_bytes(), 32);
    }

    #[test]
    fn global_selection_happens_at_most_once() {
        assert_eq!(SecurityLevel::global(), SecurityLevel::Extended);
        SecurityLevel::Extended.set_global().unwrap();
        assert!(SecurityLevel::Legacy.set_global().is_err());
        assert_eq!(SecurityLevel::global(), SecurityLevel::Extended);
    }
}
