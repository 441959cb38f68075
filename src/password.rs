//! Argon2id password hashing.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::{CryptoRng, RngCore};

use crate::config::SecurityLevel;
use crate::error::{CryptoError, CryptoResult};
use crate::random::random_bytes;

pub const TAG_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 16;

/// Argon2id with memory, parallelism and iteration counts taken from
/// the security level.
#[derive(Clone, Debug)]
pub struct Argon2Service {
    memory_kib: u32,
    parallelism: u32,
    iterations: u32,
}

impl Argon2Service {
    pub fn new(level: SecurityLevel) -> Self {
        let (memory_kib, parallelism, iterations) = level.argon2_parameters();
        Argon2Service {
            memory_kib,
            parallelism,
            iterations,
        }
    }

    /// Derives a tag under a fresh random salt; returns both.
    pub fn gen_argon2id<R: RngCore + CryptoRng>(
        &self,
        keying_material: &[u8],
        rng: &mut R,
    ) -> CryptoResult<([u8; TAG_LENGTH], [u8; SALT_LENGTH])> {
        let mut salt = [0u8; SALT_LENGTH];
        salt.copy_from_slice(&random_bytes(SALT_LENGTH, rng));
        let tag = self.get_argon2id(keying_material, &salt)?;
        Ok((tag, salt))
    }

    /// Recomputes the tag for an existing salt.
    pub fn get_argon2id(
        &self,
        keying_material: &[u8],
        salt: &[u8; SALT_LENGTH],
    ) -> CryptoResult<[u8; TAG_LENGTH]> {
        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(TAG_LENGTH),
        )
        .map_err(|e| CryptoError::invalid(format!("invalid Argon2 parameters: {e}")))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let mut tag = [0u8; TAG_LENGTH];
        argon2
            .hash_password_into(keying_material, salt, &mut tag)
            .map_err(|e| CryptoError::invalid(format!("Argon2 hashing failed: {e}")))?;
        Ok(tag)
    }
}
