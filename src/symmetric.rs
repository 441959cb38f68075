//! Authenticated symmetric encryption (AES-256-GCM).

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};
use crate::random::random_bytes;

pub const KEY_LENGTH: usize = 32;
pub const NONCE_LENGTH: usize = 12;

/// A 256-bit symmetric key, wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_LENGTH]);

impl SymmetricKey {
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        SymmetricKey(bytes)
    }

    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; KEY_LENGTH];
        rng.fill_bytes(&mut bytes);
        SymmetricKey(bytes)
    }

    fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey(..)")
    }
}

/// Stateless AEAD wrapper; safe to share across threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct SymmetricService;

impl SymmetricService {
    pub fn new() -> Self {
        SymmetricService
    }

    pub fn gen_nonce<R: RngCore + CryptoRng>(&self, rng: &mut R) -> [u8; NONCE_LENGTH] {
        let bytes = random_bytes(NONCE_LENGTH, rng);
        let mut nonce = [0u8; NONCE_LENGTH];
        nonce.copy_from_slice(&bytes);
        nonce
    }

    /// Returns ciphertext with the 16-byte tag appended.
    pub fn encrypt(
        &self,
        key: &SymmetricKey,
        nonce: &[u8; NONCE_LENGTH],
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(key.as_slice())
            .map_err(|_| CryptoError::invalid("symmetric key must be 32 bytes"))?;
        cipher
            .encrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: plaintext,
                    aad: associated_data,
                },
            )
            .map_err(|_| CryptoError::invalid("plaintext too large for AES-GCM"))
    }

    /// Opens a ciphertext produced by [`encrypt`]; any mutation of key,
    /// nonce, ciphertext or associated data fails authentication.
    ///
    /// [`encrypt`]: SymmetricService::encrypt
    pub fn decrypt(
        &self,
        key: &SymmetricKey,
        nonce: &[u8; NONCE_LENGTH],
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(key.as_slice())
            .map_err(|_| CryptoError::invalid("symmetric key must be 32 bytes"))?;
        cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: associated_data,
                },
            )
            .map_err(|_| CryptoError::AuthFailure("AEAD tag verification failed".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn roundtrip_with_associated_data() {
        let mut rng = StdRng::seed_from_u64(191);
        let service = SymmetricService::new();
        let key = SymmetricKey::generate(&mut rng);
        let nonce = service.gen_nonce(&mut rng);
        let ciphertext = service
            .encrypt(&key, &nonce, b"ballot payload", b"header")
            .unwrap();
        assert_eq!(
            service.decrypt(&key, &nonce, &ciphertext, b"header").unwrap(),
            b"ballot payload"
        );
    }

    #[test]
    fn any_mutation_fails_authentication() {
        let mut rng = StdRng::seed_from_u64(193);
        let service = SymmetricService::new();
        let key = SymmetricKey::generate(&mut rng);
        let nonce = service.gen_nonce(&mut rng);
        let ciphertext = service.encrypt(&key, &nonce, b"payload", b"aad").unwrap();

        let mut flipped = ciphertext.clone();
        flipped[0] ^= 1;
        assert!(matches!(
            service.decrypt(&key, &nonce, &flipped, b"aad"),
            Err(CryptoError::AuthFailure(_))
        ));

        let other_key = SymmetricKey::generate(&mut rng);
        assert!(service.decrypt(&other_key, &nonce, &ciphertext, b"aad").is_err());

        let other_nonce = service.gen_nonce(&mut rng);
        assert!(service.decrypt(&key, &other_nonce, &ciphertext, b"aad").is_err());

        assert!(service.decrypt(&key, &nonce, &ciphertext, b"tampered").is_err());
    }
}
