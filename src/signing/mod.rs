//! RSASSA-PSS signing over recursive hashes, with a certificate store
//! gating every operation on a validity window.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::{CryptoRng, RngCore};
use rsa::{Pss, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::error::{CryptoError, CryptoResult};
use crate::hashing::{HashService, Hashable};

const LOG_TARGET: &str = "verimix::signing";

/// RSA-3072, the fixed signing strength of every production level.
pub const RSA_KEY_BITS: usize = 3072;

pub fn gen_signing_key_pair<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> CryptoResult<(RsaPrivateKey, RsaPublicKey)> {
    let private = RsaPrivateKey::new(rng, RSA_KEY_BITS)
        .map_err(|e| CryptoError::invalid(format!("RSA key generation failed: {e}")))?;
    let public = RsaPublicKey::from(&private);
    Ok((private, public))
}

/// The slice of an X.509 certificate the signature contract needs: who
/// the key belongs to and when it may be used. The window is
/// `[not_before, not_after)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Certificate {
    authority_id: String,
    public_key: RsaPublicKey,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
}

impl Certificate {
    pub fn new(
        authority_id: impl Into<String>,
        public_key: RsaPublicKey,
        not_before: DateTime<Utc>,
        not_after: DateTime<Utc>,
    ) -> CryptoResult<Self> {
        if not_before >= not_after {
            return Err(CryptoError::invalid(
                "the validity window must not be empty",
            ));
        }
        Ok(Certificate {
            authority_id: authority_id.into(),
            public_key,
            not_before,
            not_after,
        })
    }

    pub fn authority_id(&self) -> &str {
        &self.authority_id
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    pub fn is_valid_at(&self, instant: DateTime<Utc>) -> bool {
        self.not_before <= instant && instant < self.not_after
    }
}

/// Trust store mapping authority identifiers to their certificates.
#[derive(Clone, Debug, Default)]
pub struct CertificateStore {
    certificates: HashMap<String, Certificate>,
}

impl CertificateStore {
    pub fn new() -> Self {
        CertificateStore::default()
    }

    pub fn add(&mut self, certificate: Certificate) {
        self.certificates
            .insert(certificate.authority_id.clone(), certificate);
    }

    pub fn get(&self, authority_id: &str) -> Option<&Certificate> {
        self.certificates.get(authority_id)
    }
}

/// Signs and verifies recursive hashes of `(message, auxiliary data)`.
#[derive(Clone, Debug)]
pub struct SignatureService {
    hash: HashService,
    store: CertificateStore,
}

impl SignatureService {
    pub fn new(hash: HashService, store: CertificateStore) -> Self {
        SignatureService { hash, store }
    }

    /// Signs `recursiveHash(message, aux)` if the signer's certificate
    /// window contains the current instant.
    pub fn gen_signature<R: RngCore + CryptoRng, S: AsRef<str>>(
        &self,
        signing_key: &RsaPrivateKey,
        certificate: &Certificate,
        message: &Hashable,
        auxiliary_data: &[S],
        rng: &mut R,
    ) -> CryptoResult<Vec<u8>> {
        if !certificate.is_valid_at(Utc::now()) {
            tracing::warn!(
                target: LOG_TARGET,
                authority = certificate.authority_id(),
                "refusing to sign outside the certificate window"
            );
            return Err(CryptoError::OutOfValidity);
        }
        let digest = self.digest(message, auxiliary_data)?;
        signing_key
            .sign_with_rng(rng, Pss::new::<Sha256>(), &digest)
            .map_err(|e| CryptoError::invalid(format!("PSS signing failed: {e}")))
    }

    /// Looks up the authority's certificate, checks its window and
    /// verifies the signature over the same hash.
    pub fn verify_signature<S: AsRef<str>>(
        &self,
        authority_id: &str,
        message: &Hashable,
        auxiliary_data: &[S],
        signature: &[u8],
    ) -> CryptoResult<bool> {
        let certificate = self.store.get(authority_id).ok_or_else(|| {
            CryptoError::AuthFailure(format!("no certificate for authority {authority_id:?}"))
        })?;
        if !certificate.is_valid_at(Utc::now()) {
            return Err(CryptoError::OutOfValidity);
        }
        let digest = self.digest(message, auxiliary_data)?;
        Ok(certificate
            .public_key
            .verify(Pss::new::<Sha256>(), &digest, signature)
            .is_ok())
    }

    fn digest<S: AsRef<str>>(
        &self,
        message: &Hashable,
        auxiliary_data: &[S],
    ) -> CryptoResult<Vec<u8>> {
        if auxiliary_data.is_empty() {
            self.hash.recursive_hash(std::slice::from_ref(message))
        } else {
            self.hash.recursive_hash(&[
                message.clone(),
                Hashable::from_strings(auxiliary_data),
            ])
        }
    }
}
