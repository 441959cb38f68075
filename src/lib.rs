//! Misuse-resistant cryptographic primitives for a verifiable e-voting
//! stack.
//!
//! The crate provides the algorithmic engine an election system builds
//! on: arithmetic in the quadratic-residue group of a safe prime and
//! its exponent ring, multi-recipient ElGamal, recursive hashing with
//! typed domain separation, Fiat-Shamir zero-knowledge proofs, Pedersen
//! commitments and a Bayer-Groth argument of correct shuffle. Around
//! that core sit the byte-accurate boundary wrappers the components
//! share: RFC 4648 codecs, AES-256-GCM, HKDF, Argon2id and RSASSA-PSS
//! signing over a certificate store.
//!
//! Every mathematical object is immutable and carries its group;
//! operations across groups are rejected. Verification failures are
//! values (`Ok(false)`), malformed inputs are errors, and all challenge
//! derivations are deterministic in the byte encoding of their inputs.

pub mod codec;
pub mod commitment;
pub mod config;
pub mod conversions;
pub mod elgamal;
pub mod error;
pub mod hashing;
pub mod kdf;
pub mod math;
pub mod mixnet;
pub mod password;
pub mod random;
pub mod signing;
pub mod symmetric;
pub mod zkproofs;

pub use config::SecurityLevel;
pub use error::{CryptoError, CryptoResult};
