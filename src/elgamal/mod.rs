//! Multi-recipient ElGamal over the quadratic-residue group.
//!
//! One encryption randomness `r` produces a single `γ = g^r` shared by
//! up to `k` recipients, each with their own `φᵢ = mᵢ · hᵢ^r`.

mod ciphertext;
mod keypair;

pub use ciphertext::{ElGamalMultiRecipientCiphertext, ElGamalMultiRecipientMessage};
pub use keypair::{ElGamalKeyPair, ElGamalPrivateKey, ElGamalPublicKey};
