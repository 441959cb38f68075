//! Non-interactive zero-knowledge proofs via the Fiat-Shamir transform.
//!
//! Every proof derives its challenge with `recursiveHashToZq` over an
//! ordered hashable list: the group template `(p, q, g)`, the statement,
//! the prover's commitment, and an auxiliary list opened by a literal
//! protocol tag. Verifiers recompute the challenge from scratch; a
//! mismatch is a `false` verdict, never an error.

mod challenge;
mod exponentiation;
mod plaintext_equality;
mod schnorr;

pub use challenge::ChallengeContext;
pub use exponentiation::ExponentiationProof;
pub use plaintext_equality::{compute_phi_plaintext_equality, PlaintextEqualityProof};
pub use schnorr::SchnorrProof;

use crate::error::{CryptoError, CryptoResult};
use crate::hashing::HashService;
use crate::math::GqGroup;

/// Challenges live in `Zq`, so the digest must be strictly narrower
/// than the group order. Checked up front by every `gen` and `verify`.
pub(crate) fn check_challenge_length(hash: &HashService, group: &GqGroup) -> CryptoResult<()> {
    if hash.hash_length_bits() >= group.q_bit_length() {
        return Err(CryptoError::invalid(format!(
            "a {}-bit hash cannot derive challenges for a {}-bit group order",
            hash.hash_length_bits(),
            group.q_bit_length()
        )));
    }
    Ok(())
}
